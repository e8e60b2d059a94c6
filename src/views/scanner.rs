// ============================================================================
// SCANNER VIEW - Superficie DOM del scanner (video, overlay, controles)
// ============================================================================
// Sin lógica: solo traduce las llamadas del ScannerViewModel a DOM y
// conecta los botones de la página con el ViewModel.
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlVideoElement,
};
use crate::config::{ElementIds, IconConfig, OverlayConfig, ScannerConfig};
use crate::dom::{
    find_typed_by_id, get_typed_by_id, query_selector, set_class, set_color, set_display, EventListener,
};
use crate::models::{BoundingBox, FacingMode, IndicatorState};
use crate::services::web_camera::WebCameraService;
use crate::services::web_detector::WebDetectorProvider;
use crate::services::web_runtime::WebRuntime;
use crate::services::{ScanHooks, ScanSurface};
use crate::utils::host_ffi::{call_host_function, SEARCH_PRODUCT, UPDATE_BUTTON_VISIBILITY};
use crate::viewmodels::{ScannerServices, ScannerViewModel};

const TORCH_OFF_CLASS: &str = "flash-off";

/// Elementos del widget. Video y overlay son obligatorios, el resto opcional.
pub struct ScannerElements {
    pub video: HtmlVideoElement,
    pub overlay: HtmlCanvasElement,
    pub context: CanvasRenderingContext2d,
    pub open_button: Option<HtmlElement>,
    pub close_button: Option<HtmlElement>,
    pub torch_button: Option<HtmlElement>,
    pub switch_button: Option<HtmlElement>,
    pub torch_image: Option<HtmlImageElement>,
    pub indicator: Option<HtmlElement>,
    pub scan_result: Option<HtmlElement>,
    pub result_input: Option<HtmlInputElement>,
    pub focus_box: Option<HtmlElement>,
}

impl ScannerElements {
    pub fn lookup(ids: &ElementIds) -> Result<Self, JsValue> {
        let video = get_typed_by_id::<HtmlVideoElement>(&ids.video)?;
        let overlay = get_typed_by_id::<HtmlCanvasElement>(&ids.overlay)?;
        let context = overlay
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Failed to get 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let focus_box = query_selector(&ids.focus_box_selector)?
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());

        let elements = Self {
            video,
            overlay,
            context,
            open_button: find_typed_by_id(&ids.open_button),
            close_button: find_typed_by_id(&ids.close_button),
            torch_button: find_typed_by_id(&ids.torch_button),
            switch_button: find_typed_by_id(&ids.switch_button),
            torch_image: find_typed_by_id(&ids.torch_image),
            indicator: find_typed_by_id(&ids.indicator),
            scan_result: find_typed_by_id(&ids.scan_result),
            result_input: find_typed_by_id(&ids.result_input),
            focus_box,
        };

        if elements.result_input.is_none() {
            log::warn!("⚠️ [SCANNER] No existe #{}: el valor escaneado no se publicará", ids.result_input);
        }

        Ok(elements)
    }
}

/// Implementación DOM de `ScanSurface`
pub struct WebScanSurface {
    elements: ScannerElements,
    overlay: OverlayConfig,
    icons: IconConfig,
}

impl WebScanSurface {
    pub fn new(elements: ScannerElements, config: &ScannerConfig) -> Self {
        Self {
            elements,
            overlay: config.overlay.clone(),
            icons: config.icons.clone(),
        }
    }
}

impl ScanSurface for WebScanSurface {
    fn has_preview(&self) -> bool {
        self.elements.video.is_connected()
    }

    fn frame_size(&self) -> (u32, u32) {
        (self.elements.video.video_width(), self.elements.video.video_height())
    }

    fn is_playing(&self) -> bool {
        !self.elements.video.paused() && !self.elements.video.ended()
    }

    fn overlay_size(&self) -> (u32, u32) {
        (self.elements.overlay.width(), self.elements.overlay.height())
    }

    fn resize_overlay(&self, width: u32, height: u32) {
        self.elements.overlay.set_width(width);
        self.elements.overlay.set_height(height);
    }

    fn clear_overlay(&self, width: u32, height: u32) {
        self.elements.context.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn draw_frame(&self, width: u32, height: u32) {
        if let Err(e) = self.elements.context.draw_image_with_html_video_element_and_dw_and_dh(
            &self.elements.video,
            0.0,
            0.0,
            width as f64,
            height as f64,
        ) {
            log::warn!("⚠️ [SCANNER] drawImage falló: {:?}", e);
        }
    }

    #[allow(deprecated)]
    fn outline(&self, bounding_box: &BoundingBox) {
        let context = &self.elements.context;
        context.set_stroke_style(&JsValue::from_str(&self.overlay.stroke_color));
        context.set_line_width(self.overlay.stroke_width);
        context.begin_path();
        context.rect(bounding_box.x, bounding_box.y, bounding_box.width, bounding_box.height);
        context.stroke();
    }

    fn publish_value(&self, value: &str) {
        if let Some(input) = &self.elements.result_input {
            input.set_value(value);
        }
    }

    fn set_status_line(&self, text: &str) {
        if let Some(line) = &self.elements.scan_result {
            line.set_inner_text(text);
        }
    }

    fn set_indicator(&self, state: IndicatorState) {
        if let Some(indicator) = &self.elements.indicator {
            indicator.set_text_content(Some(state.label()));
            set_color(indicator, state.color());
        }
    }

    fn set_controls_open(&self, open: bool) {
        let (open_display, control_display, focus_display) = if open {
            ("none", "inline-block", "block")
        } else {
            ("inline-block", "none", "none")
        };

        if let Some(button) = &self.elements.open_button {
            set_display(button, open_display);
        }
        for button in [
            &self.elements.close_button,
            &self.elements.torch_button,
            &self.elements.switch_button,
        ]
        .into_iter()
        .flatten()
        {
            set_display(button, control_display);
        }
        if let Some(focus_box) = &self.elements.focus_box {
            set_display(focus_box, focus_display);
        }
    }

    fn set_facing_label(&self, facing: FacingMode) {
        if let Some(button) = &self.elements.switch_button {
            button.set_inner_text(facing.button_label());
        }
    }

    fn set_torch_icon(&self, enabled: bool) {
        let Some(image) = &self.elements.torch_image else {
            return;
        };
        if let Err(e) = set_class(image, TORCH_OFF_CLASS, enabled) {
            log::warn!("⚠️ [SCANNER] No se pudo cambiar el icono de linterna: {:?}", e);
        }
        image.set_src(if enabled { &self.icons.torch_on } else { &self.icons.torch_off });
    }

    fn notify(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

fn call_hook(name: &str, args: &[JsValue]) {
    if !call_host_function(name, args) {
        log::debug!("🔌 [SCANNER] Hook {} no definido o falló", name);
    }
}

fn host_hooks() -> ScanHooks {
    ScanHooks {
        on_scanned: Some(Rc::new(|value: &str| {
            call_hook(SEARCH_PRODUCT, &[JsValue::from_str(value)]);
        })),
        on_visibility_change: Some(Rc::new(|| call_hook(UPDATE_BUTTON_VISIBILITY, &[]))),
    }
}

/// Widget montado: ViewModel + listeners de los botones
pub struct ScannerWidget {
    vm: ScannerViewModel,
    _listeners: Vec<EventListener>,
}

impl ScannerWidget {
    pub fn view_model(&self) -> &ScannerViewModel {
        &self.vm
    }

    /// Cerrar la cámara, parar el indicador y soltar los listeners
    pub fn unmount(self) {
        self.vm.unmount();
    }
}

/// Abrir en segundo plano (handlers de click y API JS)
pub fn spawn_open(vm: &ScannerViewModel) {
    let vm = vm.clone();
    wasm_bindgen_futures::spawn_local(async move {
        // Los errores fatales ya se notificaron con alert
        if let Err(e) = vm.open().await {
            log::debug!("📷 [SCANNER] open terminó con: {}", e);
        }
    });
}

fn spawn_switch(vm: &ScannerViewModel) {
    let vm = vm.clone();
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = vm.switch_facing().await {
            log::debug!("🔄 [SCANNER] switch terminó con: {}", e);
        }
    });
}

/// Montar el scanner sobre los elementos existentes de la página
pub fn mount_scanner(config: ScannerConfig) -> Result<ScannerWidget, JsValue> {
    let elements = ScannerElements::lookup(&config.elements)?;

    let video = elements.video.clone();
    let overlay = elements.overlay.clone();
    let open_button = elements.open_button.clone();
    let close_button = elements.close_button.clone();
    let torch_button = elements.torch_button.clone();
    let switch_button = elements.switch_button.clone();

    let surface = Rc::new(WebScanSurface::new(elements, &config));
    let vm = ScannerViewModel::new(
        ScannerServices {
            camera: Rc::new(WebCameraService::new(video.clone())),
            detectors: Rc::new(WebDetectorProvider::new(video, overlay)),
            surface,
            runtime: Rc::new(WebRuntime),
            hooks: host_hooks(),
        },
        config,
    );

    let mut listeners = Vec::new();
    if let Some(button) = &open_button {
        let vm = vm.clone();
        listeners.push(EventListener::click(button, move |_e| spawn_open(&vm))?);
    }
    if let Some(button) = &close_button {
        let vm = vm.clone();
        listeners.push(EventListener::click(button, move |_e| vm.close())?);
    }
    if let Some(button) = &torch_button {
        let vm = vm.clone();
        listeners.push(EventListener::click(button, move |_e| vm.toggle_torch())?);
    }
    if let Some(button) = &switch_button {
        let vm = vm.clone();
        listeners.push(EventListener::click(button, move |_e| spawn_switch(&vm))?);
    }

    vm.mount();
    Ok(ScannerWidget {
        vm,
        _listeners: listeners,
    })
}
