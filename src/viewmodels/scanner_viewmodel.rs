// ============================================================================
// SCANNER VIEWMODEL - Controlador de la sesión de escaneo
// ============================================================================
// Coordina el stream de cámara con los loops de detección:
// - Stream: open / close / torch / cambio de cámara
// - Loop de anotación (~30 fps) sobre el canvas de overlay
// - Loop de decodificación (intervalo fijo) que publica el valor
// - Indicador de estado (1 s), independiente de la sesión
// Sin lógica DOM: todo pasa por los traits de services.
// ============================================================================

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use crate::config::ScannerConfig;
use crate::models::{
    canonical_value, DetectedSymbol, FacingMode, FrameSource, IndicatorState, ScanError,
    SessionSnapshot,
};
use crate::services::{
    BarcodeDetector, CameraService, CameraStream, DetectorProvider, ScanHooks, ScanSurface,
    TaskRuntime, TrackKind,
};
use crate::state::ScanState;

/// Dependencias inyectadas del scanner
pub struct ScannerServices {
    pub camera: Rc<dyn CameraService>,
    pub detectors: Rc<dyn DetectorProvider>,
    pub surface: Rc<dyn ScanSurface>,
    pub runtime: Rc<dyn TaskRuntime>,
    pub hooks: ScanHooks,
}

struct Shared {
    state: RefCell<ScanState>,
    services: ScannerServices,
    config: ScannerConfig,
}

/// ViewModel del scanner. Clonar es barato (comparte el mismo estado).
#[derive(Clone)]
pub struct ScannerViewModel {
    shared: Rc<Shared>,
}

impl ScannerViewModel {
    pub fn new(services: ScannerServices, config: ScannerConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(ScanState::default()),
                services,
                config,
            }),
        }
    }

    fn state(&self) -> Ref<'_, ScanState> {
        self.shared.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, ScanState> {
        self.shared.state.borrow_mut()
    }

    fn services(&self) -> &ScannerServices {
        &self.shared.services
    }

    fn surface(&self) -> &dyn ScanSurface {
        self.shared.services.surface.as_ref()
    }

    fn downgrade(&self) -> Weak<Shared> {
        Rc::downgrade(&self.shared)
    }

    fn upgrade(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.shared.config
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot()
    }

    // ------------------------------------------------------------------------
    // Ciclo de vida del widget
    // ------------------------------------------------------------------------

    /// Arrancar el indicador de estado. Corre mientras el widget esté montado.
    pub fn mount(&self) {
        if self.state().indicator_task.is_some() {
            log::warn!("⚠️ [SCANNER] mount() ya fue llamado, ignorando");
            return;
        }

        let weak = self.downgrade();
        let handle = self.services().runtime.every(
            self.config().indicator_interval_ms,
            Box::new(move || {
                if let Some(vm) = Self::upgrade(&weak) {
                    vm.indicator_tick();
                }
            }),
        );
        self.state_mut().indicator_task = Some(handle);

        let facing = self.state().facing_mode;
        self.surface().set_facing_label(facing);
        self.surface().set_controls_open(false);
        log::info!("✅ [SCANNER] Widget montado");
    }

    /// Cerrar la cámara y detener el indicador
    pub fn unmount(&self) {
        self.close();
        let indicator = self.state_mut().indicator_task.take();
        if let Some(task) = indicator {
            task.cancel();
        }
        log::info!("🔌 [SCANNER] Widget desmontado");
    }

    // ------------------------------------------------------------------------
    // Stream manager
    // ------------------------------------------------------------------------

    /// Abrir la cámara con el facing mode actual
    pub async fn open(&self) -> Result<(), ScanError> {
        let facing = self.state().facing_mode;
        self.open_with(facing).await
    }

    /// Abrir la cámara con un facing mode concreto.
    /// Siempre cierra antes la sesión previa: nunca hay dos streams ni timers huérfanos.
    pub async fn open_with(&self, facing: FacingMode) -> Result<(), ScanError> {
        self.close();

        let detector = match self.services().detectors.create() {
            Ok(detector) => detector,
            Err(e) => {
                log::error!("❌ [SCANNER] {}", e);
                self.report_fatal(&e);
                return Err(e);
            }
        };

        let generation = {
            let mut state = self.state_mut();
            state.facing_mode = facing;
            state.detector = Some(detector);
            state.begin_opening()
        };

        log::info!("📷 [SCANNER] Solicitando cámara (facingMode={})", facing.as_constraint());
        let acquired = self.services().camera.acquire(facing).await;

        let stream = match acquired {
            Ok(stream) => stream,
            Err(e) => {
                if !self.state().is_current(generation) {
                    return Err(ScanError::Superseded);
                }
                self.state_mut().opening = false;
                log::error!("❌ [SCANNER] Error de cámara: {}", e);
                self.report_fatal(&e);
                return Err(e);
            }
        };

        if !self.state().is_current(generation) {
            log::warn!("⚠️ [SCANNER] La cámara respondió tras un close, liberando stream");
            stop_tracks(stream.as_ref());
            return Err(ScanError::Superseded);
        }

        {
            let mut state = self.state_mut();
            state.stream = Some(stream.clone());
            state.opening = false;
            state.torch_enabled = false;
        }

        if let Err(e) = stream.bind_preview().await {
            log::warn!("⚠️ [SCANNER] El preview no arrancó: {}", e);
        }

        // close() durante el bind ya liberó el stream
        if !self.state().is_live(generation) {
            return Err(ScanError::Superseded);
        }

        self.surface().set_controls_open(true);
        self.surface().set_facing_label(facing);

        self.start_decode(generation);
        self.annotate_tick(generation);

        log::info!("✅ [SCANNER] Cámara abierta");
        Ok(())
    }

    /// Cerrar la cámara. Sin stream activo no hace nada.
    pub fn close(&self) {
        let (stream, decode_task, annotate_task, torch_was_on) = {
            let mut state = self.state_mut();
            if state.stream.is_none() {
                if state.opening {
                    // Un getUserMedia pendiente queda invalidado
                    state.opening = false;
                    state.invalidate();
                    log::info!("🛑 [SCANNER] Apertura pendiente cancelada");
                }
                return;
            }

            state.invalidate();
            let torch_was_on = state.torch_enabled;
            state.torch_enabled = false;
            (
                state.stream.take(),
                state.decode_task.take(),
                state.annotate_task.take(),
                torch_was_on,
            )
        };

        for task in [decode_task, annotate_task].into_iter().flatten() {
            task.cancel();
        }

        if let Some(stream) = stream {
            stop_tracks(stream.as_ref());
            stream.unbind_preview();
        }

        if torch_was_on {
            self.surface().set_torch_icon(false);
        }
        self.surface().set_controls_open(false);
        log::info!("🛑 [SCANNER] Cámara cerrada");
    }

    /// Encender/apagar la linterna. Best-effort: nunca falla hacia el llamador.
    pub fn set_torch(&self, enabled: bool) {
        let stream = self.state().stream.clone();
        let Some(stream) = stream else {
            log::warn!("⚠️ [SCANNER] Linterna: no hay stream activo");
            return;
        };

        self.state_mut().torch_enabled = enabled;
        self.surface().set_torch_icon(enabled);

        let video_tracks: Vec<_> = stream
            .tracks()
            .into_iter()
            .filter(|track| track.kind() == TrackKind::Video)
            .collect();

        if video_tracks.is_empty() {
            log::warn!(
                "⚠️ [SCANNER] {}",
                ScanError::TorchUnsupported("el stream no tiene pista de video".to_string())
            );
            return;
        }

        for track in video_tracks {
            let applying = track.apply_torch(enabled);
            self.services().runtime.spawn(Box::pin(async move {
                if let Err(e) = applying.await {
                    log::warn!("⚠️ [SCANNER] {}", e);
                }
            }));
        }
    }

    pub fn toggle_torch(&self) {
        let enabled = self.state().torch_enabled;
        self.set_torch(!enabled);
    }

    /// Cambiar de cámara: close + open con el facing contrario.
    /// Si el open falla la sesión queda cerrada.
    pub async fn switch_facing(&self) -> Result<(), ScanError> {
        self.close();

        let next = {
            let mut state = self.state_mut();
            state.facing_mode = state.facing_mode.toggled();
            state.facing_mode
        };
        self.surface().set_facing_label(next);
        log::info!("🔄 [SCANNER] Cambiando a cámara {}", next.as_constraint());

        self.open_with(next).await
    }

    fn report_fatal(&self, error: &ScanError) {
        if !error.is_fatal() {
            return;
        }
        let notices = &self.config().notices;
        let message = match error {
            ScanError::CapabilityUnsupported => &notices.unsupported,
            _ => &notices.camera_error,
        };
        self.surface().notify(message);
    }

    // ------------------------------------------------------------------------
    // Loops de detección
    // ------------------------------------------------------------------------

    fn live_detector(&self, generation: u64) -> Option<Rc<dyn BarcodeDetector>> {
        let state = self.state();
        if state.is_live(generation) {
            state.detector.clone()
        } else {
            None
        }
    }

    fn start_decode(&self, generation: u64) {
        let weak = self.downgrade();
        let handle = self.services().runtime.every(
            self.config().decode_interval_ms,
            Box::new(move || {
                if let Some(vm) = Self::upgrade(&weak) {
                    vm.decode_tick(generation);
                }
            }),
        );
        self.state_mut().decode_task = Some(handle);
    }

    fn decode_tick(&self, generation: u64) {
        let Some(detector) = self.live_detector(generation) else {
            return;
        };

        let detection = detector.detect(FrameSource::Preview);
        let vm = self.clone();
        self.services().runtime.spawn(Box::pin(async move {
            let result = detection.await;
            if !vm.state().is_live(generation) {
                log::debug!("🗑️ [SCANNER] Decodificación obsoleta descartada");
                return;
            }
            match result {
                Ok(symbols) => vm.apply_decode(&symbols),
                Err(e) => log::error!("❌ [SCANNER] {}", e),
            }
        }));
    }

    fn apply_decode(&self, symbols: &[DetectedSymbol]) {
        match canonical_value(symbols) {
            Some(value) => {
                log::info!("📱 [SCANNER] Código detectado: {}", value);
                let status = format!("{}{}", self.config().notices.detected_prefix, value);
                self.surface().set_status_line(&status);
                self.surface().publish_value(value);
                self.services().hooks.emit_scanned(value);
            }
            // Una lectura vacía no borra el último valor publicado
            None => self.surface().set_status_line(""),
        }
    }

    fn schedule_annotate(&self, generation: u64) {
        let weak = self.downgrade();
        let handle = self.services().runtime.after(
            self.config().annotate_period_ms(),
            Box::new(move || {
                if let Some(vm) = Self::upgrade(&weak) {
                    vm.annotate_tick(generation);
                }
            }),
        );
        self.state_mut().annotate_task = Some(handle);
    }

    fn annotate_tick(&self, generation: u64) {
        if !self.state().is_live(generation) {
            return;
        }

        // Se reprograma solo mientras el video se reproduce; el próximo open lo rearranca
        if !self.surface().is_playing() {
            log::info!("⏸️ [SCANNER] Preview detenido, loop de anotación suspendido");
            let finished = self.state_mut().annotate_task.take();
            if let Some(task) = finished {
                task.cancel();
            }
            return;
        }

        self.annotate_frame(generation);
        self.schedule_annotate(generation);
    }

    fn annotate_frame(&self, generation: u64) {
        let surface = self.surface();
        let (width, height) = surface.frame_size();
        if width == 0 || height == 0 {
            return;
        }

        surface.resize_overlay(width, height);
        surface.draw_frame(width, height);

        let Some(detector) = self.live_detector(generation) else {
            return;
        };

        let detection = detector.detect(FrameSource::Overlay);
        let vm = self.clone();
        self.services().runtime.spawn(Box::pin(async move {
            let result = detection.await;
            if !vm.state().is_live(generation) {
                return;
            }
            match result {
                Ok(symbols) => vm.draw_annotations(width, height, &symbols),
                Err(e) => log::error!("❌ [SCANNER] {}", e),
            }
        }));
    }

    fn draw_annotations(&self, width: u32, height: u32, symbols: &[DetectedSymbol]) {
        let surface = self.surface();
        if surface.overlay_size() != (width, height) {
            surface.resize_overlay(width, height);
        }
        surface.clear_overlay(width, height);
        surface.draw_frame(width, height);
        for symbol in symbols {
            surface.outline(&symbol.bounding_box);
        }
    }

    // ------------------------------------------------------------------------
    // Indicador de estado
    // ------------------------------------------------------------------------

    fn indicator_tick(&self) {
        let (detector, generation) = {
            let state = self.state();
            (state.detector.clone(), state.generation())
        };
        let Some(detector) = detector else {
            return;
        };
        if !self.surface().has_preview() {
            return;
        }

        let detection = detector.detect(FrameSource::Preview);
        let vm = self.clone();
        self.services().runtime.spawn(Box::pin(async move {
            let result = detection.await;
            if !vm.state().is_current(generation) {
                return;
            }
            let surface = vm.surface();
            match result {
                Ok(symbols) => match canonical_value(&symbols) {
                    Some(value) => {
                        surface.set_indicator(IndicatorState::Detected);
                        surface.publish_value(value);
                    }
                    None => surface.set_indicator(IndicatorState::Ready),
                },
                Err(e) => {
                    log::error!("❌ [SCANNER] Indicador: {}", e);
                    surface.set_indicator(IndicatorState::Idle);
                }
            }
        }));
    }
}

fn stop_tracks(stream: &dyn CameraStream) {
    for track in stream.tracks() {
        track.stop();
    }
}
