use std::rc::Rc;
use futures::future::LocalBoxFuture;
use crate::models::{BoundingBox, DetectedSymbol, FacingMode, FrameSource, IndicatorState, ScanError};

/// Tipo de pista de un stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

/// Pista individual de un stream de cámara
pub trait StreamTrack {
    fn kind(&self) -> TrackKind;

    fn stop(&self);

    /// Aplicar `{advanced: [{torch}]}` a la pista (solo pistas de video)
    fn apply_torch(&self, enabled: bool) -> LocalBoxFuture<'static, Result<(), ScanError>>;
}

/// Stream de cámara adquirido, propiedad exclusiva de la sesión
pub trait CameraStream {
    fn tracks(&self) -> Vec<Rc<dyn StreamTrack>>;

    /// Asociar el stream al `<video>` de preview y esperar a que empiece a reproducirse
    fn bind_preview(&self) -> LocalBoxFuture<'static, Result<(), ScanError>>;

    /// Quitar el stream del `<video>` de preview
    fn unbind_preview(&self);
}

/// Servicio de adquisición de cámara (getUserMedia)
pub trait CameraService {
    fn acquire(&self, facing: FacingMode) -> LocalBoxFuture<'static, Result<Rc<dyn CameraStream>, ScanError>>;
}

/// Detector de códigos de barras ya instanciado
pub trait BarcodeDetector {
    fn detect(&self, source: FrameSource) -> LocalBoxFuture<'static, Result<Vec<DetectedSymbol>, ScanError>>;
}

/// Detecta si la plataforma tiene detector y lo instancia
pub trait DetectorProvider {
    fn create(&self) -> Result<Rc<dyn BarcodeDetector>, ScanError>;
}

/// Superficie de UI del widget: preview, overlay, sinks de texto y controles
pub trait ScanSurface {
    /// Hay un elemento de preview disponible
    fn has_preview(&self) -> bool;

    /// Dimensiones del frame actual del video (0x0 mientras calienta)
    fn frame_size(&self) -> (u32, u32);

    /// El video se está reproduciendo y no terminó
    fn is_playing(&self) -> bool;

    fn overlay_size(&self) -> (u32, u32);

    fn resize_overlay(&self, width: u32, height: u32);

    fn clear_overlay(&self, width: u32, height: u32);

    fn draw_frame(&self, width: u32, height: u32);

    fn outline(&self, bounding_box: &BoundingBox);

    /// Sink del valor decodificado (campo de resultado)
    fn publish_value(&self, value: &str);

    /// Línea de estado legible ("Barcode detected: ...")
    fn set_status_line(&self, text: &str);

    fn set_indicator(&self, state: IndicatorState);

    /// Visibilidad de controles: `true` = cámara abierta
    fn set_controls_open(&self, open: bool);

    fn set_facing_label(&self, facing: FacingMode);

    fn set_torch_icon(&self, enabled: bool);

    /// Aviso bloqueante (alert)
    fn notify(&self, message: &str);
}

/// Hooks opcionales de la página host
#[derive(Clone, Default)]
pub struct ScanHooks {
    pub on_scanned: Option<Rc<dyn Fn(&str)>>,
    pub on_visibility_change: Option<Rc<dyn Fn()>>,
}

impl ScanHooks {
    pub fn emit_scanned(&self, value: &str) {
        if let Some(hook) = &self.on_scanned {
            hook(value);
        }
        if let Some(hook) = &self.on_visibility_change {
            hook();
        }
    }
}
