// ============================================================================
// SCAN ERROR - Taxonomía de errores del scanner
// ============================================================================

use thiserror::Error;

/// Errores del scanner.
///
/// Los fatales (`CapabilityUnsupported`, `CameraAccessDenied`, `CameraUnavailable`)
/// se muestran al usuario con un aviso bloqueante. El resto solo se loguea.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("barcode detection is not supported in this environment")]
    CapabilityUnsupported,

    #[error("camera access denied: {0}")]
    CameraAccessDenied(String),

    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("barcode detection failed: {0}")]
    DetectionFailed(String),

    #[error("torch not supported: {0}")]
    TorchUnsupported(String),

    /// Un open que seguía esperando la cámara fue invalidado por un close/open posterior
    #[error("camera request superseded by a newer session")]
    Superseded,

    #[error("DOM error: {0}")]
    Dom(String),
}

impl ScanError {
    /// Clasifica el nombre de un `DOMException` de getUserMedia
    pub fn from_camera_failure(name: &str, message: &str) -> Self {
        let reason = if message.is_empty() {
            name.to_string()
        } else {
            format!("{}: {}", name, message)
        };

        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => {
                ScanError::CameraAccessDenied(reason)
            }
            _ => ScanError::CameraUnavailable(reason),
        }
    }

    /// Los errores fatales impiden que el scanner funcione y se notifican al usuario
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::CapabilityUnsupported
                | ScanError::CameraAccessDenied(_)
                | ScanError::CameraUnavailable(_)
        )
    }
}
