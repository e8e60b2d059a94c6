use serde::{Deserialize, Serialize};
use crate::models::error::ScanError;

/// Rectángulo reportado por el detector, en píxeles del frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Símbolo detectado (formato de `DetectedBarcode` en JS)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedSymbol {
    pub bounding_box: BoundingBox,
    pub raw_value: String,
    #[serde(default)]
    pub format: Option<String>,
}

impl DetectedSymbol {
    pub fn new(raw_value: &str, bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            raw_value: raw_value.to_string(),
            format: None,
        }
    }
}

/// Fuente de imagen que se pasa al detector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSource {
    /// Elemento `<video>` en vivo
    Preview,
    /// Canvas de overlay con el último frame dibujado
    Overlay,
}

/// Parsear el resultado de `detect()` serializado con `JSON.stringify`
pub fn parse_detections(json: &str) -> Result<Vec<DetectedSymbol>, ScanError> {
    serde_json::from_str(json)
        .map_err(|e| ScanError::DetectionFailed(format!("Error deserializando detecciones: {}", e)))
}

/// Valor canónico de una detección: el primer símbolo gana, sin desempate
pub fn canonical_value(symbols: &[DetectedSymbol]) -> Option<&str> {
    symbols.first().map(|s| s.raw_value.as_str())
}
