use serde::{Deserialize, Serialize};
use crate::models::ScanError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub decode_interval_ms: u32,
    pub annotate_fps: u32,
    pub indicator_interval_ms: u32,
    pub overlay: OverlayConfig,
    pub elements: ElementIds,
    pub icons: IconConfig,
    pub notices: NoticeConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            decode_interval_ms: 500,
            annotate_fps: 30,
            indicator_interval_ms: 1000,
            overlay: OverlayConfig::default(),
            elements: ElementIds::default(),
            icons: IconConfig::default(),
            notices: NoticeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub stroke_color: String,
    pub stroke_width: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            stroke_color: "red".to_string(),
            stroke_width: 4.0,
        }
    }
}

/// IDs de los elementos del widget en la página host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub video: String,
    pub overlay: String,
    pub open_button: String,
    pub close_button: String,
    pub torch_button: String,
    pub switch_button: String,
    pub torch_image: String,
    pub indicator: String,
    pub scan_result: String,
    pub result_input: String,
    pub focus_box_selector: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            video: "barcode-scanner".to_string(),
            overlay: "frame".to_string(),
            open_button: "open-camera-btn".to_string(),
            close_button: "close-camera-btn".to_string(),
            torch_button: "flash-light-btn".to_string(),
            switch_button: "change-camera".to_string(),
            torch_image: "flash-light-img".to_string(),
            indicator: "indicator-text".to_string(),
            scan_result: "scan-result".to_string(),
            result_input: "codeResult".to_string(),
            focus_box_selector: ".focus-box".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub torch_on: String,
    pub torch_off: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            torch_on: "icon/flashlight_on.svg".to_string(),
            torch_off: "icon/flashlight_off.svg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    pub unsupported: String,
    pub camera_error: String,
    pub detected_prefix: String,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            unsupported: "Barcode detection is not supported in this browser.".to_string(),
            camera_error: "Error accessing camera. Please make sure you have granted access to the camera and reload the page.".to_string(),
            detected_prefix: "Barcode detected: ".to_string(),
        }
    }
}

impl ScannerConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let elements = ElementIds::default();

        Self {
            decode_interval_ms: option_env!("SCANNER_DECODE_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.decode_interval_ms),
            annotate_fps: option_env!("SCANNER_ANNOTATE_FPS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.annotate_fps),
            indicator_interval_ms: option_env!("SCANNER_INDICATOR_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.indicator_interval_ms),
            overlay: OverlayConfig {
                stroke_color: option_env!("SCANNER_STROKE_COLOR")
                    .unwrap_or("red").to_string(),
                stroke_width: option_env!("SCANNER_STROKE_WIDTH")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(4.0),
            },
            elements: ElementIds {
                result_input: option_env!("SCANNER_RESULT_INPUT_ID")
                    .map(|s| s.to_string())
                    .unwrap_or(elements.result_input.clone()),
                ..elements
            },
            icons: defaults.icons,
            notices: defaults.notices,
        }
    }

    /// Configuración pasada por la página host; los campos ausentes usan los defaults
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        serde_json::from_str(json)
            .map_err(|e| ScanError::Dom(format!("Configuración inválida: {}", e)))
    }

    /// Periodo del loop de anotación en ms
    pub fn annotate_period_ms(&self) -> u32 {
        1000 / self.annotate_fps.max(1)
    }
}

// Configuración global estática (solo defaults; cada widget recibe su propia copia)
lazy_static::lazy_static! {
    pub static ref CONFIG: ScannerConfig = ScannerConfig::from_env();
}
