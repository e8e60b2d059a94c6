use serde::{Deserialize, Serialize};

/// Cámara seleccionada
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    Front,
    #[default]
    Environment,
}

impl FacingMode {
    /// Valor de `facingMode` para getUserMedia
    pub fn as_constraint(&self) -> &'static str {
        match self {
            FacingMode::Front => "user",
            FacingMode::Environment => "environment",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Environment,
            FacingMode::Environment => FacingMode::Front,
        }
    }

    /// Texto del botón de cambio de cámara
    pub fn button_label(&self) -> &'static str {
        match self {
            FacingMode::Front => "Front Cam",
            FacingMode::Environment => "Face Cam",
        }
    }
}

/// Estado del indicador de liveness del detector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorState {
    Detected,
    Ready,
    Idle,
}

impl IndicatorState {
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorState::Detected => "Detected",
            IndicatorState::Ready => "Ready",
            IndicatorState::Idle => "Idle",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            IndicatorState::Detected => "green",
            IndicatorState::Ready => "blue",
            IndicatorState::Idle => "red",
        }
    }
}

/// Snapshot público de la sesión
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub facing_mode: FacingMode,
    pub torch_enabled: bool,
    pub active: bool,
}
