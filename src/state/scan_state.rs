// ============================================================================
// SCAN STATE - Estado de la sesión de escaneo
// ============================================================================
// Vive dentro del ScannerViewModel (Rc<RefCell>), nunca como singleton.
// Cada open/close incrementa `generation`: las detecciones en vuelo
// comparan su generación antes de tocar la UI.
// ============================================================================

use std::rc::Rc;
use crate::models::{FacingMode, SessionSnapshot};
use crate::services::{BarcodeDetector, CameraStream, TaskHandle};

pub struct ScanState {
    pub facing_mode: FacingMode,
    pub torch_enabled: bool,
    pub stream: Option<Rc<dyn CameraStream>>,
    pub detector: Option<Rc<dyn BarcodeDetector>>,
    /// Hay un getUserMedia pendiente
    pub opening: bool,
    generation: u64,
    pub decode_task: Option<TaskHandle>,
    pub annotate_task: Option<TaskHandle>,
    pub indicator_task: Option<TaskHandle>,
}

impl ScanState {
    pub fn new(facing_mode: FacingMode) -> Self {
        Self {
            facing_mode,
            torch_enabled: false,
            stream: None,
            detector: None,
            opening: false,
            generation: 0,
            decode_task: None,
            annotate_task: None,
            indicator_task: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalida cualquier trabajo en vuelo de la sesión anterior
    pub fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Marca el inicio de un open y devuelve su generación
    pub fn begin_opening(&mut self) -> u64 {
        self.opening = true;
        self.invalidate()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// La generación sigue vigente y hay stream activo
    pub fn is_live(&self, generation: u64) -> bool {
        self.is_current(generation) && self.stream.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            facing_mode: self.facing_mode,
            torch_enabled: self.torch_enabled,
            active: self.is_active(),
        }
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new(FacingMode::default())
    }
}
