// ============================================================================
// BARCODE SCANNER PWA - WIDGET DE ESCANEO (RUST PURO + MVVM)
// ============================================================================
// Arquitectura MVVM:
// - Views: Superficie DOM del scanner (sin lógica)
// - ViewModels: Sesión de cámara + bucles de decode/anotación/indicador
// - Services: Cámara, BarcodeDetector y temporizadores detrás de traits
// - State: Estado de la sesión con Rc<RefCell>
// - Models: Detecciones, modos de cámara y errores
// ============================================================================

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod views;

pub use config::{ScannerConfig, CONFIG};
pub use models::{FacingMode, IndicatorState, ScanError, SessionSnapshot};
pub use viewmodels::{ScannerServices, ScannerViewModel};

#[cfg(target_arch = "wasm32")]
pub use wasm_entry::*;

#[cfg(target_arch = "wasm32")]
mod wasm_entry {
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;
    use wasm_logger::Config;
    use crate::config::{ScannerConfig, CONFIG};
    use crate::views::{mount_scanner, spawn_open, ScannerWidget};

    // Instancia global del widget montado
    thread_local! {
        static SCANNER: RefCell<Option<ScannerWidget>> = RefCell::new(None);
    }

    fn replace_scanner(config: ScannerConfig) -> Result<(), JsValue> {
        // El widget anterior suelta sus listeners antes de registrar los nuevos
        unmount_scanner();
        let widget = mount_scanner(config)?;
        SCANNER.with(|cell| *cell.borrow_mut() = Some(widget));
        Ok(())
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        wasm_logger::init(Config::default());
        log::info!("🚀 Barcode Scanner - Rust Puro + MVVM");

        crate::dom::on_dom_ready(|| {
            if let Err(e) = replace_scanner(CONFIG.clone()) {
                // La página puede no tener el widget: no es un error fatal
                log::warn!("⚠️ [MAIN] Scanner no montado: {:?}", e);
            }
        })
    }

    /// Re-montar el scanner con configuración JSON (llamable desde JavaScript)
    #[wasm_bindgen]
    pub fn mount_scanner_with_config(json: &str) -> Result<(), JsValue> {
        let config = ScannerConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        replace_scanner(config)
    }

    /// Cerrar la cámara y parar el indicador
    #[wasm_bindgen]
    pub fn unmount_scanner() {
        SCANNER.with(|cell| {
            if let Some(widget) = cell.borrow_mut().take() {
                widget.unmount();
            }
        });
    }

    /// Abrir la cámara desde JavaScript
    #[wasm_bindgen]
    pub fn open_scanner() {
        SCANNER.with(|cell| match cell.borrow().as_ref() {
            Some(widget) => spawn_open(widget.view_model()),
            None => log::warn!("⚠️ [MAIN] Scanner no está montado"),
        });
    }

    /// Cerrar la cámara desde JavaScript
    #[wasm_bindgen]
    pub fn close_scanner() {
        SCANNER.with(|cell| {
            if let Some(widget) = cell.borrow().as_ref() {
                widget.view_model().close();
            }
        });
    }
}
