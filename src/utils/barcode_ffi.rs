// ============================================================================
// BARCODE DETECTOR FFI - Bindings a la Shape Detection API del navegador
// ============================================================================
// Solo wrappers para el objeto JS - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// `BarcodeDetector` nativo
    pub type BarcodeDetector;

    #[wasm_bindgen(constructor, catch)]
    pub fn new() -> Result<BarcodeDetector, JsValue>;

    /// Devuelve una Promise<DetectedBarcode[]>
    #[wasm_bindgen(method, catch)]
    pub fn detect(this: &BarcodeDetector, source: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// `'BarcodeDetector' in window`
pub fn is_barcode_detector_supported() -> bool {
    web_sys::window()
        .and_then(|window| js_sys::Reflect::has(&window, &JsValue::from_str("BarcodeDetector")).ok())
        .unwrap_or(false)
}
