// ============================================================================
// HOST FFI - Hooks opcionales definidos por la página (searchProduct, ...)
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub const SEARCH_PRODUCT: &str = "searchProduct";
pub const UPDATE_BUTTON_VISIBILITY: &str = "updateButtonVisibility";

/// Llamar `window[name](...args)` si la página lo define.
/// Devuelve `false` si la función no existe o lanzó una excepción.
pub fn call_host_function(name: &str, args: &[JsValue]) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };

    let function = match js_sys::Reflect::get(&window, &JsValue::from_str(name)) {
        Ok(value) => match value.dyn_into::<js_sys::Function>() {
            Ok(function) => function,
            Err(_) => return false,
        },
        Err(_) => return false,
    };

    let js_args: js_sys::Array = args.iter().collect();
    match function.apply(&window, &js_args) {
        Ok(_) => true,
        Err(e) => {
            log::error!("❌ [HOST] {} lanzó una excepción: {:?}", name, e);
            false
        }
    }
}
