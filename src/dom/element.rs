// ============================================================================
// ELEMENT HELPERS - Funciones básicas para manipular DOM
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

/// Obtener window global
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Obtener document
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Obtener elemento por ID
pub fn get_element_by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

/// Obtener elemento por ID con su tipo concreto (HtmlVideoElement, HtmlCanvasElement, ...)
pub fn get_typed_by_id<T: JsCast>(id: &str) -> Result<T, JsValue> {
    get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("No #{} element found", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{} has an unexpected element type", id)))
}

/// Variante opcional: `None` si no existe o no es del tipo pedido
pub fn find_typed_by_id<T: JsCast>(id: &str) -> Option<T> {
    get_element_by_id(id)?.dyn_into::<T>().ok()
}

/// Query selector (buscar elemento por selector CSS)
pub fn query_selector(selector: &str) -> Result<Option<Element>, JsValue> {
    document()
        .ok_or_else(|| JsValue::from_str("No document"))?
        .query_selector(selector)
}

/// Establecer `style.display`
pub fn set_display(element: &HtmlElement, display: &str) {
    if let Err(e) = element.style().set_property("display", display) {
        log::warn!("⚠️ [DOM] No se pudo cambiar display: {:?}", e);
    }
}

/// Establecer `style.color`
pub fn set_color(element: &HtmlElement, color: &str) {
    if let Err(e) = element.style().set_property("color", color) {
        log::warn!("⚠️ [DOM] No se pudo cambiar color: {:?}", e);
    }
}

/// Poner o quitar una clase
pub fn set_class(element: &Element, class: &str, enabled: bool) -> Result<(), JsValue> {
    element.class_list().toggle_with_force(class, enabled).map(|_| ())
}
