// ============================================================================
// EVENT HANDLING - Listeners de los controles del widget
// ============================================================================
// EventListener guarda el closure y lo desregistra en drop: al re-montar el
// scanner los botones no acumulan handlers del widget anterior.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

/// Listener registrado en un elemento; se elimina al hacer drop
pub struct EventListener {
    element: Element,
    event_type: &'static str,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

impl EventListener {
    /// Crear click listener
    pub fn click<F>(element: &Element, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(MouseEvent) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
        element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        Ok(Self {
            element: element.clone(),
            event_type: "click",
            closure,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback(self.event_type, self.closure.as_ref().unchecked_ref());
    }
}

/// `document.readyState` pasa de "loading" a "interactive" y luego "complete"
fn is_parsed(ready_state: &str) -> bool {
    ready_state != "loading"
}

/// Ejecutar `handler` una vez cuando el documento termine de cargar
pub fn on_dom_ready<F>(handler: F) -> Result<(), JsValue>
where
    F: FnOnce() + 'static,
{
    let document = crate::dom::document().ok_or_else(|| JsValue::from_str("No document"))?;

    if is_parsed(&document.ready_state()) {
        handler();
        return Ok(());
    }

    // Listener global de un solo uso: se registra una vez al arrancar
    let callback = Closure::once_into_js(handler);
    document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
}
