// ============================================================================
// WEB RUNTIME - TaskRuntime sobre gloo_timers + spawn_local
// ============================================================================

use futures::future::LocalBoxFuture;
use gloo_timers::callback::{Interval, Timeout};
use crate::services::runtime::{TaskHandle, TaskRuntime};

/// Runtime del navegador: setInterval / setTimeout y microtareas de wasm_bindgen_futures
pub struct WebRuntime;

impl TaskRuntime for WebRuntime {
    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> TaskHandle {
        let interval = Interval::new(period_ms, move || tick());
        // Soltar el Interval hace clearInterval
        TaskHandle::new(move || drop(interval))
    }

    fn after(&self, delay_ms: u32, tick: Box<dyn FnOnce()>) -> TaskHandle {
        let timeout = Timeout::new(delay_ms, move || tick());
        TaskHandle::new(move || drop(timeout))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
