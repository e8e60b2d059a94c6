// ============================================================================
// TASK RUNTIME - Timers y futures en el hilo de UI
// ============================================================================
// En el navegador todo corre en un único hilo: los timers y las futures
// spawneadas se ejecutan de forma cooperativa, sin locks.
// ============================================================================

use futures::future::LocalBoxFuture;

/// Handle de una tarea programada; al hacer drop se cancela
pub struct TaskHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancelar explícitamente (equivalente a drop)
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Planificador de tareas periódicas y asíncronas
pub trait TaskRuntime {
    /// Ejecutar `tick` cada `period_ms` hasta que se suelte el handle
    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> TaskHandle;

    /// Ejecutar `tick` una vez tras `delay_ms`
    fn after(&self, delay_ms: u32, tick: Box<dyn FnOnce()>) -> TaskHandle;

    /// Lanzar una future en el hilo actual
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
