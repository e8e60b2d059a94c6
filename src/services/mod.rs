// ============================================================================
// SERVICES - Cámara, detector y runtime de tareas
// ============================================================================
// Los traits son comunes a todas las plataformas; las implementaciones web
// solo compilan en wasm32.
// ============================================================================

pub mod traits;
pub mod runtime;

#[cfg(target_arch = "wasm32")]
pub mod web_camera;
#[cfg(target_arch = "wasm32")]
pub mod web_detector;
#[cfg(target_arch = "wasm32")]
pub mod web_runtime;

pub use traits::*;
pub use runtime::*;
