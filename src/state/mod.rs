// ============================================================================
// STATE MODULE - Estado de sesión con Rc<RefCell>
// ============================================================================

pub mod scan_state;

pub use scan_state::*;
