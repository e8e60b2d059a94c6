// Utils compartidos

#[cfg(target_arch = "wasm32")]
pub mod barcode_ffi;
#[cfg(target_arch = "wasm32")]
pub mod host_ffi;
