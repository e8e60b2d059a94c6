pub mod scanner_viewmodel;

#[cfg(test)]
pub mod testing;

pub use scanner_viewmodel::{ScannerServices, ScannerViewModel};
