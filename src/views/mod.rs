pub mod scanner;

pub use scanner::{mount_scanner, spawn_open, ScannerElements, ScannerWidget, WebScanSurface};
