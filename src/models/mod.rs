pub mod detection;
pub mod session;
pub mod error;

pub use detection::{BoundingBox, DetectedSymbol, FrameSource, canonical_value, parse_detections};
pub use session::{FacingMode, IndicatorState, SessionSnapshot};
pub use error::ScanError;
