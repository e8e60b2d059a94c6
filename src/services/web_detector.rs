// ============================================================================
// WEB DETECTOR - BarcodeDetector nativo sobre el video o el overlay
// ============================================================================

use std::rc::Rc;
use futures::future::LocalBoxFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlVideoElement};
use crate::models::{parse_detections, DetectedSymbol, FrameSource, ScanError};
use crate::services::traits::{BarcodeDetector, DetectorProvider};
use crate::utils::barcode_ffi;

fn detection_error(error: &JsValue) -> ScanError {
    ScanError::DetectionFailed(error.as_string().unwrap_or_else(|| format!("{:?}", error)))
}

pub struct WebDetectorProvider {
    video: HtmlVideoElement,
    overlay: HtmlCanvasElement,
}

impl WebDetectorProvider {
    pub fn new(video: HtmlVideoElement, overlay: HtmlCanvasElement) -> Self {
        Self { video, overlay }
    }
}

impl DetectorProvider for WebDetectorProvider {
    fn create(&self) -> Result<Rc<dyn BarcodeDetector>, ScanError> {
        if !barcode_ffi::is_barcode_detector_supported() {
            return Err(ScanError::CapabilityUnsupported);
        }

        let detector = barcode_ffi::BarcodeDetector::new().map_err(|e| {
            log::error!("❌ [DETECTOR] new BarcodeDetector() falló: {:?}", e);
            ScanError::CapabilityUnsupported
        })?;

        Ok(Rc::new(WebBarcodeDetector {
            detector,
            video: self.video.clone(),
            overlay: self.overlay.clone(),
        }) as Rc<dyn BarcodeDetector>)
    }
}

pub struct WebBarcodeDetector {
    detector: barcode_ffi::BarcodeDetector,
    video: HtmlVideoElement,
    overlay: HtmlCanvasElement,
}

impl BarcodeDetector for WebBarcodeDetector {
    fn detect(&self, source: FrameSource) -> LocalBoxFuture<'static, Result<Vec<DetectedSymbol>, ScanError>> {
        let image: JsValue = match source {
            FrameSource::Preview => self.video.clone().into(),
            FrameSource::Overlay => self.overlay.clone().into(),
        };
        let detecting = self.detector.detect(&image);

        Box::pin(async move {
            let promise = detecting.map_err(|e| detection_error(&e))?;
            let barcodes = JsFuture::from(promise).await.map_err(|e| detection_error(&e))?;

            // DetectedBarcode es un diccionario y boundingBox tiene toJSON()
            let json: String = js_sys::JSON::stringify(&barcodes)
                .map_err(|e| detection_error(&e))?
                .into();
            parse_detections(&json)
        })
    }
}
