// ============================================================================
// WEB CAMERA - getUserMedia + MediaStream sobre web_sys
// ============================================================================

use std::rc::Rc;
use futures::future::LocalBoxFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack, MediaTrackConstraints};
use crate::models::{FacingMode, ScanError};
use crate::services::traits::{CameraService, CameraStream, StreamTrack, TrackKind};

fn js_error_text(error: &JsValue) -> (String, String) {
    match error.dyn_ref::<DomException>() {
        Some(exception) => (exception.name(), exception.message()),
        None => (
            "Error".to_string(),
            error.as_string().unwrap_or_else(|| format!("{:?}", error)),
        ),
    }
}

fn camera_error(error: JsValue) -> ScanError {
    let (name, message) = js_error_text(&error);
    ScanError::from_camera_failure(&name, &message)
}

/// `{ facingMode, torch: false }`
fn video_constraints(facing: FacingMode) -> Result<MediaStreamConstraints, JsValue> {
    let video = js_sys::Object::new();
    js_sys::Reflect::set(&video, &JsValue::from_str("facingMode"), &JsValue::from_str(facing.as_constraint()))?;
    js_sys::Reflect::set(&video, &JsValue::from_str("torch"), &JsValue::from_bool(false))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video.into());
    Ok(constraints)
}

/// `{ advanced: [{ torch }] }`
fn torch_constraints(enabled: bool) -> Result<MediaTrackConstraints, JsValue> {
    let torch = js_sys::Object::new();
    js_sys::Reflect::set(&torch, &JsValue::from_str("torch"), &JsValue::from_bool(enabled))?;

    let advanced = js_sys::Array::new();
    advanced.push(&torch);

    let constraints = js_sys::Object::new();
    js_sys::Reflect::set(&constraints, &JsValue::from_str("advanced"), &advanced)?;
    Ok(constraints.unchecked_into::<MediaTrackConstraints>())
}

/// Servicio de cámara ligado al `<video>` de preview
pub struct WebCameraService {
    video: HtmlVideoElement,
}

impl WebCameraService {
    pub fn new(video: HtmlVideoElement) -> Self {
        Self { video }
    }
}

impl CameraService for WebCameraService {
    fn acquire(&self, facing: FacingMode) -> LocalBoxFuture<'static, Result<Rc<dyn CameraStream>, ScanError>> {
        let video = self.video.clone();

        Box::pin(async move {
            let window = web_sys::window()
                .ok_or_else(|| ScanError::CameraUnavailable("No window".to_string()))?;
            let media_devices = window
                .navigator()
                .media_devices()
                .map_err(|_| ScanError::CameraUnavailable("MediaDevices not available".to_string()))?;

            let constraints = video_constraints(facing).map_err(camera_error)?;
            let promise = media_devices
                .get_user_media_with_constraints(&constraints)
                .map_err(camera_error)?;
            let stream = JsFuture::from(promise)
                .await
                .map_err(camera_error)?
                .dyn_into::<MediaStream>()
                .map_err(|_| ScanError::CameraUnavailable("getUserMedia no devolvió un MediaStream".to_string()))?;

            log::info!("📷 [CAMERA] Stream adquirido ({} pistas)", stream.get_tracks().length());
            Ok(Rc::new(WebCameraStream { stream, video }) as Rc<dyn CameraStream>)
        })
    }
}

pub struct WebCameraStream {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl CameraStream for WebCameraStream {
    fn tracks(&self) -> Vec<Rc<dyn StreamTrack>> {
        self.stream
            .get_tracks()
            .iter()
            .filter_map(|track| track.dyn_into::<MediaStreamTrack>().ok())
            .map(|track| Rc::new(WebTrack { track }) as Rc<dyn StreamTrack>)
            .collect()
    }

    fn bind_preview(&self) -> LocalBoxFuture<'static, Result<(), ScanError>> {
        self.video.set_src_object(Some(&self.stream));
        let playing = self.video.play();

        Box::pin(async move {
            let promise = playing.map_err(|e| ScanError::CameraUnavailable(js_error_text(&e).1))?;
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| ScanError::CameraUnavailable(js_error_text(&e).1))
        })
    }

    fn unbind_preview(&self) {
        self.video.set_src_object(None);
    }
}

struct WebTrack {
    track: MediaStreamTrack,
}

impl StreamTrack for WebTrack {
    fn kind(&self) -> TrackKind {
        match self.track.kind().as_str() {
            "video" => TrackKind::Video,
            _ => TrackKind::Audio,
        }
    }

    fn stop(&self) {
        self.track.stop();
    }

    fn apply_torch(&self, enabled: bool) -> LocalBoxFuture<'static, Result<(), ScanError>> {
        let applying = torch_constraints(enabled)
            .and_then(|constraints| self.track.apply_constraints_with_constraints(&constraints));

        Box::pin(async move {
            let unsupported = |e: JsValue| {
                let (name, message) = js_error_text(&e);
                ScanError::TorchUnsupported(format!("{}: {}", name, message))
            };
            let promise = applying.map_err(unsupported)?;
            JsFuture::from(promise).await.map(|_| ()).map_err(unsupported)
        })
    }
}
