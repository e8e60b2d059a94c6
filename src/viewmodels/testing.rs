// ============================================================================
// TEST DOUBLES - Cámara, detector, superficie y runtime en memoria
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use crate::config::ScannerConfig;
use crate::models::{BoundingBox, DetectedSymbol, FacingMode, FrameSource, IndicatorState, ScanError};
use crate::services::*;
use crate::viewmodels::{ScannerServices, ScannerViewModel};

pub const DECODE_MS: u32 = 500;
pub const ANNOTATE_MS: u32 = 33;
pub const INDICATOR_MS: u32 = 1000;

type Detection = Result<Vec<DetectedSymbol>, ScanError>;

// ----------------------------------------------------------------------------
// Runtime manual
// ----------------------------------------------------------------------------

enum TimerCallback {
    Every(Option<Box<dyn FnMut()>>),
    Once(Option<Box<dyn FnOnce()>>),
}

struct Timer {
    period_ms: u32,
    callback: TimerCallback,
    cancelled: Rc<Cell<bool>>,
}

impl Timer {
    fn is_live(&self) -> bool {
        if self.cancelled.get() {
            return false;
        }
        match &self.callback {
            TimerCallback::Every(_) => true,
            TimerCallback::Once(callback) => callback.is_some(),
        }
    }
}

pub struct TestRuntime {
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    timers: RefCell<Vec<Timer>>,
}

impl TestRuntime {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool: RefCell::new(pool),
            spawner,
            timers: RefCell::new(Vec::new()),
        }
    }

    /// Ejecutar todas las futures listas
    pub fn settle(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    pub fn spawn_result<T, F>(&self, future: F) -> Rc<RefCell<Option<T>>>
    where
        T: 'static,
        F: Future<Output = T> + 'static,
    {
        let slot = Rc::new(RefCell::new(None));
        let writer = slot.clone();
        self.spawner
            .spawn_local(async move {
                *writer.borrow_mut() = Some(future.await);
            })
            .expect("spawn en LocalPool");
        slot
    }

    /// Ejecutar una future hasta que se estanque y devolver su resultado
    pub fn run<T, F>(&self, future: F) -> Option<T>
    where
        T: 'static,
        F: Future<Output = T> + 'static,
    {
        let slot = self.spawn_result(future);
        self.settle();
        let result = slot.borrow_mut().take();
        result
    }

    pub fn live_timers(&self, period_ms: u32) -> usize {
        self.timers
            .borrow()
            .iter()
            .filter(|t| t.period_ms == period_ms && t.is_live())
            .count()
    }

    pub fn cancelled_timers(&self) -> usize {
        self.timers.borrow().iter().filter(|t| t.cancelled.get()).count()
    }

    /// Disparar todos los timers vivos con ese periodo y resolver las futures
    pub fn fire(&self, period_ms: u32) {
        let count = self.timers.borrow().len();
        for index in 0..count {
            let taken = {
                let mut timers = self.timers.borrow_mut();
                let timer = &mut timers[index];
                if timer.period_ms != period_ms || !timer.is_live() {
                    continue;
                }
                match &mut timer.callback {
                    TimerCallback::Every(callback) => callback.take().map(Fired::Every),
                    TimerCallback::Once(callback) => callback.take().map(Fired::Once),
                }
            };

            match taken {
                Some(Fired::Every(mut callback)) => {
                    callback();
                    let mut timers = self.timers.borrow_mut();
                    if let TimerCallback::Every(slot) = &mut timers[index].callback {
                        *slot = Some(callback);
                    }
                }
                Some(Fired::Once(callback)) => callback(),
                None => {}
            }
        }
        self.settle();
    }

    fn register(&self, period_ms: u32, callback: TimerCallback) -> TaskHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.timers.borrow_mut().push(Timer {
            period_ms,
            callback,
            cancelled: cancelled.clone(),
        });
        TaskHandle::new(move || cancelled.set(true))
    }
}

enum Fired {
    Every(Box<dyn FnMut()>),
    Once(Box<dyn FnOnce()>),
}

impl TaskRuntime for TestRuntime {
    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> TaskHandle {
        self.register(period_ms, TimerCallback::Every(Some(tick)))
    }

    fn after(&self, delay_ms: u32, tick: Box<dyn FnOnce()>) -> TaskHandle {
        self.register(delay_ms, TimerCallback::Once(Some(tick)))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner.spawn_local(task).expect("spawn en LocalPool");
    }
}

// ----------------------------------------------------------------------------
// Cámara
// ----------------------------------------------------------------------------

pub struct MockTrack {
    pub kind: TrackKind,
    pub stopped: Cell<bool>,
    pub fail_torch: Cell<bool>,
    pub torch_calls: RefCell<Vec<bool>>,
}

impl MockTrack {
    fn new(kind: TrackKind) -> Rc<Self> {
        Rc::new(Self {
            kind,
            stopped: Cell::new(false),
            fail_torch: Cell::new(false),
            torch_calls: RefCell::new(Vec::new()),
        })
    }
}

impl StreamTrack for MockTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn stop(&self) {
        self.stopped.set(true);
    }

    fn apply_torch(&self, enabled: bool) -> LocalBoxFuture<'static, Result<(), ScanError>> {
        self.torch_calls.borrow_mut().push(enabled);
        let result = if self.fail_torch.get() {
            Err(ScanError::TorchUnsupported("OverconstrainedError".to_string()))
        } else {
            Ok(())
        };
        Box::pin(async move { result })
    }
}

pub struct MockStream {
    pub video: Rc<MockTrack>,
    pub audio: Rc<MockTrack>,
    pub has_video: bool,
    pub bound: Cell<bool>,
}

impl MockStream {
    pub fn is_active(&self) -> bool {
        (self.has_video && !self.video.stopped.get()) || !self.audio.stopped.get()
    }
}

impl CameraStream for MockStream {
    fn tracks(&self) -> Vec<Rc<dyn StreamTrack>> {
        let video: Rc<dyn StreamTrack> = self.video.clone();
        let audio: Rc<dyn StreamTrack> = self.audio.clone();
        if self.has_video {
            vec![video, audio]
        } else {
            vec![audio]
        }
    }

    fn bind_preview(&self) -> LocalBoxFuture<'static, Result<(), ScanError>> {
        self.bound.set(true);
        Box::pin(async { Ok(()) })
    }

    fn unbind_preview(&self) {
        self.bound.set(false);
    }
}

#[derive(Default)]
pub struct MockCamera {
    pub requests: RefCell<Vec<FacingMode>>,
    pub streams: RefCell<Vec<Rc<MockStream>>>,
    pub failure: RefCell<Option<ScanError>>,
    /// Los próximos streams solo traen pista de audio
    pub audio_only: Cell<bool>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl MockCamera {
    /// La próxima adquisición espera hasta que se envíe por el canal
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        *self.gate.borrow_mut() = Some(receiver);
        sender
    }

    pub fn active_streams(&self) -> usize {
        self.streams.borrow().iter().filter(|s| s.is_active()).count()
    }

    pub fn last_stream(&self) -> Option<Rc<MockStream>> {
        self.streams.borrow().last().cloned()
    }
}

impl CameraService for MockCamera {
    fn acquire(&self, facing: FacingMode) -> LocalBoxFuture<'static, Result<Rc<dyn CameraStream>, ScanError>> {
        self.requests.borrow_mut().push(facing);
        let gate = self.gate.borrow_mut().take();

        let result: Result<Rc<dyn CameraStream>, ScanError> = match self.failure.borrow().clone() {
            Some(error) => Err(error),
            None => {
                let stream = Rc::new(MockStream {
                    video: MockTrack::new(TrackKind::Video),
                    audio: MockTrack::new(TrackKind::Audio),
                    has_video: !self.audio_only.get(),
                    bound: Cell::new(false),
                });
                self.streams.borrow_mut().push(stream.clone());
                Ok(stream as Rc<dyn CameraStream>)
            }
        };

        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        })
    }
}

// ----------------------------------------------------------------------------
// Detector
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct MockDetector {
    pub calls: RefCell<Vec<FrameSource>>,
    scripted: RefCell<VecDeque<Detection>>,
    deferred: RefCell<VecDeque<oneshot::Receiver<Detection>>>,
}

impl MockDetector {
    /// Respuesta de la próxima llamada (sin guion: lista vacía)
    pub fn push(&self, detection: Detection) {
        self.scripted.borrow_mut().push_back(detection);
    }

    /// La próxima llamada queda pendiente hasta que se envíe el resultado
    pub fn defer(&self) -> oneshot::Sender<Detection> {
        let (sender, receiver) = oneshot::channel();
        self.deferred.borrow_mut().push_back(receiver);
        sender
    }
}

impl BarcodeDetector for MockDetector {
    fn detect(&self, source: FrameSource) -> LocalBoxFuture<'static, Detection> {
        self.calls.borrow_mut().push(source);

        if let Some(receiver) = self.deferred.borrow_mut().pop_front() {
            return Box::pin(async move {
                receiver
                    .await
                    .unwrap_or_else(|_| Err(ScanError::DetectionFailed("cancelled".to_string())))
            });
        }

        let detection = self.scripted.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()));
        Box::pin(async move { detection })
    }
}

pub struct MockProvider {
    pub detector: Rc<MockDetector>,
    pub supported: Cell<bool>,
}

impl DetectorProvider for MockProvider {
    fn create(&self) -> Result<Rc<dyn BarcodeDetector>, ScanError> {
        if self.supported.get() {
            Ok(self.detector.clone() as Rc<dyn BarcodeDetector>)
        } else {
            Err(ScanError::CapabilityUnsupported)
        }
    }
}

// ----------------------------------------------------------------------------
// Superficie
// ----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Resize(u32, u32),
    Clear(u32, u32),
    Frame(u32, u32),
    Outline(BoundingBox),
}

pub struct MockSurface {
    pub frame: Cell<(u32, u32)>,
    pub playing: Cell<bool>,
    pub overlay: Cell<(u32, u32)>,
    pub ops: RefCell<Vec<SurfaceOp>>,
    pub published: RefCell<Option<String>>,
    pub status: RefCell<String>,
    pub indicator: Cell<Option<IndicatorState>>,
    pub controls_open: Cell<bool>,
    pub controls_calls: Cell<u32>,
    pub facing_label: Cell<Option<FacingMode>>,
    pub torch_icon: Cell<bool>,
    pub notices: RefCell<Vec<String>>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self {
            frame: Cell::new((640, 480)),
            playing: Cell::new(true),
            overlay: Cell::new((300, 150)),
            ops: RefCell::new(Vec::new()),
            published: RefCell::new(None),
            status: RefCell::new(String::new()),
            indicator: Cell::new(None),
            controls_open: Cell::new(false),
            controls_calls: Cell::new(0),
            facing_label: Cell::new(None),
            torch_icon: Cell::new(false),
            notices: RefCell::new(Vec::new()),
        }
    }

    pub fn outlines(&self) -> Vec<BoundingBox> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Outline(bounding_box) => Some(*bounding_box),
                _ => None,
            })
            .collect()
    }
}

impl ScanSurface for MockSurface {
    fn has_preview(&self) -> bool {
        true
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame.get()
    }

    fn is_playing(&self) -> bool {
        self.playing.get()
    }

    fn overlay_size(&self) -> (u32, u32) {
        self.overlay.get()
    }

    fn resize_overlay(&self, width: u32, height: u32) {
        self.overlay.set((width, height));
        self.ops.borrow_mut().push(SurfaceOp::Resize(width, height));
    }

    fn clear_overlay(&self, width: u32, height: u32) {
        self.ops.borrow_mut().push(SurfaceOp::Clear(width, height));
    }

    fn draw_frame(&self, width: u32, height: u32) {
        assert_eq!(self.overlay.get(), (width, height), "overlay sin redimensionar");
        self.ops.borrow_mut().push(SurfaceOp::Frame(width, height));
    }

    fn outline(&self, bounding_box: &BoundingBox) {
        self.ops.borrow_mut().push(SurfaceOp::Outline(*bounding_box));
    }

    fn publish_value(&self, value: &str) {
        *self.published.borrow_mut() = Some(value.to_string());
    }

    fn set_status_line(&self, text: &str) {
        *self.status.borrow_mut() = text.to_string();
    }

    fn set_indicator(&self, state: IndicatorState) {
        self.indicator.set(Some(state));
    }

    fn set_controls_open(&self, open: bool) {
        self.controls_open.set(open);
        self.controls_calls.set(self.controls_calls.get() + 1);
    }

    fn set_facing_label(&self, facing: FacingMode) {
        self.facing_label.set(Some(facing));
    }

    fn set_torch_icon(&self, enabled: bool) {
        self.torch_icon.set(enabled);
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}

// ----------------------------------------------------------------------------
// Harness
// ----------------------------------------------------------------------------

pub struct Harness {
    pub vm: ScannerViewModel,
    pub camera: Rc<MockCamera>,
    pub detector: Rc<MockDetector>,
    pub provider: Rc<MockProvider>,
    pub surface: Rc<MockSurface>,
    pub runtime: Rc<TestRuntime>,
    pub scanned: Rc<RefCell<Vec<String>>>,
    pub visibility_changes: Rc<Cell<u32>>,
}

impl Harness {
    pub fn new() -> Self {
        let camera = Rc::new(MockCamera::default());
        let detector = Rc::new(MockDetector::default());
        let provider = Rc::new(MockProvider {
            detector: detector.clone(),
            supported: Cell::new(true),
        });
        let surface = Rc::new(MockSurface::new());
        let runtime = Rc::new(TestRuntime::new());
        let scanned = Rc::new(RefCell::new(Vec::new()));
        let visibility_changes = Rc::new(Cell::new(0));

        let hooks = ScanHooks {
            on_scanned: Some({
                let scanned = scanned.clone();
                Rc::new(move |value: &str| scanned.borrow_mut().push(value.to_string()))
            }),
            on_visibility_change: Some({
                let visibility_changes = visibility_changes.clone();
                Rc::new(move || visibility_changes.set(visibility_changes.get() + 1))
            }),
        };

        let vm = ScannerViewModel::new(
            ScannerServices {
                camera: camera.clone(),
                detectors: provider.clone(),
                surface: surface.clone(),
                runtime: runtime.clone(),
                hooks,
            },
            ScannerConfig::default(),
        );

        Self {
            vm,
            camera,
            detector,
            provider,
            surface,
            runtime,
            scanned,
            visibility_changes,
        }
    }

    pub fn open(&self) -> Option<Result<(), ScanError>> {
        let vm = self.vm.clone();
        self.runtime.run(async move { vm.open().await })
    }
}
