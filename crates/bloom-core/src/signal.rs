//! Shared state between the capture path (single writer) and the render tick
//! (readers).
//!
//! [`SignalCell`] holds only the most recent [`GestureSignal`]: writes
//! overwrite, reads copy out a snapshot, nothing is queued. The generation
//! counter lets a reader tell whether it has already seen the value.

use crate::config::GestureConfig;
use crate::gesture::{GestureInterpreter, GestureSignal};
use crate::landmark::FrameResult;
use crate::photos::{PhotoLibrary, PhotoRef};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SignalCell {
    value: RwLock<GestureSignal>,
    generation: AtomicU64,
}

impl SignalCell {
    pub fn new(initial: GestureSignal) -> Self {
        Self {
            value: RwLock::new(initial),
            generation: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, signal: GestureSignal) -> u64 {
        let mut guard = self.value.write();
        *guard = signal;
        // bumped under the lock so a reader never pairs a new value with an old generation
        self.generation.fetch_add(1, Ordering::Release) + 1
    }

    pub fn snapshot(&self) -> GestureSignal {
        *self.value.read()
    }

    /// Snapshot plus the generation it belongs to.
    pub fn snapshot_with_generation(&self) -> (GestureSignal, u64) {
        let guard = self.value.read();
        (*guard, self.generation.load(Ordering::Acquire))
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

/// Process-wide state passed explicitly to the capture path and the frame loop.
#[derive(Debug)]
pub struct BloomContext {
    signal: SignalCell,
    interpreter: Mutex<GestureInterpreter>,
    camera_ready: AtomicBool,
    capturing: AtomicBool,
    photos: RwLock<PhotoLibrary>,
    photo_generation: AtomicU64,
    hidden_message: RwLock<String>,
}

pub const DEFAULT_HIDDEN_MESSAGE: &str = "Love you. Happy Valentine's Day";

impl BloomContext {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            signal: SignalCell::default(),
            interpreter: Mutex::new(GestureInterpreter::new(config)),
            camera_ready: AtomicBool::new(false),
            capturing: AtomicBool::new(true),
            photos: RwLock::new(PhotoLibrary::default()),
            photo_generation: AtomicU64::new(0),
            hidden_message: RwLock::new(DEFAULT_HIDDEN_MESSAGE.to_string()),
        }
    }

    /// The single ingestion entry point. Frames arriving after
    /// [`stop_capture`](Self::stop_capture) are dropped.
    pub fn on_frame(&self, frame: &FrameResult) -> GestureSignal {
        // the capture flag only flips under this lock, so a stop cannot land
        // between the check and the publish
        let mut interpreter = self.interpreter.lock();
        if !self.is_capturing() {
            return self.signal.snapshot();
        }
        let signal = interpreter.interpret(frame);
        self.signal.publish(signal);
        signal
    }

    /// Parse and ingest a JSON payload. A malformed payload counts as a frame
    /// with no hands.
    pub fn on_frame_json(&self, payload: &str) -> GestureSignal {
        match FrameResult::from_json(payload) {
            Ok(frame) => self.on_frame(&frame),
            Err(e) => {
                log::warn!("[ingest] dropping payload: {}", e);
                self.on_frame(&FrameResult::empty())
            }
        }
    }

    pub fn snapshot(&self) -> GestureSignal {
        self.signal.snapshot()
    }

    pub fn signal(&self) -> &SignalCell {
        &self.signal
    }

    pub fn ready(&self) -> bool {
        self.camera_ready.load(Ordering::Acquire)
    }

    /// Losing the camera clears detection and gallery mode.
    pub fn set_camera_ready(&self, ready: bool) {
        let was = self.camera_ready.swap(ready, Ordering::AcqRel);
        if was != ready {
            log::info!("[camera] ready = {}", ready);
        }
        if !ready {
            self.signal.publish(GestureSignal::IDLE);
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::Acquire)
    }

    pub fn start_capture(&self) {
        let _interpreter = self.interpreter.lock();
        if !self.capturing.swap(true, Ordering::AcqRel) {
            log::info!("[capture] started");
        }
    }

    /// Idempotent. The first call publishes the idle signal so the engine
    /// settles into the contracted heart rather than freezing mid-gesture.
    pub fn stop_capture(&self) {
        let _interpreter = self.interpreter.lock();
        if self.capturing.swap(false, Ordering::AcqRel) {
            self.signal.publish(GestureSignal::IDLE);
            log::info!("[capture] stopped");
        }
    }

    pub fn reset(&self) {
        self.signal.publish(GestureSignal::IDLE);
        log::info!("[context] reset");
    }

    pub fn photos(&self) -> Vec<PhotoRef> {
        self.photos.read().active()
    }

    pub fn photo_generation(&self) -> u64 {
        self.photo_generation.load(Ordering::Acquire)
    }

    pub fn set_photos(&self, photos: Vec<PhotoRef>) {
        self.photos.write().set_photos(photos);
        self.photo_generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn upload_photos<I, S>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let accepted = self.photos.write().replace_with_uploads(urls);
        self.photo_generation.fetch_add(1, Ordering::AcqRel);
        accepted
    }

    pub fn hidden_message(&self) -> String {
        self.hidden_message.read().clone()
    }

    pub fn set_hidden_message(&self, message: impl Into<String>) {
        *self.hidden_message.write() = message.into();
    }
}

impl Default for BloomContext {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
