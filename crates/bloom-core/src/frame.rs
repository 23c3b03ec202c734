//! Per-refresh scheduling: read the latest signal once, then update every
//! object from that one snapshot. The loop never waits for a fresh signal;
//! if capture is slower than the display the previous value is reused.

use crate::config::BloomConfig;
use crate::gesture::GestureSignal;
use crate::hud::{hud_status, HudStatus};
use crate::signal::BloomContext;
use crate::transition::TransitionEngine;
use instant::Instant;
use std::sync::Arc;
use std::time::Duration;

pub struct FrameLoop {
    context: Arc<BloomContext>,
    engine: TransitionEngine,
    last_instant: Instant,
    last_signal_generation: u64,
    photo_generation: u64,
    stale_ticks: u64,
}

impl FrameLoop {
    pub fn new(context: Arc<BloomContext>, config: &BloomConfig) -> Self {
        let photos = context.photos();
        let engine = TransitionEngine::new(config, &photos);
        let photo_generation = context.photo_generation();
        Self {
            context,
            engine,
            last_instant: Instant::now(),
            last_signal_generation: 0,
            photo_generation,
            stale_ticks: 0,
        }
    }

    /// Advance by wall-clock time since the previous call.
    pub fn frame(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        self.advance(dt);
        dt
    }

    /// Advance by an explicit step. Returns the signal used for this tick.
    pub fn advance(&mut self, dt: Duration) -> GestureSignal {
        let (signal, generation) = self.context.signal().snapshot_with_generation();
        if generation == self.last_signal_generation {
            self.stale_ticks += 1;
        } else {
            if self.stale_ticks > 0 {
                log::trace!("[frame] signal reused for {} ticks", self.stale_ticks);
            }
            self.stale_ticks = 0;
            self.last_signal_generation = generation;
        }

        let photo_generation = self.context.photo_generation();
        if photo_generation != self.photo_generation {
            self.photo_generation = photo_generation;
            self.engine.assign_photos(&self.context.photos());
        }

        self.engine.tick(&signal, dt.as_secs_f32());
        signal
    }

    pub fn context(&self) -> &Arc<BloomContext> {
        &self.context
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TransitionEngine {
        &mut self.engine
    }

    /// Ticks in a row that reused an already-seen signal.
    pub fn stale_ticks(&self) -> u64 {
        self.stale_ticks
    }

    pub fn status(&self) -> HudStatus {
        let signal = self.context.snapshot();
        hud_status(
            &signal,
            self.context.ready(),
            self.engine.mode(),
            &self.context.hidden_message(),
        )
    }
}
