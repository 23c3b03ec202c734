//! Hand sources for the desktop build.
//!
//! Both sources feed the same [`BloomContext::on_frame`] path a real detector
//! would: [`SimHandSource`] synthesizes 21-point hands from mouse/keyboard
//! state, [`StdinHandSource`] forwards JSON frames printed by an external
//! detector process (one frame per line).

use bloom_core::{BloomContext, FrameResult, HandObservation, LANDMARKS_PER_HAND};
use parking_lot::Mutex;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Anything that can push hand frames into the shared context from its own thread.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, ctx: Arc<BloomContext>, shutdown: Arc<AtomicBool>);
}

/// Spawn a hand source on its own named thread.
pub fn spawn_hand_source<S: HandSource>(
    name: &str,
    source: S,
    ctx: Arc<BloomContext>,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name(name.into())
        .spawn(move || Box::new(source).run(ctx, shutdown))?;
    Ok(handle)
}

/// Window-side controls the simulated detector reads every capture frame.
#[derive(Clone, Copy, Debug)]
pub struct SimControls {
    /// 0 = closed pinch, 1 = wide open. Driven by cursor height.
    pub openness: f32,
    /// Cursor position in [0, 1]² (camera image space, not mirrored).
    pub cursor: [f32; 2],
    pub hand_visible: bool,
    pub second_hand: bool,
}

impl Default for SimControls {
    fn default() -> Self {
        Self {
            openness: 0.0,
            cursor: [0.5, 0.5],
            hand_visible: true,
            second_hand: false,
        }
    }
}

// Geometry of the synthetic hand in detector-normalized units
const SIM_PALM: f32 = 0.1;
const SIM_PINCH_MIN: f32 = 0.02;
const SIM_PINCH_MAX: f32 = 0.13; // a bit past full tension so the reveal is reachable
const SIM_CAPTURE_INTERVAL: Duration = Duration::from_millis(33);

/// A plausible open-palm hand with the thumb/index gap set by `openness`.
pub fn synth_hand(anchor: [f32; 2], openness: f32) -> HandObservation {
    let [ax, ay] = anchor;
    let pinch = SIM_PINCH_MIN + (SIM_PINCH_MAX - SIM_PINCH_MIN) * openness.clamp(0.0, 1.0);
    let mut pts = [[0.0f32; 3]; LANDMARKS_PER_HAND];
    pts[0] = [ax, ay + SIM_PALM, 0.0]; // wrist
    // thumb chain, tip at 4
    let thumb_tip = [ax - 0.03 - pinch * 0.5, ay - 0.03, -0.02];
    for (k, i) in (1..=4).enumerate() {
        let f = (k + 1) as f32 / 4.0;
        pts[i] = lerp3(pts[0], thumb_tip, f);
    }
    // finger bases 5, 9, 13, 17 and their chains
    let index_tip = [ax - 0.03 + pinch * 0.5, ay - 0.03, -0.02];
    for (finger, base_x) in [-0.03f32, 0.0, 0.025, 0.045].into_iter().enumerate() {
        let base = 5 + finger * 4;
        pts[base] = [ax + base_x, ay, 0.0];
        let tip = if finger == 0 {
            index_tip
        } else {
            [ax + base_x, ay - 0.08 + 0.01 * finger as f32, -0.01]
        };
        for j in 1..4 {
            pts[base + j] = lerp3(pts[base], tip, j as f32 / 3.0);
        }
    }
    HandObservation::from_points(&pts)
}

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

pub struct SimHandSource {
    pub controls: Arc<Mutex<SimControls>>,
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, ctx: Arc<BloomContext>, shutdown: Arc<AtomicBool>) {
        ctx.set_camera_ready(true);
        log::info!("[sim] simulated hand source running");
        while !shutdown.load(Ordering::Acquire) {
            let c = *self.controls.lock();
            let mut hands = Vec::with_capacity(2);
            if c.hand_visible {
                hands.push(synth_hand(c.cursor, c.openness));
                if c.second_hand {
                    let mirrored = [1.0 - c.cursor[0], c.cursor[1]];
                    hands.push(synth_hand(mirrored, c.openness));
                }
            }
            ctx.on_frame(&FrameResult::from_hands(hands));
            thread::sleep(SIM_CAPTURE_INTERVAL);
        }
    }
}

pub struct StdinHandSource;

impl HandSource for StdinHandSource {
    fn run(self: Box<Self>, ctx: Arc<BloomContext>, shutdown: Arc<AtomicBool>) {
        log::info!("[stdin] reading landmark frames from stdin");
        let stdin = std::io::stdin();
        let mut frames = 0u64;
        for line in stdin.lock().lines() {
            if shutdown.load(Ordering::Acquire) {
                break;
            }
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    log::error!("[stdin] read error: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            if frames == 0 {
                ctx.set_camera_ready(true);
            }
            frames += 1;
            ctx.on_frame_json(&line);
        }
        log::info!("[stdin] detector stream closed after {} frames", frames);
        ctx.stop_capture();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_core::{select_mode, DisplayMode, GestureConfig, GestureInterpreter, TransitionConfig};

    fn interpret(hands: Vec<HandObservation>) -> bloom_core::GestureSignal {
        GestureInterpreter::new(GestureConfig::default()).interpret(&FrameResult::from_hands(hands))
    }

    #[test]
    fn closed_hand_reads_as_zero_tension() {
        let signal = interpret(vec![synth_hand([0.5, 0.5], 0.0)]);
        assert!(signal.detected);
        assert!(signal.tension < 1e-4, "tension {}", signal.tension);
        let mode = select_mode(signal.gallery_mode, signal.tension, &TransitionConfig::default());
        assert_eq!(mode, DisplayMode::Contracted);
    }

    #[test]
    fn open_hand_reaches_the_reveal() {
        let signal = interpret(vec![synth_hand([0.3, 0.6], 1.0)]);
        assert!(signal.detected);
        assert_eq!(signal.tension, 1.0);
        let mode = select_mode(signal.gallery_mode, signal.tension, &TransitionConfig::default());
        assert_eq!(mode, DisplayMode::Reveal);
    }

    #[test]
    fn openness_is_clamped() {
        let wide = interpret(vec![synth_hand([0.5, 0.5], 5.0)]);
        let shut = interpret(vec![synth_hand([0.5, 0.5], -2.0)]);
        assert_eq!(wide.tension, 1.0);
        assert!(shut.tension < 1e-4);
    }

    #[test]
    fn second_hand_forces_gallery() {
        let hands = vec![synth_hand([0.4, 0.5], 1.0), synth_hand([0.6, 0.5], 1.0)];
        let signal = interpret(hands);
        assert!(signal.gallery_mode);
        let mode = select_mode(signal.gallery_mode, signal.tension, &TransitionConfig::default());
        assert_eq!(mode, DisplayMode::Gallery);
    }
}
