mod gpu;
mod sim;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use bloom_core::{BloomConfig, BloomContext, FrameLoop};
use clap::Parser;
use parking_lot::Mutex;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use gpu::GpuState;
use sim::{spawn_hand_source, SimControls, SimHandSource, StdinHandSource};

#[derive(Parser, Debug)]
#[command(name = "heartbloom", about = "Gesture-driven photo heart (native)")]
struct Args {
    /// JSON config file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of display objects
    #[arg(long)]
    objects: Option<usize>,

    /// Read detector frames as JSON lines from stdin instead of simulating a hand
    #[arg(long)]
    stdin_landmarks: bool,

    /// Seed for the layout jitter
    #[arg(long)]
    seed: Option<u64>,
}

fn load_config(args: &Args) -> anyhow::Result<BloomConfig> {
    let mut config = match &args.config {
        Some(path) => BloomConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BloomConfig::default(),
    };
    if let Some(n) = args.objects {
        config.layout.object_count = n;
    }
    if args.seed.is_some() {
        config.layout.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    log::info!(
        "[main] {} objects, thresholds {:.2}/{:.2}",
        config.layout.object_count,
        config.transition.contract_threshold,
        config.transition.reveal_threshold
    );

    let context = Arc::new(BloomContext::new(config.gesture.clone()));
    let mut frame_loop = FrameLoop::new(Arc::clone(&context), &config);
    let shutdown = Arc::new(AtomicBool::new(false));
    let controls = Arc::new(Mutex::new(SimControls::default()));

    let _source = if args.stdin_landmarks {
        spawn_hand_source("stdin-hands", StdinHandSource, Arc::clone(&context), Arc::clone(&shutdown))?
    } else {
        let source = SimHandSource {
            controls: Arc::clone(&controls),
        };
        spawn_hand_source("sim-hands", source, Arc::clone(&context), Arc::clone(&shutdown))?
    };

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("heartbloom")
        .build(&event_loop)?;
    let mut state = pollster::block_on(GpuState::new(&window))?;
    let (w, h) = state.size();
    frame_loop.engine_mut().resize(w, h);
    let mut title = String::new();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            state.resize(size);
            frame_loop.engine_mut().resize(size.width, size.height);
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => {
            shutdown.store(true, Ordering::Release);
            elwt.exit();
        }
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => {
            let (w, h) = state.size();
            let x = (position.x as f32 / w as f32).clamp(0.0, 1.0);
            let y = (position.y as f32 / h as f32).clamp(0.0, 1.0);
            let mut c = controls.lock();
            c.cursor = [x, y];
            c.openness = 1.0 - y;
        }
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => match logical_key.as_ref() {
            Key::Named(NamedKey::Escape) => {
                shutdown.store(true, Ordering::Release);
                elwt.exit();
            }
            Key::Named(NamedKey::Space) => {
                if context.is_capturing() {
                    context.stop_capture();
                } else {
                    context.start_capture();
                }
            }
            Key::Character("g") | Key::Character("G") => {
                let mut c = controls.lock();
                c.second_hand = !c.second_hand;
            }
            Key::Character("h") | Key::Character("H") => {
                let mut c = controls.lock();
                c.hand_visible = !c.hand_visible;
            }
            Key::Character("r") | Key::Character("R") => {
                *controls.lock() = SimControls::default();
                context.reset();
            }
            _ => {}
        },
        Event::AboutToWait => {
            frame_loop.frame();
            let summary = frame_loop.status().summary();
            if summary != title {
                state.window.set_title(&format!("heartbloom - {}", summary));
                title = summary;
            }
            let engine = frame_loop.engine();
            let mut instances = engine.instances();
            match state.render(engine.camera(), &mut instances) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    shutdown.store(true, Ordering::Release);
                    elwt.exit();
                }
                Err(e) => log::warn!("[gpu] surface error: {:?}", e),
            }
        }
        _ => {}
    })?;
    Ok(())
}
