// Host-side tests for the shared context: latest-value signal cell,
// capture lifecycle and photo updates.

use bloom_core::*;
use std::sync::Arc;
use std::thread;

fn open_hand() -> HandObservation {
    let mut pts = [[0.5f32, 0.5, 0.0]; LANDMARKS_PER_HAND];
    pts[WRIST] = [0.0, 0.0, 0.0];
    pts[MIDDLE_MCP] = [0.0, 0.1, 0.0];
    pts[INDEX_TIP] = [0.8, 0.5, 0.0];
    HandObservation::from_points(&pts)
}

#[test]
fn cell_keeps_only_the_latest_value() {
    let cell = SignalCell::default();
    assert_eq!(cell.generation(), 0);
    for t in [0.1f32, 0.2, 0.3] {
        cell.publish(GestureSignal {
            detected: true,
            tension: t,
            ..GestureSignal::IDLE
        });
    }
    let (signal, generation) = cell.snapshot_with_generation();
    assert_eq!(generation, 3);
    assert_eq!(signal.tension, 0.3);
    // reading does not consume
    assert_eq!(cell.snapshot(), signal);
    assert_eq!(cell.generation(), 3);
}

#[test]
fn concurrent_writer_never_tears_a_snapshot() {
    let cell = Arc::new(SignalCell::default());
    let writer = {
        let cell = Arc::clone(&cell);
        thread::spawn(move || {
            for i in 0..2000 {
                let t = (i % 100) as f32 / 100.0;
                cell.publish(GestureSignal {
                    detected: true,
                    tension: t,
                    reference_position: glam::Vec2::new(t, t),
                    gallery_mode: false,
                });
            }
        })
    };
    for _ in 0..2000 {
        let s = cell.snapshot();
        if s.detected {
            assert_eq!(s.reference_position.x, s.tension);
            assert_eq!(s.reference_position.y, s.tension);
        }
    }
    writer.join().unwrap();
    assert_eq!(cell.generation(), 2000);
}

#[test]
fn on_frame_publishes_and_returns_signal() {
    let ctx = BloomContext::default();
    let signal = ctx.on_frame(&FrameResult::from_hands([open_hand()]));
    assert!(signal.detected);
    assert_eq!(signal.tension, 1.0);
    assert_eq!(ctx.snapshot(), signal);
    assert_eq!(ctx.signal().generation(), 1);
}

#[test]
fn stop_capture_is_idempotent_and_decays_to_idle() {
    let ctx = BloomContext::default();
    ctx.on_frame(&FrameResult::from_hands([open_hand(), open_hand()]));
    assert!(ctx.snapshot().gallery_mode);

    ctx.stop_capture();
    assert!(!ctx.is_capturing());
    assert_eq!(ctx.snapshot(), GestureSignal::IDLE);
    let generation = ctx.signal().generation();

    ctx.stop_capture();
    assert_eq!(ctx.signal().generation(), generation);

    // frames arriving after stop are ignored
    ctx.on_frame(&FrameResult::from_hands([open_hand()]));
    assert_eq!(ctx.snapshot(), GestureSignal::IDLE);
    assert_eq!(ctx.signal().generation(), generation);

    ctx.start_capture();
    assert!(ctx.on_frame(&FrameResult::from_hands([open_hand()])).detected);
}

#[test]
fn stop_capture_wins_over_an_in_flight_frame() {
    for _ in 0..200 {
        let ctx = Arc::new(BloomContext::default());
        let feeder = {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let frame = FrameResult::from_hands([open_hand()]);
                while ctx.is_capturing() {
                    ctx.on_frame(&frame);
                }
            })
        };
        while !ctx.snapshot().detected {
            thread::yield_now();
        }
        ctx.stop_capture();
        feeder.join().unwrap();
        assert_eq!(ctx.snapshot(), GestureSignal::IDLE);
    }
}

#[test]
fn camera_loss_clears_signal() {
    let ctx = BloomContext::default();
    assert!(!ctx.ready());
    ctx.set_camera_ready(true);
    assert!(ctx.ready());
    ctx.on_frame(&FrameResult::from_hands([open_hand()]));
    assert!(ctx.snapshot().detected);

    ctx.set_camera_ready(false);
    assert!(!ctx.ready());
    assert_eq!(ctx.snapshot(), GestureSignal::IDLE);
}

#[test]
fn reset_publishes_idle() {
    let ctx = BloomContext::default();
    ctx.on_frame(&FrameResult::from_hands([open_hand()]));
    ctx.reset();
    assert_eq!(ctx.snapshot(), GestureSignal::IDLE);
    assert!(ctx.is_capturing());
}

#[test]
fn photos_fall_back_to_placeholders() {
    let ctx = BloomContext::default();
    let photos = ctx.photos();
    assert_eq!(photos.len(), PLACEHOLDER_COUNT);
    assert_eq!(photos[0], PhotoRef::placeholder(0));
    assert!(photos[0].url.contains("/seed/15/"));
}

#[test]
fn uploads_replace_library_and_bump_generation() {
    let ctx = BloomContext::default();
    let before = ctx.photo_generation();
    let urls: Vec<String> = (0..40).map(|i| format!("blob:photo-{i}")).collect();
    let kept = ctx.upload_photos(urls);
    assert_eq!(kept, MAX_UPLOADS);
    assert_eq!(ctx.photos().len(), MAX_UPLOADS);
    assert!(ctx.photo_generation() > before);

    // a second upload replaces rather than appends, with fresh ids
    ctx.upload_photos(["blob:a", "blob:b"]);
    let photos = ctx.photos();
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].url, "blob:a");
    assert_eq!(photos[0].id, format!("upload-{}", MAX_UPLOADS));
}

#[test]
fn explicit_photo_list_is_passed_through() {
    let ctx = BloomContext::default();
    ctx.set_photos(vec![PhotoRef::new("a", "opaque://a")]);
    assert_eq!(ctx.photos(), vec![PhotoRef::new("a", "opaque://a")]);
    ctx.set_photos(Vec::new());
    assert_eq!(ctx.photos().len(), PLACEHOLDER_COUNT);
}

#[test]
fn hidden_message_is_settable() {
    let ctx = BloomContext::default();
    assert_eq!(ctx.hidden_message(), DEFAULT_HIDDEN_MESSAGE);
    ctx.set_hidden_message("hello");
    assert_eq!(ctx.hidden_message(), "hello");
}

#[test]
fn cyclic_assignment_wraps() {
    let photos = vec![PhotoRef::new("a", "a"), PhotoRef::new("b", "b")];
    assert_eq!(assign_cyclic(&photos, 0).id, "a");
    assert_eq!(assign_cyclic(&photos, 3).id, "b");
    assert_eq!(assign_cyclic(&[], 4), PhotoRef::placeholder(4));
}

#[test]
fn photo_tint_is_stable_and_pastel() {
    let a = photo_tint("upload-0");
    assert_eq!(a, photo_tint("upload-0"));
    assert_ne!(a, photo_tint("upload-1"));
    for c in a {
        assert!((0.6..=1.0).contains(&c), "channel {c}");
    }
}
