// Host-side tests for the transition engine: mode selection, damping toward
// per-mode targets, and numeric robustness.

use bloom_core::*;
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn seeded_config(objects: usize) -> BloomConfig {
    let mut config = BloomConfig::default();
    config.layout.object_count = objects;
    config.layout.seed = Some(11);
    config
}

fn engine(objects: usize) -> TransitionEngine {
    let photos: Vec<PhotoRef> = (0..objects).map(PhotoRef::placeholder).collect();
    TransitionEngine::new(&seeded_config(objects), &photos)
}

fn hand(tension: f32) -> GestureSignal {
    GestureSignal {
        detected: true,
        tension,
        reference_position: glam::Vec2::splat(0.5),
        gallery_mode: false,
    }
}

fn gallery(tension: f32) -> GestureSignal {
    GestureSignal {
        gallery_mode: true,
        ..hand(tension)
    }
}

fn run(engine: &mut TransitionEngine, signal: GestureSignal, seconds: f32) {
    let ticks = (seconds / DT).round() as usize;
    for _ in 0..ticks {
        engine.tick(&signal, DT);
    }
}

#[test]
fn mode_precedence_and_boundaries() {
    let c = TransitionConfig::default();
    assert_eq!(select_mode(true, 1.0, &c), DisplayMode::Gallery);
    assert_eq!(select_mode(true, 0.0, &c), DisplayMode::Gallery);
    assert_eq!(select_mode(false, 1.0, &c), DisplayMode::Reveal);
    assert_eq!(select_mode(false, c.reveal_threshold, &c), DisplayMode::Expanding);
    assert_eq!(select_mode(false, 0.5, &c), DisplayMode::Expanding);
    assert_eq!(select_mode(false, c.contract_threshold, &c), DisplayMode::Contracted);
    assert_eq!(select_mode(false, 0.0, &c), DisplayMode::Contracted);
}

#[test]
fn expansion_factor_is_clamped_at_both_ends() {
    let c = TransitionConfig::default();
    assert_eq!(expansion_factor(c.contract_threshold, &c), 0.0);
    assert_eq!(expansion_factor(c.reveal_threshold, &c), 1.0);
    assert_eq!(expansion_factor(-2.0, &c), 0.0);
    assert_eq!(expansion_factor(5.0, &c), 1.0);
    let mid = (c.contract_threshold + c.reveal_threshold) / 2.0;
    assert!((expansion_factor(mid, &c) - 0.5).abs() < 1e-6);
}

#[test]
fn objects_start_at_origin_in_hot_pink() {
    let e = engine(10);
    assert_eq!(e.objects().len(), 10);
    for obj in e.objects() {
        assert_eq!(*obj.transform(), ObjectTransform::INITIAL);
        assert_eq!(obj.transform().color, Vec3::from(HOT_PINK));
    }
}

#[test]
fn gallery_wins_over_reveal() {
    let mut e = engine(12);
    let signal = gallery(1.0);
    e.tick(&signal, DT);
    assert_eq!(e.mode(), DisplayMode::Gallery);
    for i in 0..12 {
        let target = e.target_for(i, &signal).unwrap();
        let layout = e.objects()[i].layout();
        assert!(target.snap_rotation);
        let expected = layout.gallery_position * e.gallery_factor();
        assert!((target.transform.position - expected).length() < 1e-5);
        assert_eq!(target.transform.scale, Vec3::splat(e.config().gallery_scale));
        assert_eq!(target.transform.opacity, 1.0);
    }
}

#[test]
fn constant_signal_converges_to_target() {
    let mut e = engine(30);
    let signal = hand(0.6);
    run(&mut e, signal, 10.0);
    assert_eq!(e.mode(), DisplayMode::Expanding);
    for i in 0..30 {
        let target = e.target_for(i, &signal).unwrap().transform;
        let t = e.objects()[i].transform();
        assert!((t.position - target.position).length() < 1e-3, "object {i} position");
        assert!((t.scale - target.scale).length() < 1e-3, "object {i} scale");
        assert!((t.rotation - target.rotation).length() < 1e-3, "object {i} rotation");
        assert!((t.opacity - target.opacity).abs() < 1e-3, "object {i} opacity");
        assert!((t.color - target.color).length() < 1e-3, "object {i} color");
        assert!((t.emissive - target.emissive).length() < 1e-3, "object {i} emissive");
    }
}

#[test]
fn expansion_interpolates_between_rest_and_exploded() {
    let e = engine(5);
    let c = e.config().clone();
    let mid = (c.contract_threshold + c.reveal_threshold) / 2.0;
    let target = e.target_for(3, &hand(mid)).unwrap().transform;
    let layout = e.objects()[3].layout();
    let expected = layout.rest_position.lerp(layout.exploded_position, 0.5);
    assert!((target.position - expected).length() < 1e-4);
    let expected_scale = c.expanding_scale_min + 0.5 * (c.expanding_scale_max - c.expanding_scale_min);
    assert!((target.scale.x - expected_scale).abs() < 1e-5);

    // glow rises monotonically with tension across the band
    let mut last = -1.0;
    for step in 0..=10 {
        let t = c.contract_threshold + 0.001 + step as f32 * (c.reveal_threshold - c.contract_threshold - 0.002) / 10.0;
        let glow = e.target_for(3, &hand(t)).unwrap().transform.emissive.length();
        assert!(glow > last, "tension {t}");
        last = glow;
    }
}

#[test]
fn contracted_target_pulses_around_base_scale() {
    let mut e = engine(4);
    let c = e.config().clone();
    let mut seen_low = f32::MAX;
    let mut seen_high = f32::MIN;
    for _ in 0..300 {
        e.tick(&hand(0.0), DT);
        let s = e.target_for(0, &hand(0.0)).unwrap().transform.scale.x;
        seen_low = seen_low.min(s);
        seen_high = seen_high.max(s);
    }
    let amp = c.heartbeat.amplitude;
    assert!(seen_low >= c.contracted_scale - amp - 1e-5);
    assert!(seen_high <= c.contracted_scale + amp + 1e-5);
    assert!(seen_high - seen_low > amp, "pulse should be visible: {seen_low}..{seen_high}");
}

#[test]
fn absent_hand_settles_into_contracted_heart() {
    let mut e = engine(8);
    run(&mut e, hand(0.7), 3.0);
    assert_eq!(e.mode(), DisplayMode::Expanding);
    run(&mut e, GestureSignal::IDLE, 10.0);
    assert_eq!(e.mode(), DisplayMode::Contracted);
    for obj in e.objects() {
        let d = (obj.transform().position - obj.layout().rest_position).length();
        assert!(d < 1e-3, "object {} is {d} from rest", obj.id);
    }
}

#[test]
fn reveal_spotlights_object_zero() {
    let mut e = engine(20);
    let signal = hand(1.0);
    run(&mut e, signal, 8.0);
    assert_eq!(e.mode(), DisplayMode::Reveal);

    let group = *e.group();
    let presentation = Vec3::from(e.config().presentation_point);
    let target = e.target_for(0, &signal).unwrap().transform;
    assert!((group.local_to_world(target.position) - presentation).length() < 1e-3);

    let star = e.objects()[0].transform();
    assert!((group.local_to_world(star.position) - presentation).length() < 0.3);
    assert!(star.opacity > 0.99);
    assert!(star.scale.x > 1.0, "spotlit photo should be enlarged");

    for obj in &e.objects()[1..] {
        assert!(obj.transform().opacity < 0.01, "object {} still visible", obj.id);
        assert!(obj.transform().scale.length() < 0.01);
    }
}

#[test]
fn gallery_faces_the_viewer() {
    let mut e = engine(40);
    run(&mut e, gallery(0.3), 6.0);
    let group = *e.group();
    let eye = e.camera().eye;
    for obj in e.objects() {
        let t = obj.transform();
        let world_pos = group.local_to_world(t.position);
        let facing = (group.quat() * t.rotation_quat()) * Vec3::Z;
        let to_eye = (eye - world_pos).normalize();
        assert!(facing.dot(to_eye) > 0.99, "object {} facing {facing:?}", obj.id);
    }
}

#[test]
fn gallery_spins_the_group() {
    let mut e = engine(4);
    e.tick(&gallery(0.0), DT);
    let before = e.group().rotation.y;
    e.tick(&gallery(0.0), 0.1);
    let step = e.group().rotation.y - before;
    assert!((step - e.config().gallery_spin_per_sec * 0.1).abs() < 1e-5);
}

#[test]
fn gallery_spins_faster_than_the_heart() {
    let yaw_after = |signal: GestureSignal| {
        let mut e = engine(4);
        e.tick(&signal, 0.1);
        e.group().rotation.y
    };
    let gallery_yaw = yaw_after(gallery(0.0));
    let heart_yaw = yaw_after(hand(0.0));
    let idle_yaw = yaw_after(GestureSignal::IDLE);
    assert!(gallery_yaw > heart_yaw, "gallery {gallery_yaw} heart {heart_yaw}");
    assert!(gallery_yaw > idle_yaw, "gallery {gallery_yaw} idle {idle_yaw}");
}

#[test]
fn expanding_opacity_ramps_with_tension() {
    let e = engine(3);
    let c = e.config().clone();
    let low = e.target_for(0, &hand(c.contract_threshold + 0.01)).unwrap();
    let high = e.target_for(0, &hand(c.reveal_threshold)).unwrap();
    assert!(low.transform.opacity < high.transform.opacity);
    assert!(low.transform.opacity >= c.expanding_opacity_min);
    assert!((high.transform.opacity - c.expanding_opacity_max).abs() < 1e-6);
}

#[test]
fn heart_spin_slows_near_full_tension() {
    let mut slow = engine(2);
    let mut fast = engine(2);
    slow.tick(&hand(0.9), 0.2);
    fast.tick(&hand(0.1), 0.2);
    assert!(slow.group().rotation.y < fast.group().rotation.y);
}

#[test]
fn crossing_a_threshold_does_not_jump() {
    let mut e = engine(20);
    let c = e.config().clone();
    run(&mut e, hand(c.contract_threshold - 0.01), 5.0);
    let before: Vec<Vec3> = e.objects().iter().map(|o| o.transform().position).collect();
    e.tick(&hand(c.contract_threshold + 0.01), DT);
    for (b, obj) in before.iter().zip(e.objects()) {
        let step = (obj.transform().position - *b).length();
        assert!(step < 0.1, "object {} jumped {step}", obj.id);
    }
}

#[test]
fn pathological_inputs_never_produce_non_finite_state() {
    let mut e = engine(16);
    let signals = [
        hand(f32::NAN),
        hand(f32::INFINITY),
        hand(-3.0),
        hand(42.0),
        gallery(f32::NAN),
        GestureSignal::IDLE,
    ];
    let steps = [DT, 0.0, -1.0, f32::NAN, f32::INFINITY, 10.0, 1e-9];
    for signal in signals {
        for dt in steps {
            e.tick(&signal, dt);
            for obj in e.objects() {
                assert!(obj.transform().is_finite(), "signal {signal:?} dt {dt}");
                assert!((0.0..=1.0).contains(&obj.transform().opacity));
            }
            assert!(e.group().rotation.is_finite());
            assert!(e.group().scale.is_finite());
        }
    }
}

#[test]
fn non_finite_tension_is_treated_as_absent() {
    let e = engine(3);
    let nan = e.target_for(1, &hand(f32::NAN)).unwrap();
    let idle = e.target_for(1, &GestureSignal::IDLE).unwrap();
    assert_eq!(nan, idle);
}

#[test]
fn oversized_steps_are_capped() {
    let mut a = engine(3);
    let mut b = engine(3);
    a.tick(&hand(0.6), 100.0);
    b.tick(&hand(0.6), MAX_TICK_DT_SEC);
    assert_eq!(a.objects()[2].transform(), b.objects()[2].transform());
    assert_eq!(a.elapsed(), b.elapsed());
}

#[test]
fn gallery_shrinks_on_narrow_viewports() {
    let layout = LayoutConfig::default();
    let mut camera = Camera::default();
    camera.set_aspect(1600, 900);
    assert_eq!(gallery_factor(camera.viewport(), &layout), 1.0);
    camera.set_aspect(500, 1000);
    let f = gallery_factor(camera.viewport(), &layout);
    assert!(f > GALLERY_MIN_FACTOR && f < 1.0, "factor {f}");
    camera.set_aspect(100, 1000);
    assert_eq!(gallery_factor(camera.viewport(), &layout), GALLERY_MIN_FACTOR);
}

#[test]
fn photo_rebind_keeps_layouts_and_motion() {
    let mut e = engine(6);
    run(&mut e, hand(0.5), 1.0);
    let layouts: Vec<ObjectLayout> = e.objects().iter().map(|o| *o.layout()).collect();
    let transforms: Vec<ObjectTransform> = e.objects().iter().map(|o| *o.transform()).collect();

    let photos = vec![PhotoRef::new("a", "a"), PhotoRef::new("b", "b")];
    e.assign_photos(&photos);
    for (i, obj) in e.objects().iter().enumerate() {
        assert_eq!(*obj.layout(), layouts[i]);
        assert_eq!(*obj.transform(), transforms[i]);
        assert_eq!(obj.photo, photos[i % 2]);
        assert_eq!(obj.tint, photo_tint(&photos[i % 2].id));
    }

    e.set_object_count(9, &photos);
    assert_eq!(e.objects().len(), 9);
    assert_eq!(e.objects()[8].photo.id, "a");
}

#[test]
fn instances_carry_world_transform_and_opacity() {
    let mut e = engine(5);
    run(&mut e, hand(0.0), 2.0);
    let instances = e.instances();
    assert_eq!(instances.len(), 5);
    assert_eq!(instances_as_floats(&instances).len(), 5 * FLOATS_PER_INSTANCE);
    let group = *e.group();
    for (raw, obj) in instances.iter().zip(e.objects()) {
        let expected = group.local_to_world(obj.transform().position);
        assert!((raw.world_position() - expected).length() < 1e-4);
        assert_eq!(raw.color[3], obj.transform().opacity);
    }
}
