// End-to-end presenter sessions driven through the public engine API.

use presenter_overlay::*;

fn ms(v: u64) -> Timestamp {
    Timestamp::from_millis(v)
}

fn engine_with_modes(modes: &[PresenterMode]) -> (OverlayEngine, InputHook) {
    let mut config = OverlayConfig::default();
    config.general.modes = modes.to_vec();
    OverlayEngine::new(config).unwrap()
}

fn press(hook: &InputHook, at: Timestamp) {
    hook.key_down(at, Key::Char('l'), true).unwrap();
}

fn release(hook: &InputHook, at: Timestamp) {
    hook.key_down(at, Key::Char('a'), true).unwrap();
}

fn erase(hook: &InputHook, at: Timestamp) {
    hook.key_down(at, Key::Char('e'), false).unwrap();
}

#[test]
fn hold_spotlight_follows_button() {
    let (mut engine, hook) =
        engine_with_modes(&[PresenterMode::SpotlightHold, PresenterMode::Laser]);
    let pointer = ScreenPoint::new(800.0, 450.0);
    hook.pointer_moved(pointer);

    press(&hook, ms(0));
    let frame = engine.tick(ms(16));
    assert!(frame.snapshot.indicator_on);
    assert_eq!(frame.snapshot.active_mode, PresenterMode::SpotlightHold);
    assert_eq!(
        frame.commands[1],
        DrawCommand::ClearCircle {
            center: pointer,
            radius: 150.0
        }
    );

    release(&hook, ms(500));
    let frame = engine.tick(ms(516));
    assert!(!frame.snapshot.indicator_on);
    assert!(frame.is_empty());
}

#[test]
fn laser_trail_collects_moves_then_clears() {
    let (mut engine, hook) =
        engine_with_modes(&[PresenterMode::SpotlightHold, PresenterMode::Laser]);

    erase(&hook, ms(0));
    let frame = engine.tick(ms(16));
    assert_eq!(frame.snapshot.active_mode, PresenterMode::Laser);
    assert_eq!(frame.mode_changed, Some(PresenterMode::Laser));

    press(&hook, ms(20));
    for i in 0..5u64 {
        hook.pointer_moved(ScreenPoint::new(100.0 + i as f32 * 10.0, 200.0));
        engine.tick(ms(40 + i * 16));
    }
    assert_eq!(engine.trail().len(), 5);
    assert_eq!(
        engine.trail().head().map(|s| s.position),
        Some(ScreenPoint::new(140.0, 200.0))
    );

    release(&hook, ms(200));
    let frame = engine.tick(ms(216));
    assert!(!frame.snapshot.indicator_on);
    assert!(frame.is_empty());
    assert!(engine.trail().is_empty());
}

#[test]
fn toggle_spotlight_ignores_release() {
    let (mut engine, hook) = engine_with_modes(&[PresenterMode::SpotlightToggle]);

    release(&hook, ms(0));
    assert!(!engine.tick(ms(16)).snapshot.indicator_on);

    press(&hook, ms(100));
    assert!(engine.tick(ms(116)).snapshot.indicator_on);

    release(&hook, ms(200));
    assert!(engine.tick(ms(216)).snapshot.indicator_on);

    // Far enough from the first press to stay a plain press.
    press(&hook, ms(1_000));
    let frame = engine.tick(ms(1_016));
    assert!(!frame.snapshot.indicator_on);
    assert!(frame.is_empty());
    assert!(engine.trail().is_empty());

    release(&hook, ms(1_100));
    assert!(!engine.tick(ms(1_116)).snapshot.indicator_on);
}

#[test]
fn short_trail_keeps_newest_three() {
    let mut config = OverlayConfig::default();
    config.general.modes = vec![PresenterMode::Laser];
    config.laser.max_trail_length = 3;
    let (mut engine, hook) = OverlayEngine::new(config).unwrap();

    press(&hook, ms(0));
    let points: Vec<ScreenPoint> = (1..=4).map(|i| ScreenPoint::new(i as f32, 0.0)).collect();
    for (i, p) in points.iter().enumerate() {
        hook.pointer_moved(*p);
        engine.tick(ms(16 * (i as u64 + 1)));
    }

    let held: Vec<ScreenPoint> = engine.trail().samples().map(|s| s.position).collect();
    assert_eq!(held, vec![points[3], points[2], points[1]]);

    let alphas: Vec<u8> = engine.trail().render_list().iter().map(|d| d.alpha).collect();
    assert_eq!(alphas[0], 255);
    assert!(alphas[1] < 255 && alphas[1] > 25);
    assert_eq!(alphas[2], 25);
}

#[test]
fn erase_mid_indication_turns_everything_off() {
    let (mut engine, hook) =
        engine_with_modes(&[PresenterMode::Laser, PresenterMode::SpotlightToggle]);

    press(&hook, ms(0));
    hook.pointer_moved(ScreenPoint::new(5.0, 5.0));
    engine.tick(ms(16));
    assert!(!engine.trail().is_empty());

    erase(&hook, ms(30));
    let frame = engine.tick(ms(32));
    assert_eq!(frame.snapshot.active_mode, PresenterMode::SpotlightToggle);
    assert!(!frame.snapshot.indicator_on);
    assert!(engine.trail().is_empty());
    assert!(frame.is_empty());
}

#[test]
fn input_from_hook_thread_reaches_render_tick() {
    let (mut engine, hook) = engine_with_modes(&[PresenterMode::SpotlightHold]);

    let remote = hook.clone();
    std::thread::spawn(move || {
        remote.pointer_moved(ScreenPoint::new(42.0, 24.0));
        remote.key_down(ms(0), Key::Char('l'), true).unwrap();
    })
    .join()
    .unwrap();

    let frame = engine.tick(ms(16));
    assert!(frame.snapshot.indicator_on);
    assert_eq!(frame.pointer, ScreenPoint::new(42.0, 24.0));

    let mut canvas = Canvas::new(100, 60).unwrap();
    canvas.render(&frame);
    assert_eq!(canvas.pixel(42, 24), Rgba::TRANSPARENT);
    assert_eq!(canvas.pixel(99, 59).a, 0);
}

#[test]
fn quit_hotkey_requests_shutdown() {
    let (mut engine, hook) = engine_with_modes(&[PresenterMode::SpotlightHold]);
    press(&hook, ms(0));
    hook.key_down(ms(10), Key::Char('q'), true).unwrap();

    let frame = engine.tick(ms(16));
    assert!(engine.quit_requested());
    assert!(frame.is_empty());
    engine.shutdown();
}
