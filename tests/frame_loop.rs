//! Frame loop behavior: dispatch order, screen swaps and fade transitions

mod common;

use aethel::frame::FrameLoop;
use aethel::hud::HudOverlay;
use aethel::input::{InputKind, Key};
use aethel::render::RenderError;
use aethel::screen::ScreenId;
use aethel::transition::TransitionPhase;

use common::{RecordingFactory, assets_in, key_down, left_click, pointer_move, test_context};

const FRAME: f32 = 1.0 / 60.0;

fn frame_loop(factory: RecordingFactory) -> FrameLoop<RecordingFactory> {
    FrameLoop::new(factory, HudOverlay::empty())
}

/// Context with `start` already built by a first frame
fn started(
    transition_seconds: f32,
    start: ScreenId,
    factory: RecordingFactory,
) -> (
    aethel::context::AppContext,
    FrameLoop<RecordingFactory>,
    std::rc::Rc<std::cell::RefCell<common::SurfaceLog>>,
) {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, log) = test_context(transition_seconds, assets_in(dir.path()));
    let mut frames = frame_loop(factory);
    ctx.set_initial_screen(start, None);
    frames.step(&mut ctx, FRAME);
    (ctx, frames, log)
}

#[test]
fn test_first_frame_builds_start_screen_without_fade() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, log) = test_context(0.5, assets_in(dir.path()));
    let mut frames = frame_loop(RecordingFactory::new());
    ctx.set_initial_screen(ScreenId::MainMenu, None);
    assert!(!ctx.has_active_screen());

    let outcome = frames.step(&mut ctx, FRAME);

    assert!(outcome.swapped);
    assert_eq!(ctx.active_screen_name(), Some("MainMenu"));
    assert_eq!(ctx.transition().phase(), TransitionPhase::Idle);
    assert!(log.borrow().overlays.is_empty());
    assert_eq!(frames.factory().lifecycle(), ["init:MainMenu"]);

    // Nothing changes on later frames
    assert!(!frames.step(&mut ctx, FRAME).swapped);
    assert_eq!(frames.factory().lifecycle(), ["init:MainMenu"]);
}

#[test]
fn test_quit_key_is_intercepted_and_order_is_kept() {
    let (mut ctx, mut frames, _log) = started(0.5, ScreenId::MainMenu, RecordingFactory::new());
    frames.factory().clear();

    let queue = ctx.services().input.clone();
    queue.enqueue(key_down(Key::Escape));
    queue.enqueue(pointer_move(10.0, 20.0));
    queue.enqueue(left_click(10.0, 20.0));

    let outcome = frames.step(&mut ctx, FRAME);

    assert_eq!(outcome.events_drained, 3);
    assert!(outcome.quit);
    assert!(ctx.quit_requested());
    assert!(queue.is_empty());

    let events: Vec<String> = frames
        .factory()
        .entries()
        .into_iter()
        .filter(|e| e.starts_with("event:"))
        .collect();
    // The quit key never reaches the screen
    assert_eq!(
        events,
        [
            format!("event:MainMenu:{:?}", InputKind::PointerMove),
            format!("event:MainMenu:{:?}", InputKind::PointerButtonDown),
        ]
    );
}

#[test]
fn test_disabled_quit_key_is_forwarded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, _log) = test_context(0.5, assets_in(dir.path()));
    let mut frames = frame_loop(RecordingFactory::new()).with_quit_key(None);
    ctx.set_initial_screen(ScreenId::MainMenu, None);
    frames.step(&mut ctx, FRAME);

    let queue = ctx.services().input.clone();
    queue.enqueue(key_down(Key::Escape));
    queue.enqueue(pointer_move(10.0, 20.0));
    queue.enqueue(left_click(10.0, 20.0));
    let outcome = frames.step(&mut ctx, FRAME);

    assert!(!outcome.quit);
    let events: Vec<String> = frames
        .factory()
        .entries()
        .into_iter()
        .filter(|e| e.starts_with("event:"))
        .collect();
    assert_eq!(
        events,
        [
            format!("event:MainMenu:{:?}", InputKind::KeyDown),
            format!("event:MainMenu:{:?}", InputKind::PointerMove),
            format!("event:MainMenu:{:?}", InputKind::PointerButtonDown),
        ]
    );
}

#[test]
fn test_transition_completes_within_twice_the_duration() {
    let (mut ctx, mut frames, log) = started(0.5, ScreenId::MainMenu, RecordingFactory::new());

    assert!(ctx.request_transition(ScreenId::Options, Some(Box::new(7u32))));
    assert_eq!(ctx.transition().phase(), TransitionPhase::FadingOut);

    let mut elapsed = 0.0;
    let mut swaps = 0;
    while elapsed < 1.0 {
        let outcome = frames.step(&mut ctx, 0.1);
        elapsed += 0.1;
        if outcome.swapped {
            swaps += 1;
        }
        // At most one live screen at every frame boundary
        assert!(ctx.active_screen_name().is_some());
    }
    // Slack for f32 accumulation
    frames.step(&mut ctx, 0.1);
    frames.step(&mut ctx, 0.1);

    assert_eq!(swaps, 1);
    assert_eq!(ctx.transition().phase(), TransitionPhase::Idle);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::Options));
    assert!(!ctx.transition().has_pending_payload());
    assert_eq!(
        frames.factory().lifecycle(),
        ["init:MainMenu", "destroy:MainMenu", "init:Options(7)"]
    );

    let overlays = log.borrow().overlays.clone();
    assert!(!overlays.is_empty());
    assert!(overlays.iter().all(|o| (0.0..=1.0).contains(o)));
}

#[test]
fn test_second_request_while_fading_is_dropped() {
    // No start screen, so neither request is rejected as "already active"
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, _log) = test_context(0.5, assets_in(dir.path()));
    let mut frames = frame_loop(RecordingFactory::new());

    assert!(ctx.request_transition(ScreenId::Options, None));
    assert!(!ctx.request_transition(ScreenId::MainMenu, None));
    assert_eq!(ctx.transition().pending_id(), Some(ScreenId::Options));

    for _ in 0..12 {
        frames.step(&mut ctx, 0.1);
    }
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::Options));
    assert_eq!(frames.factory().lifecycle(), ["init:Options"]);
}

#[test]
fn test_request_for_current_screen_is_rejected() {
    let (mut ctx, _frames, _log) = started(0.5, ScreenId::MainMenu, RecordingFactory::new());
    assert!(!ctx.request_transition(ScreenId::MainMenu, None));
    assert!(!ctx.transition().is_transitioning());
}

#[test]
fn test_zero_duration_swaps_in_one_frame() {
    let (mut ctx, mut frames, _log) = started(0.0, ScreenId::MainMenu, RecordingFactory::new());

    assert!(ctx.request_transition(ScreenId::Options, None));
    let outcome = frames.step(&mut ctx, 0.0);

    assert!(outcome.swapped);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::Options));
    assert_eq!(ctx.transition().phase(), TransitionPhase::Idle);
    assert_eq!(
        frames.factory().lifecycle(),
        ["init:MainMenu", "destroy:MainMenu", "init:Options"]
    );
}

#[test]
fn test_screen_requested_transition_carries_payload() {
    let (mut ctx, mut frames, _log) = started(0.25, ScreenId::MainMenu, RecordingFactory::new());

    ctx.services().input.enqueue(key_down(Key::Enter));
    frames.step(&mut ctx, FRAME);
    assert!(ctx.transition().is_fading_out());
    assert!(ctx.transition().has_pending_payload());

    for _ in 0..40 {
        frames.step(&mut ctx, FRAME);
    }
    assert_eq!(
        frames.factory().lifecycle(),
        ["init:MainMenu", "destroy:MainMenu", "init:Options(7)"]
    );
}

#[test]
fn test_missing_screen_degrades_to_empty_frames() {
    let factory = RecordingFactory::new().without(ScreenId::Options);
    let (mut ctx, mut frames, log) = started(0.0, ScreenId::MainMenu, factory);

    ctx.request_transition(ScreenId::Options, None);
    assert!(frames.step(&mut ctx, FRAME).swapped);
    assert!(!ctx.has_active_screen());

    // Frames keep running and nothing is rebuilt
    ctx.services().input.enqueue(pointer_move(1.0, 1.0));
    let presents_before = log.borrow().presents;
    let outcome = frames.step(&mut ctx, FRAME);
    assert!(!outcome.swapped);
    assert_eq!(outcome.events_drained, 1);
    assert_eq!(log.borrow().presents, presents_before + 1);
    assert_eq!(frames.factory().lifecycle(), ["init:MainMenu", "destroy:MainMenu"]);

    // The empty state can still transition away
    assert!(ctx.request_transition(ScreenId::MainMenu, None));
    frames.step(&mut ctx, FRAME);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::MainMenu));
}

#[test]
fn test_post_present_runs_only_after_successful_present() {
    let (mut ctx, mut frames, log) = started(0.5, ScreenId::MainMenu, RecordingFactory::new());
    frames.factory().clear();

    frames.step(&mut ctx, FRAME);
    assert_eq!(frames.factory().entries(), ["post_present:MainMenu"]);

    frames.factory().clear();
    log.borrow_mut().fail_next_present = Some(RenderError::SurfaceLost);
    let outcome = frames.step(&mut ctx, FRAME);
    assert!(!outcome.quit);
    assert!(frames.factory().entries().is_empty());
}

#[test]
fn test_out_of_memory_requests_quit() {
    let (mut ctx, mut frames, log) = started(0.5, ScreenId::MainMenu, RecordingFactory::new());
    log.borrow_mut().fail_next_present = Some(RenderError::OutOfMemory);

    assert!(frames.step(&mut ctx, FRAME).quit);
}

#[test]
fn test_shutdown_discards_input_and_destroys_screen() {
    let (mut ctx, frames, _log) = started(0.5, ScreenId::MainMenu, RecordingFactory::new());
    ctx.services().input.enqueue(pointer_move(1.0, 1.0));

    ctx.shutdown();

    assert!(ctx.services().input.is_empty());
    assert!(!ctx.has_active_screen());
    assert_eq!(
        frames.factory().lifecycle(),
        ["init:MainMenu", "destroy:MainMenu"]
    );
}
