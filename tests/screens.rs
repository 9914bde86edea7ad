//! Built-in screens driven through the frame loop

mod common;

use std::fs;
use std::path::Path;

use aethel::config::AppConfig;
use aethel::context::AppContext;
use aethel::frame::FrameLoop;
use aethel::hud::HudOverlay;
use aethel::input::Key;
use aethel::screen::{BuiltinScreens, ScreenId};

use common::{assets_in, key_down, left_click, pointer_move, test_context};

const FRAME: f32 = 1.0 / 60.0;

/// Fake text is `0.5 × size` wide per character at size 36, centered on
/// (960, 510) for "Options" and (960, 570) for "Quit"
const OPTIONS_BUTTON: (f32, f32) = (960.0, 510.0);
const QUIT_BUTTON: (f32, f32) = (960.0, 570.0);
/// "Back" row on the options screen
const BACK_BUTTON: (f32, f32) = (960.0, 680.0);
/// "+" stepper on the options screen
const VOLUME_UP_BUTTON: (f32, f32) = (1180.0, 540.0);

fn write_menu_music(dir: &Path) {
    let music = dir.join("music");
    fs::create_dir_all(&music).expect("music dir");
    fs::write(music.join("menu_theme.ogg"), b"ogg").expect("music file");
}

fn start(
    dir: &Path,
    screen: ScreenId,
) -> (
    AppContext,
    FrameLoop<BuiltinScreens>,
    std::rc::Rc<std::cell::RefCell<common::SurfaceLog>>,
) {
    let (mut ctx, log) = test_context(0.0, assets_in(dir));
    let mut frames = FrameLoop::new(BuiltinScreens, HudOverlay::empty()).with_quit_key(None);
    ctx.set_initial_screen(screen, None);
    // One frame to build, one more so buttons have been laid out
    frames.step(&mut ctx, FRAME);
    frames.step(&mut ctx, FRAME);
    (ctx, frames, log)
}

#[test]
fn test_main_menu_without_assets_degrades() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (ctx, _frames, log) = start(dir.path(), ScreenId::MainMenu);

    assert_eq!(ctx.active_screen_name(), Some("MainMenu"));
    assert!(!ctx.services().audio.is_music_playing());
    assert!(log.borrow().textures_loaded.is_empty());
    assert!(log.borrow().texts.iter().any(|t| t == "Options"));
}

#[test]
fn test_main_menu_music_fades_out_after_leaving() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_menu_music(dir.path());
    let (mut ctx, mut frames, _log) = start(dir.path(), ScreenId::MainMenu);

    assert_eq!(ctx.services().audio.current_music(), Some("menu_theme"));

    ctx.services()
        .input
        .enqueue(left_click(OPTIONS_BUTTON.0, OPTIONS_BUTTON.1));
    frames.step(&mut ctx, FRAME);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::Options));
    // Still fading out
    assert!(ctx.services().audio.is_music_playing());

    for _ in 0..90 {
        frames.step(&mut ctx, FRAME);
    }
    assert!(!ctx.services().audio.is_music_playing());
}

#[test]
fn test_main_menu_quit_button() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, mut frames, _log) = start(dir.path(), ScreenId::MainMenu);

    ctx.services()
        .input
        .enqueue(pointer_move(QUIT_BUTTON.0, QUIT_BUTTON.1));
    ctx.services()
        .input
        .enqueue(left_click(QUIT_BUTTON.0, QUIT_BUTTON.1));

    assert!(frames.step(&mut ctx, FRAME).quit);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::MainMenu));
}

#[test]
fn test_click_outside_buttons_does_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, mut frames, _log) = start(dir.path(), ScreenId::MainMenu);

    ctx.services().input.enqueue(left_click(10.0, 10.0));
    let outcome = frames.step(&mut ctx, FRAME);

    assert!(!outcome.quit);
    assert!(!outcome.swapped);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::MainMenu));
}

#[test]
fn test_options_volume_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, mut frames, _log) = start(dir.path(), ScreenId::Options);
    let initial = ctx.services().audio.master_volume();

    ctx.services().input.enqueue(key_down(Key::Right));
    frames.step(&mut ctx, FRAME);
    assert!((ctx.services().audio.master_volume() - (initial + 0.05)).abs() < 1e-6);

    for _ in 0..10 {
        ctx.services().input.enqueue(key_down(Key::Left));
    }
    frames.step(&mut ctx, FRAME);
    assert_eq!(ctx.services().audio.master_volume(), 0.0);

    ctx.services()
        .input
        .enqueue(left_click(VOLUME_UP_BUTTON.0, VOLUME_UP_BUTTON.1));
    frames.step(&mut ctx, FRAME);
    assert!((ctx.services().audio.master_volume() - 0.05).abs() < 1e-6);
}

#[test]
fn test_options_back_returns_to_menu() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, mut frames, _log) = start(dir.path(), ScreenId::MainMenu);

    ctx.services()
        .input
        .enqueue(left_click(OPTIONS_BUTTON.0, OPTIONS_BUTTON.1));
    frames.step(&mut ctx, FRAME);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::Options));

    // Lay out the options screen, then press "Back"
    frames.step(&mut ctx, FRAME);
    ctx.services()
        .input
        .enqueue(left_click(BACK_BUTTON.0, BACK_BUTTON.1));
    frames.step(&mut ctx, FRAME);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::MainMenu));
}

#[test]
fn test_escape_leaves_options_when_not_reserved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (mut ctx, mut frames, _log) = start(dir.path(), ScreenId::Options);

    ctx.services().input.enqueue(key_down(Key::Escape));
    let outcome = frames.step(&mut ctx, FRAME);

    assert!(!outcome.quit);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::MainMenu));
}

#[test]
fn test_escape_reaches_options_when_config_disables_quit_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("kiosk.toml");
    fs::write(&file, "[input]\nquit_key = \"none\"\n").expect("write config");
    let config = AppConfig::load_from("kiosk", &file).expect("load");

    let (mut ctx, _log) = test_context(0.0, assets_in(dir.path()));
    let mut frames =
        FrameLoop::from_config(BuiltinScreens, HudOverlay::empty(), &config.input);
    ctx.set_initial_screen(ScreenId::Options, None);
    frames.step(&mut ctx, FRAME);

    ctx.services().input.enqueue(key_down(Key::Escape));
    let outcome = frames.step(&mut ctx, FRAME);

    assert!(!outcome.quit);
    assert_eq!(ctx.active_screen_id(), Some(ScreenId::MainMenu));
}
