//! Screens and the screen factory
//!
//! A screen is one foreground unit of behavior (menu, options, ...). The
//! application context owns at most one at a time; screens are built only by
//! the [`ScreenFactory`] at the moment a swap happens and are never reused.

mod main_menu;
mod options;

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::context::ScreenContext;
use crate::input::TimedInputEvent;

pub use main_menu::MainMenu;
pub use options::Options;

/// Opaque hand-off value passed to the next screen's `init`
pub type ScreenPayload = Box<dyn Any>;

/// Identifier of a screen variant
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ScreenId {
    MainMenu,
    Options,
}

/// Lifecycle every screen implements
///
/// Order is fixed: `init` exactly once, then any number of frames of
/// `handle_event` / `update` / `render` / `post_present`, then `destroy`
/// exactly once. A screen may ask for a transition or for quit through the
/// [`ScreenContext`], but never replaces itself.
pub trait Screen {
    /// Called once, before the first update. `payload` is whatever the
    /// requesting screen handed over.
    fn init(&mut self, ctx: &mut ScreenContext<'_>, payload: Option<ScreenPayload>);

    /// Called for each input event drained this frame, in capture order
    fn handle_event(&mut self, _ctx: &mut ScreenContext<'_>, _event: &TimedInputEvent) {}

    fn update(&mut self, _ctx: &mut ScreenContext<'_>, _dt: f32) {}

    fn render(&mut self, _ctx: &mut ScreenContext<'_>) {}

    /// Called after the frame has been presented
    fn post_present(&mut self, _ctx: &mut ScreenContext<'_>) {}

    /// Called once, before the screen is dropped
    fn destroy(&mut self, _ctx: &mut ScreenContext<'_>) {}

    /// Name for logs and diagnostics
    fn name(&self) -> &'static str;
}

/// Builds screens by identifier
///
/// Returning `None` is legal: the application keeps running with no active
/// screen.
pub trait ScreenFactory {
    fn create(&self, id: ScreenId) -> Option<Box<dyn Screen>>;
}

/// Factory for the screens shipped with the application
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinScreens;

impl ScreenFactory for BuiltinScreens {
    fn create(&self, id: ScreenId) -> Option<Box<dyn Screen>> {
        match id {
            ScreenId::MainMenu => Some(Box::new(MainMenu::new())),
            ScreenId::Options => Some(Box::new(Options::new())),
        }
    }
}
