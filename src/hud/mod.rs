//! Global UI overlay drawn above every screen
//!
//! The overlay sees pointer events before the active screen but never
//! consumes them.

mod action_bar;
mod addons;
mod info_stack;

use chrono::{DateTime, Local};

use crate::input::TimedInputEvent;
use crate::render::Canvas;

pub use action_bar::{ActionBar, BarAddon, BarAlignment, layout_slots};
pub use addons::{ClockAddon, ClockMode, LabelAddon, format_uptime};
pub use info_stack::{FpsPanel, HudStatus, InfoPanel, InfoStack, ScreenPanel};

/// Action bar plus the diagnostics stack
pub struct HudOverlay {
    action_bar: ActionBar,
    info: InfoStack,
}

impl HudOverlay {
    /// Empty overlay: no addons, no panels
    pub fn empty() -> Self {
        Self {
            action_bar: ActionBar::new(),
            info: InfoStack::new(),
        }
    }

    /// Overlay with the stock addons and panels
    pub fn with_defaults(started_at: DateTime<Local>) -> Self {
        let mut hud = Self::empty();
        hud.action_bar.add_addon(Box::new(LabelAddon::new(
            format!("Aethel {}", env!("CARGO_PKG_VERSION")),
            BarAlignment::Left,
        )));
        hud.action_bar
            .add_addon(Box::new(ClockAddon::new(started_at)));
        hud.info.add_panel(Box::new(FpsPanel::new()));
        hud.info.add_panel(Box::new(ScreenPanel::new()));
        hud
    }

    pub fn action_bar(&self) -> &ActionBar {
        &self.action_bar
    }

    /// Flips both parts' visibility
    pub fn toggle(&mut self) {
        let visible = !self.action_bar.is_visible();
        self.action_bar.set_visible(visible);
        self.info.set_visible(visible);
    }

    pub fn handle_event(&mut self, event: &TimedInputEvent) {
        if event.kind().is_pointer() {
            self.action_bar.handle_event(event);
        }
    }

    pub fn update(&mut self, dt: f32, status: &HudStatus) {
        self.action_bar.update(dt);
        self.info.update(dt, status);
    }

    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        self.action_bar.render(canvas);
        self.info.render(canvas, self.action_bar.bottom());
    }
}

impl Default for HudOverlay {
    fn default() -> Self {
        Self::empty()
    }
}
