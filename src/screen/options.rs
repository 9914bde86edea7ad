//! Options screen: master volume and a way back

use glam::Vec2;
use tracing::debug;

use super::{Screen, ScreenId, ScreenPayload};
use crate::context::ScreenContext;
use crate::input::{InputEvent, Key, PointerButton, TimedInputEvent};
use crate::render::{Color, Rect, TextStyle};

const VOLUME_STEP: f32 = 0.05;
const TITLE_TEXT_SIZE: f32 = 48.0;
const TEXT_SIZE: f32 = 32.0;
const ROW_SPACING: f32 = 70.0;
const STEPPER_OFFSET: f32 = 220.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    VolumeDown,
    VolumeUp,
    Back,
}

/// Adjusts the master volume; returns to the screen that opened it
#[derive(Debug)]
pub struct Options {
    return_to: ScreenId,
    /// Bounds from the last render, used for hit tests
    controls: Vec<(Control, Rect)>,
    hovered: Option<Control>,
}

impl Options {
    pub fn new() -> Self {
        Self {
            return_to: ScreenId::MainMenu,
            controls: Vec::new(),
            hovered: None,
        }
    }

    fn control_at(&self, pos: Vec2) -> Option<Control> {
        self.controls
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(control, _)| *control)
    }

    fn nudge_volume(ctx: &mut ScreenContext<'_>, delta: f32) {
        let audio = ctx.audio();
        let volume = audio.master_volume() + delta;
        audio.set_master_volume(volume);
        debug!(volume = audio.master_volume(), "Master volume changed");
    }

    fn go_back(&self, ctx: &mut ScreenContext<'_>) {
        ctx.request_transition(self.return_to, None);
    }

    fn activate(&self, ctx: &mut ScreenContext<'_>, control: Control) {
        match control {
            Control::VolumeDown => Self::nudge_volume(ctx, -VOLUME_STEP),
            Control::VolumeUp => Self::nudge_volume(ctx, VOLUME_STEP),
            Control::Back => self.go_back(ctx),
        }
    }

    fn draw_control(
        &mut self,
        ctx: &mut ScreenContext<'_>,
        control: Control,
        label: &str,
        pos: Vec2,
    ) {
        let color = if self.hovered == Some(control) {
            Color::YELLOW
        } else {
            Color::WHITE
        };
        let rect = ctx
            .canvas()
            .draw_text(label, pos, &TextStyle::new(TEXT_SIZE).color(color).centered());
        self.controls.push((control, rect));
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for Options {
    fn init(&mut self, _ctx: &mut ScreenContext<'_>, payload: Option<ScreenPayload>) {
        if let Some(id) = payload.and_then(|p| p.downcast::<ScreenId>().ok()) {
            self.return_to = *id;
        }
    }

    fn handle_event(&mut self, ctx: &mut ScreenContext<'_>, event: &TimedInputEvent) {
        match &event.event {
            InputEvent::KeyDown(key) => match key.key {
                Key::Left => Self::nudge_volume(ctx, -VOLUME_STEP),
                Key::Right => Self::nudge_volume(ctx, VOLUME_STEP),
                Key::Escape | Key::Backspace => self.go_back(ctx),
                _ => {}
            },
            InputEvent::PointerMove(motion) => self.hovered = self.control_at(motion.position),
            InputEvent::PointerButtonDown(press) if press.button == PointerButton::Left => {
                self.hovered = self.control_at(press.position);
                if let Some(control) = self.hovered {
                    self.activate(ctx, control);
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, ctx: &mut ScreenContext<'_>) {
        let size = ctx.render_size();
        let center = size / 2.0;
        let volume = ctx.audio().master_volume();

        ctx.canvas().draw_text(
            "Options",
            Vec2::new(center.x, center.y - ROW_SPACING * 2.0),
            &TextStyle::new(TITLE_TEXT_SIZE).centered(),
        );
        ctx.canvas().draw_text(
            &format!("Master volume: {:.0}%", volume * 100.0),
            center,
            &TextStyle::new(TEXT_SIZE).centered(),
        );

        self.controls.clear();
        self.draw_control(
            ctx,
            Control::VolumeDown,
            "-",
            Vec2::new(center.x - STEPPER_OFFSET, center.y),
        );
        self.draw_control(
            ctx,
            Control::VolumeUp,
            "+",
            Vec2::new(center.x + STEPPER_OFFSET, center.y),
        );
        self.draw_control(
            ctx,
            Control::Back,
            "Back",
            Vec2::new(center.x, center.y + ROW_SPACING * 2.0),
        );
    }

    fn name(&self) -> &'static str {
        "Options"
    }
}
