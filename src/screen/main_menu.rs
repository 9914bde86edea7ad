//! Title screen

use glam::Vec2;
use tracing::{debug, warn};

use super::{Screen, ScreenId, ScreenPayload};
use crate::context::ScreenContext;
use crate::input::{InputEvent, PointerButton, TimedInputEvent};
use crate::render::{Color, Rect, TextStyle, TextureId};

const MENU_MUSIC: &str = "menu_theme";
const MUSIC_VOLUME: f32 = 0.7;
const MUSIC_FADE_IN: f32 = 2.0;
const MUSIC_FADE_OUT: f32 = 1.0;
const BUTTON_TEXT_SIZE: f32 = 36.0;
const BUTTON_SPACING: f32 = 60.0;
const BACKGROUND_TINT: Color = Color::rgba(0.2, 0.2, 0.2, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Open(ScreenId),
    Quit,
}

#[derive(Debug)]
struct MenuButton {
    label: &'static str,
    action: MenuAction,
    /// Bounds from the last render, used for hit tests
    bounds: Option<Rect>,
}

/// Centered "Options" / "Quit" menu over a dimmed background
#[derive(Debug)]
pub struct MainMenu {
    buttons: Vec<MenuButton>,
    hovered: Option<usize>,
    background: Option<TextureId>,
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            buttons: vec![
                MenuButton {
                    label: "Options",
                    action: MenuAction::Open(ScreenId::Options),
                    bounds: None,
                },
                MenuButton {
                    label: "Quit",
                    action: MenuAction::Quit,
                    bounds: None,
                },
            ],
            hovered: None,
            background: None,
        }
    }

    fn update_hover(&mut self, pos: Vec2) {
        self.hovered = self
            .buttons
            .iter()
            .position(|b| b.bounds.is_some_and(|r| r.contains(pos)));
    }

    fn activate(&mut self, ctx: &mut ScreenContext<'_>, index: usize) {
        let Some(button) = self.buttons.get(index) else {
            return;
        };
        debug!(button = button.label, "Menu button activated");
        match button.action {
            MenuAction::Open(id) => {
                // Options returns to whichever screen opened it
                ctx.request_transition(id, Some(Box::new(ScreenId::MainMenu)));
            }
            MenuAction::Quit => ctx.request_quit(),
        }
    }

    fn start_music(ctx: &mut ScreenContext<'_>) {
        let path = ctx.assets().resolve(&ctx.assets().menu_music);
        let audio = ctx.audio();

        if let Err(e) = audio.load_music(MENU_MUSIC, &path) {
            warn!(error = %e, "Menu music unavailable, continuing in silence");
            return;
        }
        if let Err(e) = audio.play_music(MENU_MUSIC, MUSIC_VOLUME, true) {
            warn!(error = %e, "Failed to play menu music");
            return;
        }
        audio.fade_music_in(MUSIC_FADE_IN);
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for MainMenu {
    fn init(&mut self, ctx: &mut ScreenContext<'_>, _payload: Option<ScreenPayload>) {
        let path = ctx.assets().resolve(&ctx.assets().menu_background);
        match ctx.canvas().load_texture(&path) {
            Ok(texture) => self.background = Some(texture),
            Err(e) => warn!(error = %e, "Failed to load menu background, using solid color"),
        }

        Self::start_music(ctx);
    }

    fn handle_event(&mut self, ctx: &mut ScreenContext<'_>, event: &TimedInputEvent) {
        match &event.event {
            InputEvent::PointerMove(motion) => self.update_hover(motion.position),
            InputEvent::PointerButtonDown(press) if press.button == PointerButton::Left => {
                self.update_hover(press.position);
                if let Some(index) = self.hovered {
                    self.activate(ctx, index);
                }
            }
            _ => {}
        }
    }

    fn render(&mut self, ctx: &mut ScreenContext<'_>) {
        let size = ctx.render_size();
        let canvas = ctx.canvas();

        if let Some(texture) = self.background {
            canvas.draw_texture(texture, Rect::new(0.0, 0.0, size.x, size.y), BACKGROUND_TINT);
        }

        let count = self.buttons.len() as f32;
        let first_y = size.y / 2.0 - (count - 1.0) * BUTTON_SPACING / 2.0;
        for (i, button) in self.buttons.iter_mut().enumerate() {
            let color = if self.hovered == Some(i) {
                Color::YELLOW
            } else {
                Color::WHITE
            };
            let pos = Vec2::new(size.x / 2.0, first_y + i as f32 * BUTTON_SPACING);
            let style = TextStyle::new(BUTTON_TEXT_SIZE).color(color).centered();
            button.bounds = Some(canvas.draw_text(button.label, pos, &style));
        }
    }

    fn destroy(&mut self, ctx: &mut ScreenContext<'_>) {
        // The fade-out stops the track on its own
        ctx.audio().fade_music_out(MUSIC_FADE_OUT);

        if let Some(texture) = self.background.take() {
            ctx.canvas().unload_texture(texture);
        }
    }

    fn name(&self) -> &'static str {
        "MainMenu"
    }
}
