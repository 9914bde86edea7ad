//! Sliding top bar hosting small interactive addons

use glam::Vec2;

use crate::input::{InputKind, TimedInputEvent};
use crate::render::{Canvas, Color, Rect};

/// Horizontal placement of an addon inside the bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarAlignment {
    Left,
    Center,
    Right,
}

/// A widget living in the [`ActionBar`]
pub trait BarAddon {
    fn alignment(&self) -> BarAlignment {
        BarAlignment::Center
    }

    fn update(&mut self, _dt: f32) {}

    /// Width the addon needs in logical units
    fn required_width(&self, canvas: &mut dyn Canvas) -> f32;

    fn render(&mut self, canvas: &mut dyn Canvas, rect: Rect, hovered: bool);

    fn on_click(&mut self) {}
}

const BAR_HEIGHT: f32 = 50.0;
const SLOT_PADDING: f32 = 4.0;
const HOVER_FADE_SPEED: f32 = 4.0;
const HOVER_MAX_ALPHA: f32 = 0.25;
const BAR_COLOR: Color = Color::rgba(0.12, 0.12, 0.12, 1.0);

/// Frame-rate independent smoothing factor
fn smoothing(dt: f32) -> f32 {
    1.0 - 0.001f32.powf(dt)
}

/// Lays out addon slots (bar-relative, y = 0): left-aligned from the left
/// edge, right-aligned from the right edge, centered ones in the space left
/// between the two blocks
pub fn layout_slots(
    items: &[(BarAlignment, f32)],
    bar_width: f32,
    height: f32,
) -> Vec<Rect> {
    let mut slots = vec![Rect::default(); items.len()];

    let mut x = 0.0;
    for (i, (alignment, width)) in items.iter().enumerate() {
        if *alignment == BarAlignment::Left {
            x += SLOT_PADDING;
            slots[i] = Rect::new(x, 0.0, *width, height);
            x += width;
        }
    }
    let left_block = x;

    x = bar_width;
    for (i, (alignment, width)) in items.iter().enumerate().rev() {
        if *alignment == BarAlignment::Right {
            x -= SLOT_PADDING + width;
            slots[i] = Rect::new(x, 0.0, *width, height);
        }
    }
    let right_block = bar_width - x;

    let centered: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, (alignment, _))| *alignment == BarAlignment::Center)
        .map(|(i, _)| i)
        .collect();
    if !centered.is_empty() {
        let total: f32 = centered.iter().map(|&i| items[i].1).sum::<f32>()
            + (centered.len() - 1) as f32 * SLOT_PADDING;
        let available = bar_width - left_block - right_block;
        x = left_block + available / 2.0 - total / 2.0;
        for i in centered {
            let width = items[i].1;
            slots[i] = Rect::new(x, 0.0, width, height);
            x += width + SLOT_PADDING;
        }
    }

    slots
}

/// Top bar that slides in and out and highlights the hovered addon
pub struct ActionBar {
    addons: Vec<Box<dyn BarAddon>>,
    /// Slots from the last render, bar-relative
    slots: Vec<Rect>,
    height: f32,
    visible: bool,
    current_y: f32,
    hovered: Option<usize>,
    target_hover: Rect,
    current_hover: Rect,
    hover_alpha: f32,
}

impl ActionBar {
    pub fn new() -> Self {
        Self {
            addons: Vec::new(),
            slots: Vec::new(),
            height: BAR_HEIGHT,
            visible: true,
            current_y: 0.0,
            hovered: None,
            target_hover: Rect::default(),
            current_hover: Rect::default(),
            hover_alpha: 0.0,
        }
    }

    pub fn add_addon(&mut self, addon: Box<dyn BarAddon>) {
        self.addons.push(addon);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Y coordinate just below the bar; content underneath starts here
    pub fn bottom(&self) -> f32 {
        self.current_y + self.height
    }

    fn fully_hidden(&self) -> bool {
        self.current_y <= -self.height
    }

    pub fn update(&mut self, dt: f32) {
        let target_y = if self.visible { 0.0 } else { -self.height };
        let t = smoothing(dt);

        self.current_y += (target_y - self.current_y) * t;
        if (self.current_y - target_y).abs() < 0.5 {
            self.current_y = target_y;
        }

        self.current_hover = self.current_hover.lerp(&self.target_hover, t);

        if self.hovered.is_some() {
            self.hover_alpha = (self.hover_alpha + HOVER_FADE_SPEED * dt).min(HOVER_MAX_ALPHA);
        } else {
            self.hover_alpha = (self.hover_alpha - HOVER_FADE_SPEED * dt).max(0.0);
        }

        for addon in &mut self.addons {
            addon.update(dt);
        }
    }

    /// Tracks hover from pointer motion and forwards clicks to the hovered addon
    pub fn handle_event(&mut self, event: &TimedInputEvent) {
        if self.fully_hidden() || !event.kind().is_pointer() {
            return;
        }
        let Some(pointer) = event.pointer_position() else {
            return;
        };

        let local = pointer - Vec2::new(0.0, self.current_y);
        let hit = self.slots.iter().position(|slot| slot.contains(local));

        match hit {
            Some(index) => {
                if self.hovered != Some(index) {
                    let slot = self.slots[index];
                    self.target_hover = slot;
                    if self.hovered.is_none() || self.hover_alpha == 0.0 {
                        self.current_hover = slot;
                    } else {
                        self.current_hover.y = slot.y;
                        self.current_hover.height = slot.height;
                    }
                    self.hovered = Some(index);
                }
                if event.kind() == InputKind::PointerButtonDown {
                    self.addons[index].on_click();
                }
            }
            None => self.hovered = None,
        }
    }

    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        if self.fully_hidden() {
            return;
        }

        let width = canvas.size().x;
        let items: Vec<(BarAlignment, f32)> = self
            .addons
            .iter()
            .map(|addon| (addon.alignment(), addon.required_width(canvas)))
            .collect();
        self.slots = layout_slots(&items, width, self.height);

        canvas.fill_rect(Rect::new(0.0, self.current_y, width, self.height), BAR_COLOR);

        if self.hover_alpha > 0.0 {
            let mut highlight = self.current_hover;
            highlight.y += self.current_y;
            canvas.fill_rect(highlight, Color::WHITE.with_alpha(self.hover_alpha));
        }

        for (i, (addon, slot)) in self.addons.iter_mut().zip(&self.slots).enumerate() {
            let mut rect = *slot;
            rect.y += self.current_y;
            addon.render(canvas, rect, self.hovered == Some(i));
        }
    }
}

impl Default for ActionBar {
    fn default() -> Self {
        Self::new()
    }
}
