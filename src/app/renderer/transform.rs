//! Logical render space to egui screen space

use glam::Vec2;

use crate::input::Letterbox;
use crate::render::{Color, Rect};

/// Maps logical render-space geometry into egui points
///
/// The letterbox works in physical window pixels; egui paints in points, so
/// every mapped value is divided by `pixels_per_point` afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub letterbox: Letterbox,
    pub pixels_per_point: f32,
}

impl ViewTransform {
    pub fn new(window_size: Vec2, render_size: Vec2, pixels_per_point: f32) -> Self {
        Self {
            letterbox: Letterbox::fit(window_size, render_size),
            pixels_per_point: if pixels_per_point > 0.0 {
                pixels_per_point
            } else {
                1.0
            },
        }
    }

    /// Points per logical unit
    pub fn scale(&self) -> f32 {
        self.letterbox.scale / self.pixels_per_point
    }

    pub fn to_screen_pos(&self, logical: Vec2) -> egui::Pos2 {
        let p = self.letterbox.to_window(logical) / self.pixels_per_point;
        egui::pos2(p.x, p.y)
    }

    pub fn to_screen_rect(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.to_screen_pos(rect.min()),
            egui::vec2(rect.width, rect.height) * self.scale(),
        )
    }

    /// Converts a size in points back to logical units
    pub fn to_logical_size(&self, size: egui::Vec2) -> Vec2 {
        Vec2::new(size.x, size.y) / self.scale()
    }

    /// The whole window, in points
    pub fn window_area(&self, window_size: Vec2) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(window_size.x, window_size.y) / self.pixels_per_point,
        )
    }

    /// The whole logical render area, in points
    pub fn render_area(&self) -> egui::Rect {
        self.to_screen_rect(Rect::from_min_size(Vec2::ZERO, self.letterbox.render_size))
    }
}

pub fn to_color32(color: Color) -> egui::Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a),
    )
}
