//! Drawing capabilities consumed by screens, the HUD and the frame loop
//!
//! All coordinates are logical render-space units; the backing renderer owns
//! the mapping into the window.

use std::path::Path;

use glam::Vec2;
use thiserror::Error;

/// RGBA color, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const YELLOW: Self = Self::rgba(1.0, 1.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha replaced
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self::from_min_size(center - size / 2.0, size)
    }

    /// Check if a point is inside this rectangle (edges inclusive)
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.x
            && pos.x <= self.x + self.width
            && pos.y >= self.y
            && pos.y <= self.y + self.height
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.min() + self.size() / 2.0
    }

    /// Component-wise interpolation towards `target`
    pub fn lerp(&self, target: &Rect, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self::new(
            mix(self.x, target.x),
            mix(self.y, target.y),
            mix(self.width, target.width),
            mix(self.height, target.height),
        )
    }
}

/// Which point of the text box `draw_text`'s position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    TopLeft,
    Center,
}

/// Text appearance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in logical units
    pub size: f32,
    pub color: Color,
    pub anchor: TextAnchor,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            color: Color::WHITE,
            anchor: TextAnchor::TopLeft,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn centered(mut self) -> Self {
        self.anchor = TextAnchor::Center;
        self
    }
}

/// Handle to a texture owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Missing or unreadable asset
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Frame presentation failure
#[derive(Debug, Error)]
pub enum RenderError {
    /// The surface must be reconfigured; the frame is skipped
    #[error("render surface lost")]
    SurfaceLost,
    /// Unrecoverable; the application must exit
    #[error("renderer out of memory")]
    OutOfMemory,
    #[error("render error: {0}")]
    Other(String),
}

/// Text and 2D drawing capability used by screens and the HUD
pub trait Canvas {
    /// Logical render-space size
    fn size(&self) -> Vec2;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws `text` at `pos` and returns the bounds it covers
    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) -> Rect;

    /// Size `text` would cover, without drawing it
    fn measure_text(&mut self, text: &str, size: f32) -> Vec2;

    /// Loads an image file as a texture
    fn load_texture(&mut self, path: &Path) -> Result<TextureId, AssetError>;

    fn draw_texture(&mut self, texture: TextureId, rect: Rect, tint: Color);

    fn unload_texture(&mut self, texture: TextureId);
}

/// Frame-level capability used by the frame loop
pub trait RenderSurface: Canvas {
    /// Starts a frame by clearing the render area
    fn clear(&mut self, color: Color);

    /// Covers the whole render area in black at `opacity`
    fn draw_overlay(&mut self, opacity: f32);

    /// Composites and shows the frame
    fn present(&mut self) -> Result<(), RenderError>;

    /// The window now measures `width` x `height` physical pixels
    fn resize(&mut self, _width: u32, _height: u32) {}
}
