//! Window-to-render-space coordinate mapping

use glam::Vec2;

/// Uniform scale and centering offset that fits the logical render area
/// inside the window, with bars on the spare axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Logical render-space size
    pub render_size: Vec2,
    /// Window pixels per logical unit
    pub scale: f32,
    /// Window-pixel offset of the render area's top-left corner
    pub offset: Vec2,
}

impl Letterbox {
    /// Fits `render_size` into `window_size`
    ///
    /// Degenerate sizes (a minimized window) produce an identity mapping.
    pub fn fit(window_size: Vec2, render_size: Vec2) -> Self {
        if window_size.min_element() <= 0.0 || render_size.min_element() <= 0.0 {
            return Self::identity(render_size);
        }

        let scale = (window_size.x / render_size.x).min(window_size.y / render_size.y);
        // Offsets land on whole pixels
        let scaled = (render_size * scale).trunc();
        let offset = ((window_size - scaled) / 2.0).trunc();

        Self {
            render_size,
            scale,
            offset,
        }
    }

    pub fn identity(render_size: Vec2) -> Self {
        Self {
            render_size,
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }

    /// Window pixels to logical render space
    pub fn to_logical(&self, window_pos: Vec2) -> Vec2 {
        (window_pos - self.offset) / self.scale
    }

    /// Logical render space to window pixels
    pub fn to_window(&self, logical: Vec2) -> Vec2 {
        logical * self.scale + self.offset
    }
}
