//! Window attributes, icon and placement

use std::path::Path;

use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::window::{Fullscreen, Icon, Window, WindowAttributes};

use crate::config::WindowConfig;
use crate::render::AssetError;

/// Smallest window the letterboxed render area stays legible in
const MIN_WINDOW_SIZE: LogicalSize<f64> = LogicalSize::new(320.0, 180.0);

/// Builds window attributes from configuration
///
/// Fullscreen is borderless on the current monitor.
pub fn window_attributes_from_config(config: &WindowConfig) -> WindowAttributes {
    let size = LogicalSize::new(
        config.width.max(MIN_WINDOW_SIZE.width),
        config.height.max(MIN_WINDOW_SIZE.height),
    );

    let attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(size)
        .with_min_inner_size(MIN_WINDOW_SIZE)
        .with_resizable(config.resizable)
        .with_decorations(config.decorated);

    if config.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Decodes an image file into a window icon
pub fn load_window_icon(path: &Path) -> Result<Icon, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path.display().to_string()));
    }

    let decode_error = |reason: String| AssetError::Decode {
        path: path.display().to_string(),
        reason,
    };
    let image = image::open(path)
        .map_err(|e| decode_error(e.to_string()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Icon::from_rgba(image.into_raw(), width, height).map_err(|e| decode_error(e.to_string()))
}

/// Top-left position that centers `window` on a monitor
pub fn centered_position(
    monitor_position: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let offset = |monitor: u32, window: u32| (i64::from(monitor) - i64::from(window)) / 2;
    PhysicalPosition::new(
        monitor_position.x + offset(monitor_size.width, window.width) as i32,
        monitor_position.y + offset(monitor_size.height, window.height) as i32,
    )
}

/// Moves `window` to the middle of the primary monitor, if there is one
pub fn center_on_primary_monitor(window: &Window) -> bool {
    let Some(monitor) = window.primary_monitor().or_else(|| window.current_monitor()) else {
        return false;
    };
    let position = centered_position(monitor.position(), monitor.size(), window.outer_size());
    window.set_outer_position(position);
    true
}
