//! Application shell
//!
//! Handles windowing, rendering, and the winit event loop.

pub mod renderer;
mod runner;
mod window;

pub use renderer::Renderer;
pub use runner::App;
pub use window::window_attributes_from_config;
