//! Aethel
//!
//! Application shell for a 2D game: a timed input queue, a screen lifecycle,
//! fade transitions between screens and a per-frame driver, on winit, wgpu
//! and egui.

/// Windowing, the wgpu/egui renderer and the winit event loop
pub mod app;

/// Music playback
pub mod audio;

/// Build-time information (target, compiler, git SHA, etc.)
pub mod build_info;

pub mod config;

/// Shared application context and what screens see of it
pub mod context;

pub mod frame;

/// Action bar and diagnostics overlay
pub mod hud;

pub mod input;

pub mod render;

pub mod screen;

pub mod transition;
