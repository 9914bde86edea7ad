//! Main application handler

use std::sync::Arc;

use anyhow::Context as _;
use chrono::Local;
use glam::Vec2;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use super::renderer::Renderer;
use super::window::{
    center_on_primary_monitor, load_window_icon, window_attributes_from_config,
};
use crate::audio;
use crate::config::AppConfig;
use crate::context::{AppContext, Services};
use crate::frame::FrameLoop;
use crate::hud::HudOverlay;
use crate::input::{InputCapture, InputClock, InputQueue};
use crate::screen::BuiltinScreens;

/// Window, capture side and frame loop wired to winit's event loop
pub struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    input: Arc<InputQueue>,
    capture: InputCapture,
    frame_loop: FrameLoop<BuiltinScreens>,
    context: Option<AppContext>,
    /// Startup failure, reported once the event loop returns
    failure: Option<anyhow::Error>,
}

impl App {
    /// Creates the application with the provided configuration
    pub fn new(config: AppConfig) -> Self {
        info!(profile = %config.profile, "Starting application");
        info!(?config.window, "Window configuration");

        let input = Arc::new(InputQueue::new());
        let capture = InputCapture::new(input.clone(), InputClock::start(), config.render.size());
        let hud = HudOverlay::with_defaults(Local::now());
        let frame_loop = FrameLoop::from_config(BuiltinScreens, hud, &config.input);

        Self {
            config,
            window: None,
            input,
            capture,
            frame_loop,
            context: None,
            failure: None,
        }
    }

    /// Error that stopped startup, if any
    pub fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let icon_path = self.config.assets.resolve(&self.config.assets.icon);
        let icon = match load_window_icon(&icon_path) {
            Ok(icon) => Some(icon),
            Err(e) => {
                warn!(error = %e, "Window icon unavailable");
                None
            }
        };
        let window_attributes =
            window_attributes_from_config(&self.config.window).with_window_icon(icon);
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        if !self.config.window.fullscreen && !center_on_primary_monitor(&window) {
            debug!("No monitor reported, leaving window placement to the platform");
        }

        let size = window.inner_size();
        info!(
            window.width = size.width,
            window.height = size.height,
            "Window created successfully"
        );

        // winit's event loop is synchronous; renderer setup is async
        let runtime = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        let renderer = runtime
            .block_on(Renderer::new(
                window.clone(),
                self.config.render.size(),
                self.config.window.vsync,
            ))
            .context("failed to initialize renderer")?;
        info!("Renderer initialized successfully");

        let services = Services {
            renderer: Box::new(renderer),
            audio: audio::open_default(),
            input: self.input.clone(),
            assets: self.config.assets.clone(),
        };
        let mut context = AppContext::new(services, self.config.screens.transition_seconds);
        context.set_initial_screen(self.config.screens.start, None);

        self.capture
            .set_window_size(Vec2::new(size.width as f32, size.height as f32));
        self.frame_loop.reset_clock();
        self.context = Some(context);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            error!(error = %e, "Startup failed");
            self.failure = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Capture first: every input event is stamped before anything else runs
        self.capture.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.context {
                    context
                        .services_mut()
                        .renderer
                        .resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(context) = &mut self.context {
                    let outcome = self.frame_loop.run_frame(context);
                    if outcome.quit {
                        info!("Quit requested, exiting");
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut context) = self.context.take() {
            context.shutdown();
        }
    }
}
