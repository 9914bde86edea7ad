//! Per-frame driver
//!
//! One call to [`FrameLoop::step`] runs a whole frame, in this order:
//!
//! 1. advance audio fades
//! 2. drain the input queue (quit key, HUD, active screen)
//! 3. advance the transition, swapping screens when the fade-out completes
//! 4. build the desired screen immediately if no transition is running
//! 5. update and render the HUD and the active screen
//! 6. draw the fade overlay
//! 7. present, then run the screen's post-present hook

use std::time::Instant;

use tracing::{debug, error, trace, warn};

use crate::config::InputConfig;
use crate::context::AppContext;
use crate::hud::{HudOverlay, HudStatus};
use crate::input::{Key, TimedInputEvent};
use crate::render::{Color, RenderError};
use crate::screen::ScreenFactory;

/// Monotonic clock producing per-frame deltas
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous tick (or reset)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        dt
    }

    /// Restarts the delta so time spent outside the loop is not counted
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Events taken off the queue this frame, including intercepted ones
    pub events_drained: usize,
    /// Whether a screen was destroyed and/or constructed
    pub swapped: bool,
    /// Whether quit has been requested
    pub quit: bool,
}

/// Drives screens, transitions and the overlay one frame at a time
pub struct FrameLoop<F: ScreenFactory> {
    factory: F,
    hud: HudOverlay,
    quit_key: Option<Key>,
    hud_toggle_key: Option<Key>,
    latency_warn_ms: f64,
    clock: FrameClock,
}

impl<F: ScreenFactory> FrameLoop<F> {
    /// Creates a loop with Escape as the quit key and no HUD toggle key
    pub fn new(factory: F, hud: HudOverlay) -> Self {
        Self {
            factory,
            hud,
            quit_key: Some(Key::Escape),
            hud_toggle_key: None,
            latency_warn_ms: 5.0,
            clock: FrameClock::new(),
        }
    }

    /// Creates a loop with the reserved keys and latency threshold from `input`
    pub fn from_config(factory: F, hud: HudOverlay, input: &InputConfig) -> Self {
        Self::new(factory, hud)
            .with_quit_key(input.quit_key)
            .with_hud_toggle_key(input.hud_toggle_key)
            .with_latency_warn_ms(input.latency_warn_ms)
    }

    /// Key whose press quits from any screen; `None` lets screens see it
    pub fn with_quit_key(mut self, key: Option<Key>) -> Self {
        self.quit_key = key;
        self
    }

    pub fn with_hud_toggle_key(mut self, key: Option<Key>) -> Self {
        self.hud_toggle_key = key;
        self
    }

    pub fn with_latency_warn_ms(mut self, ms: f64) -> Self {
        self.latency_warn_ms = ms;
        self
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn hud(&self) -> &HudOverlay {
        &self.hud
    }

    /// Restarts the frame clock, e.g. right before the first frame
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    /// Runs one frame with `dt` measured by the frame clock
    pub fn run_frame(&mut self, ctx: &mut AppContext) -> FrameOutcome {
        let dt = self.clock.tick();
        self.step(ctx, dt)
    }

    /// Runs one frame of `dt` seconds
    pub fn step(&mut self, ctx: &mut AppContext, dt: f32) -> FrameOutcome {
        ctx.services_mut().audio.update(dt);

        let events_drained = self.drain_input(ctx);

        let mut swapped = ctx.advance_transition(dt, &self.factory);
        swapped |= ctx.ensure_desired_screen(&self.factory);
        if swapped {
            // Construction time must not leak into the next frame's dt
            self.clock.reset();
        }

        let status = HudStatus {
            screen: ctx.active_screen_name(),
            phase: ctx.transition().phase(),
        };
        self.hud.update(dt, &status);

        ctx.services_mut().renderer.clear(Color::BLACK);
        ctx.with_screen(|screen, sctx| {
            screen.update(sctx, dt);
            screen.render(sctx);
        });
        self.hud.render(ctx.services_mut().renderer.as_mut());

        if let Some(opacity) = ctx.transition().overlay_opacity() {
            ctx.services_mut().renderer.draw_overlay(opacity);
        }

        match ctx.services_mut().renderer.present() {
            Ok(()) => {
                ctx.with_screen(|screen, sctx| screen.post_present(sctx));
            }
            Err(RenderError::SurfaceLost) => {
                warn!("Surface lost, frame skipped");
            }
            Err(RenderError::OutOfMemory) => {
                error!("Renderer out of memory, exiting");
                ctx.request_quit();
            }
            Err(e) => {
                error!(error = %e, "Render error");
            }
        }

        FrameOutcome {
            events_drained,
            swapped,
            quit: ctx.quit_requested(),
        }
    }

    /// Empties the input queue, dispatching every event in capture order
    fn drain_input(&mut self, ctx: &mut AppContext) -> usize {
        let queue = ctx.services().input.clone();
        let mut drained = 0;

        while let Some(event) = queue.try_dequeue() {
            drained += 1;
            self.log_latency(&event);
            self.dispatch(ctx, &event);
        }

        drained
    }

    fn dispatch(&mut self, ctx: &mut AppContext, event: &TimedInputEvent) {
        if let Some(quit_key) = self.quit_key
            && event.is_key_down(quit_key)
        {
            debug!(key = ?quit_key, "Quit key pressed");
            ctx.request_quit();
            return;
        }

        if let Some(toggle_key) = self.hud_toggle_key
            && event.is_key_down(toggle_key)
        {
            self.hud.toggle();
            return;
        }

        if event.kind().is_pointer() {
            self.hud.handle_event(event);
        }

        if !ctx.dispatch_event(event) {
            trace!(kind = ?event.kind(), "No active screen, event dropped");
        }
    }

    fn log_latency(&self, event: &TimedInputEvent) {
        let latency_ms = event.captured_at.elapsed().as_secs_f64() * 1000.0;
        if latency_ms > self.latency_warn_ms {
            debug!(
                latency_ms,
                kind = ?event.kind(),
                "High input latency"
            );
        }
    }
}
