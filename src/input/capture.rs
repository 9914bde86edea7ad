//! Capture side: winit window events to timed input events

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use tracing::trace;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

use super::event::{
    InputEvent, Key, KeyInput, Modifiers, PointerButton, PointerButtonInput, PointerMotion,
    TimedInputEvent,
};
use super::letterbox::Letterbox;
use super::queue::InputQueue;

/// Monotonic clock that input events are stamped from
#[derive(Debug, Clone, Copy)]
pub struct InputClock {
    started_at: Instant,
}

impl InputClock {
    /// Starts the clock now
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Stamps an event with the current instant
    pub fn stamp(&self, event: InputEvent) -> TimedInputEvent {
        let captured_at = Instant::now();
        TimedInputEvent {
            event,
            captured_at,
            capture_seconds: (captured_at - self.started_at).as_secs_f64(),
        }
    }
}

/// Translates raw window input into [`TimedInputEvent`]s and enqueues them
///
/// Pointer coordinates are mapped into logical render space here, before
/// anything reaches the queue.
pub struct InputCapture {
    queue: Arc<InputQueue>,
    clock: InputClock,
    letterbox: Letterbox,
    render_size: Vec2,
    /// Last cursor position, logical render space
    cursor: Vec2,
    modifiers: Modifiers,
}

impl InputCapture {
    /// Creates a capture side feeding `queue`
    pub fn new(queue: Arc<InputQueue>, clock: InputClock, render_size: Vec2) -> Self {
        Self {
            queue,
            clock,
            letterbox: Letterbox::identity(render_size),
            render_size,
            cursor: Vec2::ZERO,
            modifiers: Modifiers::empty(),
        }
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                self.set_window_size(Vec2::new(size.width as f32, size.height as f32));
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = Modifiers::from(modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.on_key(
                        Key::from(code),
                        scan_code(&event.physical_key),
                        event.state == ElementState::Pressed,
                        event.repeat,
                    );
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.on_button(PointerButton::from(*button), *state == ElementState::Pressed);
            }

            _ => {}
        }
    }

    /// Recomputes the letterbox for a new window size (physical pixels)
    pub fn set_window_size(&mut self, window_size: Vec2) {
        self.letterbox = Letterbox::fit(window_size, self.render_size);
    }

    /// Key press or release; auto-repeat presses are not events
    pub fn on_key(&mut self, key: Key, scan_code: Option<u32>, pressed: bool, repeat: bool) {
        if repeat {
            return;
        }
        let input = KeyInput {
            key,
            scan_code,
            modifiers: self.modifiers,
        };
        self.push(if pressed {
            InputEvent::KeyDown(input)
        } else {
            InputEvent::KeyUp(input)
        });
    }

    /// Cursor motion, in window pixels
    pub fn on_cursor_moved(&mut self, window_pos: Vec2) {
        self.cursor = self.letterbox.to_logical(window_pos);
        self.push(InputEvent::PointerMove(PointerMotion {
            position: self.cursor,
        }));
    }

    /// Button press or release at the last cursor position
    pub fn on_button(&mut self, button: PointerButton, pressed: bool) {
        let input = PointerButtonInput {
            button,
            position: self.cursor,
            modifiers: self.modifiers,
        };
        self.push(if pressed {
            InputEvent::PointerButtonDown(input)
        } else {
            InputEvent::PointerButtonUp(input)
        });
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    fn push(&self, event: InputEvent) {
        let timed = self.clock.stamp(event);
        trace!(kind = ?timed.kind(), t = timed.capture_seconds, "Captured input");
        self.queue.enqueue(timed);
    }
}

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
fn scan_code(key: &PhysicalKey) -> Option<u32> {
    use winit::platform::scancode::PhysicalKeyExtScancode;
    key.to_scancode()
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn scan_code(_key: &PhysicalKey) -> Option<u32> {
    None
}
