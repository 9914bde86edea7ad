//! Input pipeline
//!
//! Input crosses exactly one thread boundary, the [`InputQueue`]:
//!
//! ```text
//! WindowEvent (winit) → InputCapture → TimedInputEvent → InputQueue
//!                                                             ↓
//!                                              FrameLoop (drains once per frame)
//!                                                             ↓
//!                                               HudOverlay / active Screen
//! ```
//!
//! The capture side may run on any thread; everything after
//! [`InputQueue::try_dequeue`] runs on the frame-loop thread.

mod capture;
mod event;
mod letterbox;
mod queue;

pub use capture::{InputCapture, InputClock};
pub use event::{
    InputEvent, InputKind, Key, KeyInput, Modifiers, PointerButton, PointerButtonInput,
    PointerMotion, TimedInputEvent,
};
pub use letterbox::Letterbox;
pub use queue::InputQueue;
