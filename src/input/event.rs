//! Timestamped input events

use std::time::Instant;

use bitflags::bitflags;
use glam::Vec2;

/// Flat classification of a [`TimedInputEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    KeyDown,
    KeyUp,
    PointerButtonDown,
    PointerButtonUp,
    PointerMove,
}

impl InputKind {
    /// Returns true for the three pointer kinds
    pub fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::PointerButtonDown | Self::PointerButtonUp | Self::PointerMove
        )
    }
}

bitflags! {
    /// Keyboard modifiers held when an event was captured
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

impl From<winit::keyboard::ModifiersState> for Modifiers {
    fn from(state: winit::keyboard::ModifiersState) -> Self {
        let mut modifiers = Self::empty();
        modifiers.set(Self::SHIFT, state.shift_key());
        modifiers.set(Self::CONTROL, state.control_key());
        modifiers.set(Self::ALT, state.alt_key());
        modifiers.set(Self::SUPER, state.super_key());
        modifiers
    }
}

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl From<winit::event::MouseButton> for PointerButton {
    fn from(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as WB;
        match button {
            WB::Left => Self::Left,
            WB::Right => Self::Right,
            WB::Middle => Self::Middle,
            WB::Back => Self::Other(3),
            WB::Forward => Self::Other(4),
            WB::Other(code) => Self::Other(code),
        }
    }
}

/// Key payload shared by key-down and key-up events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    /// Platform scan code, when the windowing layer exposes one
    pub scan_code: Option<u32>,
    pub modifiers: Modifiers,
}

/// Pointer button payload, position in logical render space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerButtonInput {
    pub button: PointerButton,
    pub position: Vec2,
    pub modifiers: Modifiers,
}

/// Pointer motion payload, position in logical render space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMotion {
    pub position: Vec2,
}

/// One user-input occurrence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    PointerButtonDown(PointerButtonInput),
    PointerButtonUp(PointerButtonInput),
    PointerMove(PointerMotion),
}

impl InputEvent {
    pub fn kind(&self) -> InputKind {
        match self {
            Self::KeyDown(_) => InputKind::KeyDown,
            Self::KeyUp(_) => InputKind::KeyUp,
            Self::PointerButtonDown(_) => InputKind::PointerButtonDown,
            Self::PointerButtonUp(_) => InputKind::PointerButtonUp,
            Self::PointerMove(_) => InputKind::PointerMove,
        }
    }
}

/// An [`InputEvent`] stamped with its capture time
///
/// Immutable once built; `Copy` so it can cross the capture/frame boundary by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedInputEvent {
    pub event: InputEvent,
    /// Monotonic capture instant, used for dispatch latency
    pub captured_at: Instant,
    /// Seconds since process start, from the same clock as `captured_at`
    pub capture_seconds: f64,
}

impl TimedInputEvent {
    pub fn kind(&self) -> InputKind {
        self.event.kind()
    }

    /// Key payload, for key kinds
    pub fn key(&self) -> Option<&KeyInput> {
        match &self.event {
            InputEvent::KeyDown(key) | InputEvent::KeyUp(key) => Some(key),
            _ => None,
        }
    }

    /// Logical pointer position, for pointer kinds
    pub fn pointer_position(&self) -> Option<Vec2> {
        match &self.event {
            InputEvent::PointerButtonDown(p) | InputEvent::PointerButtonUp(p) => Some(p.position),
            InputEvent::PointerMove(m) => Some(m.position),
            _ => None,
        }
    }

    /// Pointer button, for button kinds
    pub fn button(&self) -> Option<PointerButton> {
        match &self.event {
            InputEvent::PointerButtonDown(p) | InputEvent::PointerButtonUp(p) => Some(p.button),
            _ => None,
        }
    }

    /// Returns true if this is a key-down of `key`
    pub fn is_key_down(&self, key: Key) -> bool {
        matches!(&self.event, InputEvent::KeyDown(k) if k.key == key)
    }

    /// Returns true if this is a press of `button`
    pub fn is_button_down(&self, button: PointerButton) -> bool {
        matches!(&self.event, InputEvent::PointerButtonDown(p) if p.button == button)
    }
}

/// Key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Key {
    // Common keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Backquote,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    Other,
}

impl From<winit::keyboard::KeyCode> for Key {
    fn from(key: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as WK;
        match key {
            WK::Space => Self::Space,
            WK::Enter | WK::NumpadEnter => Self::Enter,
            WK::Escape => Self::Escape,
            WK::Backspace => Self::Backspace,
            WK::Tab => Self::Tab,
            WK::Backquote => Self::Backquote,

            WK::KeyA => Self::A,
            WK::KeyB => Self::B,
            WK::KeyC => Self::C,
            WK::KeyD => Self::D,
            WK::KeyE => Self::E,
            WK::KeyF => Self::F,
            WK::KeyG => Self::G,
            WK::KeyH => Self::H,
            WK::KeyI => Self::I,
            WK::KeyJ => Self::J,
            WK::KeyK => Self::K,
            WK::KeyL => Self::L,
            WK::KeyM => Self::M,
            WK::KeyN => Self::N,
            WK::KeyO => Self::O,
            WK::KeyP => Self::P,
            WK::KeyQ => Self::Q,
            WK::KeyR => Self::R,
            WK::KeyS => Self::S,
            WK::KeyT => Self::T,
            WK::KeyU => Self::U,
            WK::KeyV => Self::V,
            WK::KeyW => Self::W,
            WK::KeyX => Self::X,
            WK::KeyY => Self::Y,
            WK::KeyZ => Self::Z,

            WK::Digit0 => Self::Num0,
            WK::Digit1 => Self::Num1,
            WK::Digit2 => Self::Num2,
            WK::Digit3 => Self::Num3,
            WK::Digit4 => Self::Num4,
            WK::Digit5 => Self::Num5,
            WK::Digit6 => Self::Num6,
            WK::Digit7 => Self::Num7,
            WK::Digit8 => Self::Num8,
            WK::Digit9 => Self::Num9,

            WK::F1 => Self::F1,
            WK::F2 => Self::F2,
            WK::F3 => Self::F3,
            WK::F4 => Self::F4,
            WK::F5 => Self::F5,
            WK::F6 => Self::F6,
            WK::F7 => Self::F7,
            WK::F8 => Self::F8,
            WK::F9 => Self::F9,
            WK::F10 => Self::F10,
            WK::F11 => Self::F11,
            WK::F12 => Self::F12,

            WK::ArrowLeft => Self::Left,
            WK::ArrowRight => Self::Right,
            WK::ArrowUp => Self::Up,
            WK::ArrowDown => Self::Down,

            _ => Self::Other,
        }
    }
}
