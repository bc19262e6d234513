#![no_std]

//! # Input Types
//!
//! Key event types shared by the host window source and the text-input
//! service.
//!
//! ## Philosophy
//!
//! - **Logical keys**: The host maps its native codes to [`KeyCode`]; the native
//!   code travels along untouched for engines that want it
//! - **Explicit modifier sets**: Modifiers are a flag set compared by exact match
//! - **One wire layout**: Key events sent to the engine use a single
//!   meta-state bit layout regardless of host platform
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A scancode decoder
//! - Keyboard layout or IME handling
//! - A record of which keys are currently held

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use bitflags::bitflags;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Meta-state bit for Shift.
pub const META_SHIFT_ON: u32 = 1 << 0;
/// Meta-state bit for Alt/Option.
pub const META_ALT_ON: u32 = 1 << 1;
/// Meta-state bit for Control.
pub const META_CTRL_ON: u32 = 1 << 12;
/// Meta-state bit for Super/Command/Windows.
pub const META_META_ON: u32 = 1 << 16;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        /// Super/Command/Windows key.
        const SUPER = 1 << 3;
    }
}

impl Modifiers {
    /// Encodes this set in the meta-state bit layout sent to the engine.
    pub fn meta_state(self) -> u32 {
        let mut state = 0;
        if self.contains(Self::SHIFT) {
            state |= META_SHIFT_ON;
        }
        if self.contains(Self::ALT) {
            state |= META_ALT_ON;
        }
        if self.contains(Self::CTRL) {
            state |= META_CTRL_ON;
        }
        if self.contains(Self::SUPER) {
            state |= META_META_ON;
        }
        state
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        if self.contains(Self::CTRL) {
            parts.push("Ctrl");
        }
        if self.contains(Self::ALT) {
            parts.push("Alt");
        }
        if self.contains(Self::SHIFT) {
            parts.push("Shift");
        }
        if self.contains(Self::SUPER) {
            parts.push("Super");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    /// Key was pressed down
    Pressed,
    /// Key was released
    Released,
    /// Key is auto-repeating
    Repeat,
}

impl KeyState {
    /// Converts a raw host action code (0 release, 1 press, 2 repeat).
    ///
    /// Returns `None` for codes the host should not have produced.
    pub fn from_raw(action: i32) -> Option<Self> {
        match action {
            0 => Some(Self::Released),
            1 => Some(Self::Pressed),
            2 => Some(Self::Repeat),
            _ => None,
        }
    }

    /// Whether this state drives editing (press or auto-repeat).
    pub fn is_down(self) -> bool {
        matches!(self, Self::Pressed | Self::Repeat)
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed"),
            Self::Released => write!(f, "released"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}

/// Logical key code
///
/// Keys the text-input service gives meaning to are named; every other key
/// the host reports maps to [`KeyCode::Other`] and still reaches the engine
/// through its native code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
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

    // Editing and navigation
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Home,
    End,
    Left,
    Right,
    Up,
    Down,

    // Modifier keys themselves
    LeftShift,
    RightShift,
    LeftCtrl,
    RightCtrl,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,

    /// Any other key
    Other,
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Key transition reported by the host window source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// Logical key
    pub key: KeyCode,
    /// Host-native key code, forwarded verbatim to the engine
    pub native_code: i32,
    /// Press, release, or repeat
    pub state: KeyState,
    /// Modifier keys that were held
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: KeyCode, native_code: i32, state: KeyState, modifiers: Modifiers) -> Self {
        Self {
            key,
            native_code,
            state,
            modifiers,
        }
    }

    pub fn pressed(key: KeyCode, native_code: i32, modifiers: Modifiers) -> Self {
        Self::new(key, native_code, KeyState::Pressed, modifiers)
    }

    pub fn released(key: KeyCode, native_code: i32, modifiers: Modifiers) -> Self {
        Self::new(key, native_code, KeyState::Released, modifiers)
    }

    pub fn repeat(key: KeyCode, native_code: i32, modifiers: Modifiers) -> Self {
        Self::new(key, native_code, KeyState::Repeat, modifiers)
    }
}

/// Direction of a normalized key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEventType {
    #[serde(rename = "keydown")]
    KeyDown,
    #[serde(rename = "keyup")]
    KeyUp,
}

/// Platform-independent key event sent to the engine.
///
/// Serializes as `{keyCode, keymap, type, metaState}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedKeyEvent {
    pub key_code: i32,
    pub keymap: String,
    #[serde(rename = "type")]
    pub event_type: KeyEventType,
    pub meta_state: u32,
}

impl NormalizedKeyEvent {
    /// Normalizes a host key event.
    ///
    /// Only presses and releases have a normalized form; repeats return `None`.
    pub fn from_key_event(event: &KeyEvent, keymap: &str) -> Option<Self> {
        let event_type = match event.state {
            KeyState::Pressed => KeyEventType::KeyDown,
            KeyState::Released => KeyEventType::KeyUp,
            KeyState::Repeat => return None,
        };
        Some(Self {
            key_code: event.native_code,
            keymap: keymap.into(),
            event_type,
            meta_state: event.modifiers.meta_state(),
        })
    }
}
