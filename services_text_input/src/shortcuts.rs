//! Keyboard-shortcut bindings for clipboard and selection commands.

use input_types::KeyCode;
use serde::{Deserialize, Serialize};

/// Physical layout the shortcut keys are chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyboardLayout {
    #[default]
    Qwerty,
    Azerty,
}

/// Key that triggers each shortcut together with the primary modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardShortcuts {
    pub select_all: KeyCode,
    pub copy: KeyCode,
    pub cut: KeyCode,
    pub paste: KeyCode,
}

impl KeyboardShortcuts {
    pub const fn qwerty() -> Self {
        Self {
            select_all: KeyCode::A,
            copy: KeyCode::C,
            cut: KeyCode::X,
            paste: KeyCode::V,
        }
    }

    /// Keys are reported by US position, so "A" on AZERTY arrives as `Q`.
    pub const fn azerty() -> Self {
        Self {
            select_all: KeyCode::Q,
            copy: KeyCode::C,
            cut: KeyCode::X,
            paste: KeyCode::V,
        }
    }

    pub fn for_layout(layout: KeyboardLayout) -> Self {
        match layout {
            KeyboardLayout::Qwerty => Self::qwerty(),
            KeyboardLayout::Azerty => Self::azerty(),
        }
    }
}

impl Default for KeyboardShortcuts {
    fn default() -> Self {
        Self::qwerty()
    }
}
