//! Text input service configuration.
//!
//! Every key is optional; a missing key takes its default. Settings are
//! usually embedded in the host's JSON configuration:
//!
//! ```json
//! { "platform": "macos", "layout": "azerty", "keymap": "android" }
//! ```

use crate::profile::{PlatformKeyProfile, TargetPlatform};
use crate::shortcuts::{KeyboardLayout, KeyboardShortcuts};
use crate::{KEY_EVENT_CHANNEL, NAVIGATION_CHANNEL, TEXT_INPUT_CHANNEL};
use input_types::KeyCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keymap name reported in normalized key events.
pub const DEFAULT_KEYMAP: &str = "android";

/// Settings error types
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid text input settings: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextInputSettings {
    pub text_input_channel: String,
    pub key_event_channel: String,
    pub navigation_channel: String,
    pub keymap: String,
    /// Selects the key profile. When absent, falls back to the build target;
    /// embedders should set it from the host's own platform query.
    pub platform: TargetPlatform,
    pub layout: KeyboardLayout,
    /// Key that asks the navigation collaborator to pop a route; `null` disables it.
    pub pop_route_key: Option<KeyCode>,
}

impl TextInputSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn profile(&self) -> PlatformKeyProfile {
        PlatformKeyProfile::for_platform(self.platform)
    }

    pub fn shortcuts(&self) -> KeyboardShortcuts {
        KeyboardShortcuts::for_layout(self.layout)
    }
}

impl Default for TextInputSettings {
    fn default() -> Self {
        Self {
            text_input_channel: TEXT_INPUT_CHANNEL.to_string(),
            key_event_channel: KEY_EVENT_CHANNEL.to_string(),
            navigation_channel: NAVIGATION_CHANNEL.to_string(),
            keymap: DEFAULT_KEYMAP.to_string(),
            platform: TargetPlatform::current(),
            layout: KeyboardLayout::Qwerty,
            pop_route_key: Some(KeyCode::Escape),
        }
    }
}
