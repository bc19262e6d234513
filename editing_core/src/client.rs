//! Client handle and per-client configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of the focused text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(i64);

impl ClientId {
    /// Sentinel for "no field focused".
    pub const NONE: Self = Self(0);

    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client({})", self.0)
    }
}

/// Keyboard type requested by the field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputType {
    pub name: String,
}

/// Configuration sent with `setClient`.
///
/// Every key is optional; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub input_action: Option<String>,
    pub input_type: Option<InputType>,
    pub obscure_text: bool,
    pub autocorrect: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_id_sentinel() {
        assert!(ClientId::NONE.is_none());
        assert!(ClientId::default().is_none());
        assert!(!ClientId::new(7).is_none());
        assert_eq!(ClientId::new(7).get(), 7);
    }

    #[test]
    fn test_client_config_partial() {
        let config: ClientConfig = serde_json::from_value(json!({
            "inputAction": "TextInputAction.done",
            "inputType": {"name": "TextInputType.text", "signed": null},
            "keyboardAppearance": "Brightness.light"
        }))
        .unwrap();
        assert_eq!(config.input_action.as_deref(), Some("TextInputAction.done"));
        assert_eq!(config.input_type.unwrap().name, "TextInputType.text");
        assert!(!config.obscure_text);
    }

    #[test]
    fn test_client_config_empty() {
        let config: ClientConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
