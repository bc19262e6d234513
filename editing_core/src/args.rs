//! Typed argument records of the text-input protocol.
//!
//! Inbound records are decoded at the channel boundary, so a payload of the
//! wrong shape is rejected before it reaches the store.

use crate::client::{ClientConfig, ClientId};
use crate::state::EditingState;
use serde::{Deserialize, Serialize};

/// `TextInput.setClient` arguments: `[clientId, config]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetClientArgs(pub ClientId, pub ClientConfig);

/// `TextInput.setEditingState` arguments.
///
/// Affinity and composing keys the engine also sends are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingStateArgs {
    pub text: String,
    #[serde(default)]
    pub selection_base: i64,
    #[serde(default)]
    pub selection_extent: i64,
}

/// Affinity reported with every announced state.
pub const DOWNSTREAM_AFFINITY: &str = "TextAffinity.downstream";

/// State announced to the engine after a host-side edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingStateUpdate {
    pub text: String,
    pub selection_base: i64,
    pub selection_extent: i64,
    pub selection_affinity: String,
    pub selection_is_directional: bool,
    pub composing_base: i64,
    pub composing_extent: i64,
}

impl EditingStateUpdate {
    pub fn from_state(state: &EditingState) -> Self {
        let offset = |offset: usize| i64::try_from(offset).unwrap_or(i64::MAX);
        Self {
            text: state.text(),
            selection_base: offset(state.selection_base()),
            selection_extent: offset(state.selection_extent()),
            selection_affinity: DOWNSTREAM_AFFINITY.to_string(),
            selection_is_directional: false,
            composing_base: -1,
            composing_extent: -1,
        }
    }
}
