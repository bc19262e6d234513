//! Editing state store for the focused client.

use crate::args::EditingStateUpdate;
use crate::client::{ClientConfig, ClientId};
use crate::state::{Direction, EditingState, Granularity};
use thiserror::Error;
use tracing::{debug, trace};

/// Editing store error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditingError {
    #[error("cannot set editing state when no client is selected")]
    NoClientSelected,
}

impl EditingError {
    /// Stable code used in method error replies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoClientSelected => "no_client_selected",
        }
    }
}

/// Focused client and its editing state.
///
/// Every mutator returns whether the state changed. With no client focused
/// they return `false` and touch nothing.
#[derive(Debug, Clone, Default)]
pub struct EditingStore {
    client: ClientId,
    config: ClientConfig,
    state: EditingState,
}

impl EditingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(&self) -> ClientId {
        self.client
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> &EditingState {
        &self.state
    }

    pub fn has_client(&self) -> bool {
        !self.client.is_none()
    }

    /// Focuses `client`. Existing text is kept until the engine sends a new state.
    pub fn set_client(&mut self, client: ClientId, config: ClientConfig) {
        debug!(%client, "set client");
        self.client = client;
        self.config = config;
    }

    /// Forgets the focused client and discards its text and selection.
    pub fn clear_client(&mut self) {
        debug!(client = %self.client, "clear client");
        self.client = ClientId::NONE;
        self.config = ClientConfig::default();
        self.state = EditingState::default();
    }

    /// Replaces the state wholesale, clamping the selection into the text.
    pub fn set_editing_state(
        &mut self,
        text: &str,
        selection_base: i64,
        selection_extent: i64,
    ) -> Result<(), EditingError> {
        if !self.has_client() {
            return Err(EditingError::NoClientSelected);
        }
        self.state = EditingState::new(text, selection_base, selection_extent);
        trace!(
            len = self.state.len(),
            base = self.state.selection_base(),
            extent = self.state.selection_extent(),
            "editing state replaced"
        );
        Ok(())
    }

    /// Record announcing the current state to the engine, if a client is focused.
    pub fn update(&self) -> Option<EditingStateUpdate> {
        self.has_client()
            .then(|| EditingStateUpdate::from_state(&self.state))
    }

    /// Inserts `text` at the caret, replacing any selection.
    pub fn insert(&mut self, text: &str) -> bool {
        if !self.has_client() {
            return false;
        }
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() && self.state.is_collapsed() {
            return false;
        }
        self.state.replace_selection(&chars);
        true
    }

    /// Deletes one unit in `direction`, or the selection when there is one.
    pub fn delete(&mut self, direction: Direction, granularity: Granularity) -> bool {
        if !self.has_client() {
            return false;
        }
        if !self.state.is_collapsed() {
            return self.remove_selection();
        }

        let caret = self.state.selection_extent();
        let range = match direction {
            Direction::Backward => self.state.target(caret, direction, granularity)..caret,
            Direction::Forward => caret..self.state.target(caret, direction, granularity),
        };
        if range.is_empty() {
            return false;
        }
        self.state.delete_range(range);
        true
    }

    /// Moves the caret, or the selection extent when `extend` is set.
    ///
    /// A plain character move over a selection collapses it to the edge in
    /// `direction`.
    pub fn move_cursor(&mut self, direction: Direction, granularity: Granularity, extend: bool) -> bool {
        if !self.has_client() {
            return false;
        }
        let before = (self.state.selection_base(), self.state.selection_extent());

        if extend {
            let extent = self
                .state
                .target(self.state.selection_extent(), direction, granularity);
            self.state.set_selection(self.state.selection_base(), extent);
        } else {
            let range = self.state.selection_range();
            let edge = match direction {
                Direction::Backward => range.start,
                Direction::Forward => range.end,
            };
            let caret = if range.is_empty() || granularity != Granularity::Character {
                self.state.target(edge, direction, granularity)
            } else {
                edge
            };
            self.state.collapse_to(caret);
        }

        before != (self.state.selection_base(), self.state.selection_extent())
    }

    /// Selects the whole text, anchored at the start.
    pub fn select_all(&mut self) -> bool {
        if !self.has_client() {
            return false;
        }
        let before = (self.state.selection_base(), self.state.selection_extent());
        let len = self.state.len();
        self.state.set_selection(0, len);
        before != (0, len)
    }

    /// Selected text, when a non-empty selection exists.
    pub fn selected_text(&self) -> Option<String> {
        (self.has_client() && !self.state.is_collapsed()).then(|| self.state.selected_text())
    }

    /// Deletes the selected text.
    pub fn remove_selection(&mut self) -> bool {
        if !self.has_client() || self.state.is_collapsed() {
            return false;
        }
        let range = self.state.selection_range();
        self.state.delete_range(range);
        true
    }
}
