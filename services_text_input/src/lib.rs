//! # Text Input Service
//!
//! Keeps an engine-side text field in sync with key, character, and
//! clipboard events delivered by the host window system.
//!
//! ## Philosophy
//!
//! - **Explicit collaborators**: Transport, clipboard, and key profile are passed in
//! - **Table-driven keys**: `(logical key, modifier class)` resolves to one [`EditAction`]
//! - **Convergent state**: Every host-side edit is announced back to the engine
//! - **Always forward keys**: Presses and releases reach the engine's key channel
//!   whether or not a field is focused
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - An input method editor (no composition or candidate window)
//! - A focus stack (one client at a time)
//! - An accessibility bridge

pub mod action;
pub mod clipboard;
pub mod profile;
pub mod service;
pub mod settings;
pub mod shortcuts;

pub use action::{resolve_action, EditAction, LogicalKey, ModifierClass, TextInputAction};
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use profile::{PlatformKeyProfile, TargetPlatform};
pub use service::TextInputService;
pub use settings::{SettingsError, TextInputSettings};
pub use shortcuts::{KeyboardLayout, KeyboardShortcuts};

/// Default channel carrying text-input method calls.
pub const TEXT_INPUT_CHANNEL: &str = "flutter/textinput";
/// Default channel carrying normalized key events.
pub const KEY_EVENT_CHANNEL: &str = "flutter/keyevent";
/// Default channel of the navigation collaborator.
pub const NAVIGATION_CHANNEL: &str = "flutter/navigation";

/// Inbound: focus a client.
pub const SET_CLIENT_METHOD: &str = "TextInput.setClient";
/// Inbound: drop the focused client.
pub const CLEAR_CLIENT_METHOD: &str = "TextInput.clearClient";
/// Inbound: replace the editing state.
pub const SET_EDITING_STATE_METHOD: &str = "TextInput.setEditingState";
/// Inbound: show the on-screen keyboard (no-op on desktop).
pub const SHOW_METHOD: &str = "TextInput.show";
/// Inbound: hide the on-screen keyboard (no-op on desktop).
pub const HIDE_METHOD: &str = "TextInput.hide";
/// Outbound: announce a host-side edit.
pub const UPDATE_EDITING_STATE_METHOD: &str = "TextInputClient.updateEditingState";
/// Outbound: announce an input action such as newline or done.
pub const PERFORM_ACTION_METHOD: &str = "TextInputClient.performAction";
/// Outbound on the navigation channel.
pub const POP_ROUTE_METHOD: &str = "popRoute";
