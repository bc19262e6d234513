//! Text input service: inbound protocol handlers and the key event translator.

use crate::action::{resolve_action, EditAction, TextInputAction};
use crate::clipboard::Clipboard;
use crate::profile::PlatformKeyProfile;
use crate::settings::TextInputSettings;
use crate::shortcuts::KeyboardShortcuts;
use crate::{
    CLEAR_CLIENT_METHOD, HIDE_METHOD, PERFORM_ACTION_METHOD, POP_ROUTE_METHOD, SET_CLIENT_METHOD,
    SET_EDITING_STATE_METHOD, SHOW_METHOD, UPDATE_EDITING_STATE_METHOD,
};
use editing_core::{EditingStateArgs, EditingStore, SetClientArgs};
use input_types::{KeyCode, KeyEvent, KeyState, Modifiers, NormalizedKeyEvent};
use ipc::{
    BasicMessageChannel, BinaryMessenger, JsonMessageCodec, JsonMethodCodec, MethodChannel,
    MethodError,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace, warn};

const INBOUND_METHODS: [&str; 5] = [
    SET_CLIENT_METHOD,
    CLEAR_CLIENT_METHOD,
    SET_EDITING_STATE_METHOD,
    SHOW_METHOD,
    HIDE_METHOD,
];

/// Bridges the engine's text-input protocol and host keyboard input.
///
/// Owns the editing store for the focused client. Inbound method calls on
/// the text-input channel mutate it; host key and character events mutate
/// it too and every such edit is announced back to the engine.
pub struct TextInputService {
    store: Rc<RefCell<EditingStore>>,
    text_input: MethodChannel<JsonMethodCodec>,
    key_events: BasicMessageChannel<JsonMessageCodec>,
    navigation: MethodChannel<JsonMethodCodec>,
    clipboard: Box<dyn Clipboard>,
    profile: PlatformKeyProfile,
    shortcuts: KeyboardShortcuts,
    keymap: String,
    pop_route_key: Option<KeyCode>,
}

impl TextInputService {
    /// Creates the service and registers its inbound handlers on `messenger`.
    pub fn new(
        messenger: Rc<dyn BinaryMessenger>,
        clipboard: impl Clipboard + 'static,
        settings: &TextInputSettings,
    ) -> Self {
        let service = Self {
            store: Rc::new(RefCell::new(EditingStore::new())),
            text_input: MethodChannel::new(
                Rc::clone(&messenger),
                settings.text_input_channel.as_str(),
                JsonMethodCodec,
            ),
            key_events: BasicMessageChannel::new(
                Rc::clone(&messenger),
                settings.key_event_channel.as_str(),
                JsonMessageCodec,
            ),
            navigation: MethodChannel::new(
                messenger,
                settings.navigation_channel.as_str(),
                JsonMethodCodec,
            ),
            clipboard: Box::new(clipboard),
            profile: settings.profile(),
            shortcuts: settings.shortcuts(),
            keymap: settings.keymap.clone(),
            pop_route_key: settings.pop_route_key,
        };
        service.register_handlers();
        service
    }

    /// Replaces the key profile chosen from the settings.
    pub fn with_profile(mut self, profile: PlatformKeyProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_shortcuts(mut self, shortcuts: KeyboardShortcuts) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    pub fn profile(&self) -> &PlatformKeyProfile {
        &self.profile
    }

    /// Shared handle to the editing store.
    pub fn store(&self) -> Rc<RefCell<EditingStore>> {
        Rc::clone(&self.store)
    }

    fn register_handlers(&self) {
        let store = Rc::clone(&self.store);
        self.text_input
            .set_method_handler(SET_CLIENT_METHOD, move |call| {
                let SetClientArgs(client, config) = call.args()?;
                store.borrow_mut().set_client(client, config);
                Ok(Value::Null)
            });

        let store = Rc::clone(&self.store);
        self.text_input
            .set_method_handler(CLEAR_CLIENT_METHOD, move |_| {
                store.borrow_mut().clear_client();
                Ok(Value::Null)
            });

        let store = Rc::clone(&self.store);
        self.text_input
            .set_method_handler(SET_EDITING_STATE_METHOD, move |call| {
                let args: EditingStateArgs = call.args()?;
                store
                    .borrow_mut()
                    .set_editing_state(&args.text, args.selection_base, args.selection_extent)
                    .map_err(|err| MethodError::new(err.code(), err.to_string()))?;
                Ok(Value::Null)
            });

        // No on-screen keyboard on desktop hosts.
        for method in [SHOW_METHOD, HIDE_METHOD] {
            self.text_input.set_method_handler(method, |call| {
                trace!(method = %call.method, "ignoring keyboard visibility request");
                Ok(Value::Null)
            });
        }
    }

    /// Handles a character typed by the host window source.
    pub fn handle_char(&self, ch: char) {
        if ch.is_control() {
            trace!(code = u32::from(ch), "ignoring control character");
            return;
        }
        let mut buf = [0u8; 4];
        let changed = self.store.borrow_mut().insert(ch.encode_utf8(&mut buf));
        if changed {
            self.announce_state();
        }
    }

    /// Handles a key event using the host's raw action code.
    ///
    /// Codes other than release (0), press (1), and repeat (2) are dropped.
    pub fn handle_raw_key(&self, key: KeyCode, native_code: i32, action: i32, modifiers: Modifiers) {
        match KeyState::from_raw(action) {
            Some(state) => self.handle_key_event(&KeyEvent::new(key, native_code, state, modifiers)),
            None => warn!(action, native_code, "dropping key event with unknown action"),
        }
    }

    /// Handles a key transition.
    ///
    /// Presses and repeats drive editing. Presses and releases are always
    /// forwarded to the engine as normalized key events, focused or not,
    /// except a press of the pop-route key, which only pops a route.
    pub fn handle_key_event(&self, event: &KeyEvent) {
        if event.state == KeyState::Pressed && Some(event.key) == self.pop_route_key {
            debug!(key = %event.key, "requesting route pop");
            if let Err(err) = self.navigation.invoke_method(POP_ROUTE_METHOD, Value::Null) {
                warn!(error = %err, "failed to request route pop");
            }
            return;
        }

        if event.state.is_down() {
            self.translate(event);
        }
        self.forward(event);
    }

    fn translate(&self, event: &KeyEvent) {
        if !self.store.borrow().has_client() {
            return;
        }
        let Some(action) = resolve_action(&self.profile, &self.shortcuts, event.key, event.modifiers)
        else {
            return;
        };
        trace!(key = %event.key, modifiers = %event.modifiers, ?action, "key action");
        self.apply(action);
    }

    fn apply(&self, action: EditAction) {
        match action {
            EditAction::InsertNewline => {
                let changed = self.store.borrow_mut().insert("\n");
                if changed {
                    self.announce_state();
                }
                self.perform_action(TextInputAction::Newline);
            }
            EditAction::Perform(action) => self.perform_action(action),
            EditAction::Move {
                direction,
                granularity,
                extend,
            } => {
                let changed = self
                    .store
                    .borrow_mut()
                    .move_cursor(direction, granularity, extend);
                if changed {
                    self.announce_state();
                }
            }
            EditAction::Delete {
                direction,
                granularity,
            } => {
                let changed = self.store.borrow_mut().delete(direction, granularity);
                if changed {
                    self.announce_state();
                }
            }
            EditAction::SelectAll => {
                let changed = self.store.borrow_mut().select_all();
                if changed {
                    self.announce_state();
                }
            }
            EditAction::Copy => {
                self.copy_selection();
            }
            EditAction::Cut => {
                if self.copy_selection() {
                    let changed = self.store.borrow_mut().remove_selection();
                    if changed {
                        self.announce_state();
                    }
                }
            }
            EditAction::Paste => match self.clipboard.get_text() {
                Ok(text) => {
                    let changed = self.store.borrow_mut().insert(&text);
                    if changed {
                        self.announce_state();
                    }
                }
                Err(err) => warn!(error = %err, "paste aborted"),
            },
        }
    }

    /// Copies the selected text. Returns whether the clipboard now holds it.
    fn copy_selection(&self) -> bool {
        let Some(text) = self.store.borrow().selected_text() else {
            return false;
        };
        match self.clipboard.set_text(&text) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "copy aborted");
                false
            }
        }
    }

    fn announce_state(&self) {
        // The store borrow must end before invoking; the peer may call back in.
        let args = {
            let store = self.store.borrow();
            store.update().map(|update| json!([store.client(), update]))
        };
        let Some(args) = args else {
            return;
        };
        if let Err(err) = self
            .text_input
            .invoke_method(UPDATE_EDITING_STATE_METHOD, args)
        {
            warn!(error = %err, "failed to announce editing state");
        }
    }

    fn perform_action(&self, action: TextInputAction) {
        let client = self.store.borrow().client();
        if client.is_none() {
            return;
        }
        if let Err(err) = self
            .text_input
            .invoke_method(PERFORM_ACTION_METHOD, json!([client, action.as_str()]))
        {
            warn!(error = %err, "failed to perform input action");
        }
    }

    fn forward(&self, event: &KeyEvent) {
        let Some(normalized) = NormalizedKeyEvent::from_key_event(event, &self.keymap) else {
            return;
        };
        let message = match serde_json::to_value(&normalized) {
            Ok(message) => message,
            Err(err) => {
                warn!(error = %err, "failed to encode key event");
                return;
            }
        };
        if let Err(err) = self.key_events.send(&message) {
            warn!(channel = %self.key_events.name(), error = %err, "failed to forward key event");
        }
    }
}

impl Drop for TextInputService {
    fn drop(&mut self) {
        for method in INBOUND_METHODS {
            self.text_input.remove_method_handler(method);
        }
    }
}
