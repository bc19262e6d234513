//! Text input pipeline integration tests
//!
//! Host window events → TextInputService → channels → engine.
//!
//! ## Pipeline Flow
//!
//! 1. **Engine focus**: engine sends `setClient` / `setEditingState`
//! 2. **Host input**: window source reports characters and key transitions
//! 3. **Translation**: profile + shortcut table pick an editing action
//! 4. **Convergence**: every edit is announced with `updateEditingState`
//! 5. **Key forwarding**: presses and releases reach the key-event channel

use editing_core::ClientId;
use input_types::{KeyCode, KeyEvent, KeyEventType, Modifiers, META_SHIFT_ON};
use ipc::{InvokeError, LocalMessenger};
use proptest::prelude::*;
use serde_json::{json, Value};
use services_text_input::{
    Clipboard, ClipboardError, MemoryClipboard, PlatformKeyProfile, TargetPlatform,
    TextInputService, TextInputSettings, CLEAR_CLIENT_METHOD, PERFORM_ACTION_METHOD,
    POP_ROUTE_METHOD, SET_CLIENT_METHOD, SET_EDITING_STATE_METHOD, UPDATE_EDITING_STATE_METHOD,
};
use std::rc::Rc;
use tests_pipelines::RecordingEngine;

struct Pipeline {
    messenger: LocalMessenger,
    engine: RecordingEngine,
    clipboard: MemoryClipboard,
    service: TextInputService,
}

fn pipeline(platform: TargetPlatform) -> Pipeline {
    pipeline_with(TextInputSettings {
        platform,
        ..TextInputSettings::default()
    })
}

fn pipeline_with(settings: TextInputSettings) -> Pipeline {
    let messenger = LocalMessenger::new();
    let engine = RecordingEngine::attach(&messenger, &settings);
    let clipboard = MemoryClipboard::new();
    let service = TextInputService::new(Rc::new(messenger.clone()), clipboard.clone(), &settings);
    Pipeline {
        messenger,
        engine,
        clipboard,
        service,
    }
}

impl Pipeline {
    fn focus(&self, client: i64, text: &str, base: i64, extent: i64) {
        self.engine
            .call(SET_CLIENT_METHOD, json!([client, {"inputAction": "TextInputAction.newline"}]))
            .expect("setClient should succeed");
        self.engine
            .call(
                SET_EDITING_STATE_METHOD,
                json!({"text": text, "selectionBase": base, "selectionExtent": extent}),
            )
            .expect("setEditingState should succeed");
    }

    fn tap(&self, key: KeyCode, native_code: i32, modifiers: Modifiers) {
        self.service
            .handle_key_event(&KeyEvent::pressed(key, native_code, modifiers));
        self.service
            .handle_key_event(&KeyEvent::released(key, native_code, modifiers));
    }

    fn text(&self) -> String {
        self.service.store().borrow().state().text()
    }

    fn selection(&self) -> (usize, usize) {
        let store = self.service.store();
        let store = store.borrow();
        (store.state().selection_base(), store.state().selection_extent())
    }

    /// Last state announced to the engine.
    fn announced(&self) -> Option<Value> {
        self.engine
            .calls_to(UPDATE_EDITING_STATE_METHOD)
            .last()
            .cloned()
    }
}

#[test]
fn test_set_client_then_editing_state() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(7, "abc", 0, 3);

    let store = p.service.store();
    let store = store.borrow();
    assert_eq!(store.client(), ClientId::new(7));
    assert_eq!(store.state().text(), "abc");
    assert_eq!(store.state().selection_base(), 0);
    assert_eq!(store.state().selection_extent(), 3);
    assert!(p.engine.calls().is_empty(), "inbound state is not echoed");
}

#[test]
fn test_editing_state_without_client_is_rejected() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(7, "keep", 4, 4);
    p.engine.call(CLEAR_CLIENT_METHOD, Value::Null).unwrap();

    let result = p.engine.call(
        SET_EDITING_STATE_METHOD,
        json!({"text": "x", "selectionBase": 0, "selectionExtent": 1}),
    );
    match result {
        Err(InvokeError::Method(err)) => assert_eq!(err.code, "no_client_selected"),
        other => panic!("expected no_client_selected, got {other:?}"),
    }
    assert_eq!(p.text(), "");
    assert!(!p.service.store().borrow().has_client());
}

#[test]
fn test_out_of_range_selection_is_clamped() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(1, "abc", -4, 99);
    assert_eq!(p.selection(), (0, 3));
}

#[test]
fn test_malformed_arguments_are_structured_errors() {
    let p = pipeline(TargetPlatform::Linux);
    match p.engine.call(SET_CLIENT_METHOD, json!("seven")) {
        Err(InvokeError::Method(err)) => {
            assert_eq!(err.code, "invalid_arguments");
            assert!(err.details.is_some());
        }
        other => panic!("expected invalid_arguments, got {other:?}"),
    }
}

#[test]
fn test_unknown_method_is_unimplemented() {
    let p = pipeline(TargetPlatform::Linux);
    match p.engine.call("TextInput.requestAutofill", Value::Null) {
        Err(InvokeError::Method(err)) => assert_eq!(err.code, "unimplemented"),
        other => panic!("expected unimplemented, got {other:?}"),
    }
}

#[test]
fn test_arrow_right_moves_and_clamps() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(1, "hello", 2, 2);
    p.tap(KeyCode::Right, 114, Modifiers::empty());
    assert_eq!(p.selection(), (3, 3));

    p.focus(1, "hello", 5, 5);
    p.engine.clear();
    p.tap(KeyCode::Right, 114, Modifiers::empty());
    assert_eq!(p.selection(), (5, 5));
    assert!(p.announced().is_none(), "no change, no announcement");
}

#[test]
fn test_word_left_from_inside_word() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(1, "hello world", 8, 8);
    p.tap(KeyCode::Left, 113, Modifiers::CTRL);
    assert_eq!(p.selection(), (6, 6));

    let announced = p.announced().unwrap();
    assert_eq!(announced[0], json!(1));
    assert_eq!(announced[1]["selectionBase"], json!(6));
    assert_eq!(announced[1]["selectionExtent"], json!(6));
}

#[test]
fn test_typing_without_client_is_silent() {
    let p = pipeline(TargetPlatform::Linux);
    p.service.handle_char('q');
    assert_eq!(p.text(), "");
    assert!(p.engine.calls_to(UPDATE_EDITING_STATE_METHOD).is_empty());
}

#[test]
fn test_typing_announces_full_state() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(3, "", 0, 0);
    for ch in "héllo".chars() {
        p.service.handle_char(ch);
    }
    assert_eq!(p.text(), "héllo");
    assert_eq!(p.engine.calls_to(UPDATE_EDITING_STATE_METHOD).len(), 5);
    assert_eq!(
        p.announced().unwrap(),
        json!([3, {
            "text": "héllo",
            "selectionBase": 5,
            "selectionExtent": 5,
            "selectionAffinity": "TextAffinity.downstream",
            "selectionIsDirectional": false,
            "composingBase": -1,
            "composingExtent": -1
        }])
    );
}

#[test]
fn test_press_release_emits_keydown_then_keyup() {
    let p = pipeline(TargetPlatform::Linux);
    p.tap(KeyCode::A, 38, Modifiers::empty());

    let events = p.engine.key_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, KeyEventType::KeyDown);
    assert_eq!(events[1].event_type, KeyEventType::KeyUp);
    assert_eq!(events[0].key_code, 38);
    assert_eq!(events[0].key_code, events[1].key_code);
    assert_eq!(events[0].keymap, "android");
}

#[test]
fn test_shift_sets_meta_state_bit_zero() {
    let p = pipeline(TargetPlatform::Linux);
    p.tap(KeyCode::A, 38, Modifiers::SHIFT);
    for event in p.engine.key_events() {
        assert_eq!(event.meta_state & META_SHIFT_ON, META_SHIFT_ON);
    }
}

#[test]
fn test_raw_host_codes() {
    let p = pipeline(TargetPlatform::Linux);
    p.service.handle_raw_key(KeyCode::A, 38, 1, Modifiers::CTRL);
    p.service.handle_raw_key(KeyCode::A, 38, 2, Modifiers::CTRL);
    p.service.handle_raw_key(KeyCode::A, 38, 0, Modifiers::CTRL);
    p.service.handle_raw_key(KeyCode::A, 38, 5, Modifiers::CTRL);

    let types: Vec<_> = p.engine.key_events().iter().map(|e| e.event_type).collect();
    assert_eq!(types, vec![KeyEventType::KeyDown, KeyEventType::KeyUp]);
}

#[test]
fn test_escape_pops_route() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(1, "abc", 3, 3);
    p.engine.clear();

    p.service
        .handle_key_event(&KeyEvent::pressed(KeyCode::Escape, 9, Modifiers::empty()));
    let calls = p.engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].channel, "flutter/navigation");
    assert_eq!(calls[0].method, POP_ROUTE_METHOD);
    assert!(p.engine.key_events().is_empty());
    assert_eq!(p.text(), "abc");
    assert_eq!(p.messenger.run_pending(), 1);
}

#[test]
fn test_pop_route_key_can_be_disabled() {
    let p = pipeline_with(TextInputSettings {
        pop_route_key: None,
        ..TextInputSettings::default()
    });
    p.tap(KeyCode::Escape, 9, Modifiers::empty());
    assert!(p.engine.calls_to(POP_ROUTE_METHOD).is_empty());
    assert_eq!(p.engine.key_events().len(), 2);
}

#[test]
fn test_enter_actions() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(4, "ab", 2, 2);
    p.tap(KeyCode::Enter, 36, Modifiers::empty());
    assert_eq!(p.text(), "ab\n");
    assert_eq!(
        p.engine.calls_to(PERFORM_ACTION_METHOD),
        vec![json!([4, "TextInputAction.newline"])]
    );

    p.tap(KeyCode::Enter, 36, Modifiers::CTRL);
    assert_eq!(p.text(), "ab\n");
    assert_eq!(
        p.engine.calls_to(PERFORM_ACTION_METHOD).last(),
        Some(&json!([4, "TextInputAction.done"]))
    );
}

#[test]
fn test_select_all_then_type_replaces() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(1, "old text", 0, 0);
    p.tap(KeyCode::A, 38, Modifiers::CTRL);
    assert_eq!(p.selection(), (0, 8));
    p.service.handle_char('n');
    assert_eq!(p.text(), "n");
}

#[test]
fn test_shift_extends_selection_and_cut_paste() {
    let p = pipeline(TargetPlatform::Linux);
    p.focus(1, "hello world", 11, 11);
    p.tap(KeyCode::Left, 113, Modifiers::CTRL | Modifiers::SHIFT);
    assert_eq!(p.selection(), (11, 6));

    p.tap(KeyCode::X, 53, Modifiers::CTRL);
    assert_eq!(p.clipboard.contents().as_deref(), Some("world"));
    assert_eq!(p.text(), "hello ");

    p.tap(KeyCode::Home, 110, Modifiers::empty());
    p.tap(KeyCode::V, 55, Modifiers::CTRL);
    assert_eq!(p.text(), "worldhello ");
    assert_eq!(p.selection(), (5, 5));
}

#[test]
fn test_macos_profile() {
    let p = pipeline(TargetPlatform::MacOs);
    p.focus(1, "one two", 7, 7);

    p.tap(KeyCode::Left, 123, Modifiers::ALT);
    assert_eq!(p.selection(), (4, 4));

    p.tap(KeyCode::A, 0, Modifiers::CTRL);
    assert_eq!(p.selection(), (4, 4), "Ctrl is not the primary modifier on macOS");

    p.tap(KeyCode::A, 0, Modifiers::SUPER);
    assert_eq!(p.selection(), (0, 7));

    let events = p.engine.key_events();
    assert_eq!(events.last().unwrap().meta_state, 1 << 16);
}

#[test]
fn test_injected_profile_wins() {
    let settings = TextInputSettings {
        platform: TargetPlatform::Linux,
        ..TextInputSettings::default()
    };
    let messenger = LocalMessenger::new();
    let engine = RecordingEngine::attach(&messenger, &settings);
    let service = TextInputService::new(Rc::new(messenger), MemoryClipboard::new(), &settings)
        .with_profile(PlatformKeyProfile::macos());

    engine.call(SET_CLIENT_METHOD, json!([1, {}])).unwrap();
    engine
        .call(SET_EDITING_STATE_METHOD, json!({"text": "ab cd", "selectionBase": 5, "selectionExtent": 5}))
        .unwrap();
    service.handle_key_event(&KeyEvent::pressed(KeyCode::Left, 0, Modifiers::ALT));
    assert_eq!(service.store().borrow().state().selection_extent(), 3);
}

struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn get_text(&self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable("no display".into()))
    }

    fn set_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no display".into()))
    }
}

#[test]
fn test_clipboard_failure_leaves_state_unchanged() {
    let settings = TextInputSettings {
        platform: TargetPlatform::Linux,
        ..TextInputSettings::default()
    };
    let messenger = LocalMessenger::new();
    let engine = RecordingEngine::attach(&messenger, &settings);
    let service = TextInputService::new(Rc::new(messenger), BrokenClipboard, &settings);

    engine.call(SET_CLIENT_METHOD, json!([1, {}])).unwrap();
    engine
        .call(SET_EDITING_STATE_METHOD, json!({"text": "hello", "selectionBase": 0, "selectionExtent": 5}))
        .unwrap();

    for key in [KeyCode::X, KeyCode::V, KeyCode::C] {
        service.handle_key_event(&KeyEvent::pressed(key, 0, Modifiers::CTRL));
    }
    let store = service.store();
    let store = store.borrow();
    assert_eq!(store.state().text(), "hello");
    assert_eq!(store.state().selection_range(), 0..5);
    assert!(engine.calls_to(UPDATE_EDITING_STATE_METHOD).is_empty());
}

#[test]
fn test_announcement_to_missing_engine_is_not_fatal() {
    let settings = TextInputSettings::default();
    let messenger = LocalMessenger::new();
    let service = TextInputService::new(Rc::new(messenger.clone()), MemoryClipboard::new(), &settings);
    let peer = messenger.peer();

    let payload = serde_json::to_vec(&json!({"method": SET_CLIENT_METHOD, "args": [2, {}]})).unwrap();
    peer.send(&settings.text_input_channel, &payload).unwrap();

    service.handle_char('z');
    service.handle_key_event(&KeyEvent::pressed(KeyCode::Escape, 9, Modifiers::empty()));
    assert_eq!(service.store().borrow().state().text(), "z");
    assert_eq!(messenger.pending_replies(), 0);
}

#[derive(Debug, Clone)]
enum Input {
    Char(char),
    Key(KeyCode, u8),
}

fn input_strategy() -> impl Strategy<Value = Input> {
    let keys = prop::sample::select(vec![
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Home,
        KeyCode::End,
        KeyCode::Backspace,
        KeyCode::Delete,
        KeyCode::Enter,
        KeyCode::A,
        KeyCode::X,
        KeyCode::V,
    ]);
    prop_oneof![
        prop::sample::select(vec!['a', 'z', ' ', '.', 'é']).prop_map(Input::Char),
        (keys, 0u8..16).prop_map(|(key, bits)| Input::Key(key, bits)),
    ]
}

proptest! {
    #[test]
    fn test_announced_state_matches_store(inputs in prop::collection::vec(input_strategy(), 1..30)) {
        let p = pipeline(TargetPlatform::Linux);
        p.focus(9, "seed text", 4, 4);
        p.clipboard.set_text("clip").unwrap();

        for input in inputs {
            match input {
                Input::Char(ch) => p.service.handle_char(ch),
                Input::Key(key, bits) => {
                    p.tap(key, 0, Modifiers::from_bits_truncate(bits));
                }
            }
            let (base, extent) = p.selection();
            let len = p.service.store().borrow().state().len();
            prop_assert!(base <= len && extent <= len);

            if let Some(announced) = p.announced() {
                prop_assert_eq!(&announced[1]["text"], &json!(p.text()));
                prop_assert_eq!(&announced[1]["selectionBase"], &json!(base));
                prop_assert_eq!(&announced[1]["selectionExtent"], &json!(extent));
            }
        }
    }
}
