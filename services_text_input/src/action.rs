//! Key and modifier class to editing action table.

use crate::profile::PlatformKeyProfile;
use crate::shortcuts::KeyboardShortcuts;
use editing_core::{Direction, Granularity};
use input_types::{KeyCode, Modifiers};

/// Role of a held modifier set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierClass {
    None,
    Shift,
    Primary,
    WordTravel,
    WordTravelExtend,
}

/// Key as the editing table sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Enter,
    Home,
    End,
    Left,
    Right,
    Delete,
    Backspace,
    SelectAll,
    Copy,
    Cut,
    Paste,
}

impl LogicalKey {
    /// Resolves a key code; shortcut keys are looked up in `shortcuts`.
    pub fn from_key(key: KeyCode, shortcuts: &KeyboardShortcuts) -> Option<Self> {
        match key {
            KeyCode::Enter => Some(Self::Enter),
            KeyCode::Home => Some(Self::Home),
            KeyCode::End => Some(Self::End),
            KeyCode::Left => Some(Self::Left),
            KeyCode::Right => Some(Self::Right),
            KeyCode::Delete => Some(Self::Delete),
            KeyCode::Backspace => Some(Self::Backspace),
            key if key == shortcuts.select_all => Some(Self::SelectAll),
            key if key == shortcuts.copy => Some(Self::Copy),
            key if key == shortcuts.cut => Some(Self::Cut),
            key if key == shortcuts.paste => Some(Self::Paste),
            _ => None,
        }
    }
}

/// Input action announced to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextInputAction {
    Newline,
    Done,
}

impl TextInputAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newline => "TextInputAction.newline",
            Self::Done => "TextInputAction.done",
        }
    }
}

/// What a key press does to the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Insert `'\n'` and announce a newline action
    InsertNewline,
    /// Announce `action` without touching the text
    Perform(TextInputAction),
    Move {
        direction: Direction,
        granularity: Granularity,
        extend: bool,
    },
    Delete {
        direction: Direction,
        granularity: Granularity,
    },
    SelectAll,
    Copy,
    Cut,
    Paste,
}

fn travel(key: LogicalKey) -> Direction {
    match key {
        LogicalKey::Home | LogicalKey::Left | LogicalKey::Backspace => Direction::Backward,
        _ => Direction::Forward,
    }
}

/// Looks up the action bound to `key` under `class`.
pub fn action_for(key: LogicalKey, class: ModifierClass) -> Option<EditAction> {
    use LogicalKey as K;
    use ModifierClass as M;

    let action = match (key, class) {
        (K::Enter, M::None) => EditAction::InsertNewline,
        (K::Enter, M::Primary) => EditAction::Perform(TextInputAction::Done),

        (K::Home | K::End, M::None | M::Shift) => EditAction::Move {
            direction: travel(key),
            granularity: Granularity::Line,
            extend: class == M::Shift,
        },

        (K::Left | K::Right, M::None | M::Shift) => EditAction::Move {
            direction: travel(key),
            granularity: Granularity::Character,
            extend: class == M::Shift,
        },
        (K::Left | K::Right, M::WordTravel | M::WordTravelExtend) => EditAction::Move {
            direction: travel(key),
            granularity: Granularity::Word,
            extend: class == M::WordTravelExtend,
        },

        (K::Delete | K::Backspace, M::None) => EditAction::Delete {
            direction: travel(key),
            granularity: Granularity::Character,
        },
        (K::Delete | K::Backspace, M::WordTravel) => EditAction::Delete {
            direction: travel(key),
            granularity: Granularity::Word,
        },

        (K::SelectAll, M::Primary) => EditAction::SelectAll,
        (K::Copy, M::Primary) => EditAction::Copy,
        (K::Cut, M::Primary) => EditAction::Cut,
        (K::Paste, M::Primary) => EditAction::Paste,

        _ => return None,
    };
    Some(action)
}

/// Resolves a key press against the profile and shortcut bindings.
///
/// Classes are tried in precedence order and the first bound action wins.
pub fn resolve_action(
    profile: &PlatformKeyProfile,
    shortcuts: &KeyboardShortcuts,
    key: KeyCode,
    modifiers: Modifiers,
) -> Option<EditAction> {
    let key = LogicalKey::from_key(key, shortcuts)?;
    profile
        .matching_classes(modifiers)
        .into_iter()
        .find_map(|class| action_for(key, class))
}
