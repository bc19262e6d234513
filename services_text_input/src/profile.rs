//! Platform key profile: which modifiers play which editing role.

use crate::action::ModifierClass;
use input_types::Modifiers;
use serde::{Deserialize, Serialize};

/// Operating system the host runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPlatform {
    #[serde(rename = "macos")]
    MacOs,
    #[serde(rename = "linux")]
    Linux,
    #[serde(rename = "windows")]
    Windows,
    #[serde(rename = "other")]
    Other,
}

impl TargetPlatform {
    /// Platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

/// Build target of this binary. Embedders that know the host platform
/// should set it explicitly instead.
impl Default for TargetPlatform {
    fn default() -> Self {
        Self::current()
    }
}

/// Modifier roles for one platform. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformKeyProfile {
    primary: Modifiers,
    word_travel: Modifiers,
    word_travel_extend: Modifiers,
}

impl PlatformKeyProfile {
    pub const fn new(primary: Modifiers, word_travel: Modifiers, word_travel_extend: Modifiers) -> Self {
        Self {
            primary,
            word_travel,
            word_travel_extend,
        }
    }

    /// Command for shortcuts, Option for word travel.
    pub const fn macos() -> Self {
        Self::new(
            Modifiers::SUPER,
            Modifiers::ALT,
            Modifiers::ALT.union(Modifiers::SHIFT),
        )
    }

    /// Control for both shortcuts and word travel.
    pub const fn control_based() -> Self {
        Self::new(
            Modifiers::CTRL,
            Modifiers::CTRL,
            Modifiers::CTRL.union(Modifiers::SHIFT),
        )
    }

    pub fn for_platform(platform: TargetPlatform) -> Self {
        match platform {
            TargetPlatform::MacOs => Self::macos(),
            TargetPlatform::Linux | TargetPlatform::Windows | TargetPlatform::Other => {
                Self::control_based()
            }
        }
    }

    pub fn primary(&self) -> Modifiers {
        self.primary
    }

    pub fn word_travel(&self) -> Modifiers {
        self.word_travel
    }

    pub fn word_travel_extend(&self) -> Modifiers {
        self.word_travel_extend
    }

    /// Classifies a held modifier set by exact match.
    ///
    /// Precedence is word-travel-extend, word-travel, primary, shift; anything
    /// else is [`ModifierClass::None`].
    pub fn classify(&self, modifiers: Modifiers) -> ModifierClass {
        self.matching_classes(modifiers)
            .first()
            .copied()
            .unwrap_or(ModifierClass::None)
    }

    /// Every role `modifiers` satisfies, in precedence order.
    ///
    /// Roles may share a modifier (Ctrl is both primary and word travel
    /// outside macOS), so one set can match more than one class.
    pub fn matching_classes(&self, modifiers: Modifiers) -> Vec<ModifierClass> {
        let mut classes = Vec::with_capacity(2);
        if modifiers == self.word_travel_extend {
            classes.push(ModifierClass::WordTravelExtend);
        }
        if modifiers == self.word_travel {
            classes.push(ModifierClass::WordTravel);
        }
        if modifiers == self.primary {
            classes.push(ModifierClass::Primary);
        }
        if modifiers == Modifiers::SHIFT {
            classes.push(ModifierClass::Shift);
        }
        if classes.is_empty() {
            classes.push(ModifierClass::None);
        }
        classes
    }
}

impl Default for PlatformKeyProfile {
    fn default() -> Self {
        Self::for_platform(TargetPlatform::current())
    }
}
