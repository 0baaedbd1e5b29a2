//! Flag tables for the two command-line dialects.
//!
//! The legacy dialect keeps the historical letter assignments. The extended
//! dialect (cargo feature `scripting`) adds dmenu-compatible flags, which
//! reassigns four letters:
//!
//! | letter | legacy              | extended               |
//! |--------|---------------------|------------------------|
//! | `-m`   | app margin          | monitor                |
//! | `-M`   | monitor             | app margin             |
//! | `-p`   | items per row       | prompt text            |
//! | `-l`   | disable layer shell | dmenu line count (arg) |
//!
//! `-P`, `-L`, `-d` and `-w` only exist in the extended dialect.
//!
//! Legacy `-l` is a bare switch here. Historically it was declared with an
//! argument and swallowed the token after it.

use crate::config::keys;

/// Anchor spec forced by `-D`.
pub const DOCK_ANCHORS: &str = "top right bottom left";

/// dmenu flags that are accepted but cannot be honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmenuOnly {
    /// `-l <lines>`: vertical list with N lines.
    Lines,
    /// `-w <windowid>`: embed into another window.
    WindowId,
}

/// What a flag does when it is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagEffect {
    /// Write a fixed value; takes no argument.
    Set {
        key: &'static str,
        value: &'static str,
    },
    /// Copy the flag's argument verbatim.
    Value { key: &'static str },
    /// `-D`: dock items, plus layer shell on and all four anchors.
    DockItems,
    /// Takes an argument that is discarded; only its presence is recorded.
    Unsupported(DmenuOnly),
    Version,
    Help,
}

impl FlagEffect {
    /// Whether the flag consumes an argument.
    pub fn takes_value(&self) -> bool {
        matches!(
            self,
            FlagEffect::Value { .. } | FlagEffect::DockItems | FlagEffect::Unsupported(_)
        )
    }
}

/// One entry of a dialect table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub letter: char,
    /// Unique within a dialect; used as the clap argument id.
    pub id: &'static str,
    pub effect: FlagEffect,
    pub help: &'static str,
}

const fn set(letter: char, id: &'static str, key: &'static str, value: &'static str, help: &'static str) -> FlagSpec {
    FlagSpec {
        letter,
        id,
        effect: FlagEffect::Set { key, value },
        help,
    }
}

const fn value(letter: char, key: &'static str, help: &'static str) -> FlagSpec {
    FlagSpec {
        letter,
        id: key,
        effect: FlagEffect::Value { key },
        help,
    }
}

const fn special(letter: char, id: &'static str, effect: FlagEffect, help: &'static str) -> FlagSpec {
    FlagSpec {
        letter,
        id,
        effect,
        help,
    }
}

const LEGACY_FLAGS: &[FlagSpec] = &[
    set('S', "hide-on-launch", keys::START_HIDDEN, "true", "Hide the program on launch"),
    set('s', "hide-searchbar", keys::SEARCHBAR, "false", "Hide the search bar"),
    value('i', keys::ICON_SIZE, "Set launcher icon size"),
    value('I', keys::DOCK_ICON_SIZE, "Set dock icon size"),
    set('u', "name-under-icon", keys::NAME_UNDER_ICON, "true", "Show name under icon"),
    set('b', "scroll-bars", keys::SCROLL_BARS, "true", "Show scroll bars"),
    value('n', keys::NAME_LENGTH, "Max name length"),
    value('a', keys::ANCHORS, "Set anchors"),
    value('W', keys::WIDTH, "Set window width"),
    value('H', keys::HEIGHT, "Set window height"),
    value('m', keys::APP_MARGIN, "Set launcher margins"),
    value('M', keys::MONITOR, "Set primary monitor"),
    value('p', keys::ITEMS_PER_ROW, "Items per row"),
    set('l', "no-layer-shell", keys::LAYER_SHELL, "false", "Disable use of layer shell"),
    special('D', keys::DOCK_ITEMS, FlagEffect::DockItems, "Set dock items"),
    special('v', "version", FlagEffect::Version, "Prints version info"),
    special('h', "help", FlagEffect::Help, "Show this help message"),
];

const EXTENDED_FLAGS: &[FlagSpec] = &[
    set('S', "hide-on-launch", keys::START_HIDDEN, "true", "Hide the program on launch"),
    set('s', "hide-searchbar", keys::SEARCHBAR, "false", "Hide the search bar"),
    value('i', keys::ICON_SIZE, "Set launcher icon size"),
    value('I', keys::DOCK_ICON_SIZE, "Set dock icon size"),
    set('u', "name-under-icon", keys::NAME_UNDER_ICON, "true", "Show name under icon"),
    set('b', "scroll-bars", keys::SCROLL_BARS, "true", "Show scroll bars"),
    value('n', keys::NAME_LENGTH, "Max name length"),
    value('a', keys::ANCHORS, "Set anchors"),
    value('W', keys::WIDTH, "Set window width"),
    value('H', keys::HEIGHT, "Set window height"),
    value('M', keys::APP_MARGIN, "Set launcher margins"),
    value('m', keys::MONITOR, "Set primary monitor"),
    value('p', keys::PROMPT, "Set placeholder text"),
    value('P', keys::ITEMS_PER_ROW, "Items per row"),
    set('L', "no-layer-shell", keys::LAYER_SHELL, "false", "Disable use of layer shell"),
    set('d', keys::DMENU, keys::DMENU, "true", "dmenu emulation"),
    special('l', "dmenu-lines", FlagEffect::Unsupported(DmenuOnly::Lines), "dmenu line count (ignored)"),
    special('w', "dmenu-window", FlagEffect::Unsupported(DmenuOnly::WindowId), "dmenu window id (ignored)"),
    special('D', keys::DOCK_ITEMS, FlagEffect::DockItems, "Set dock items"),
    special('v', "version", FlagEffect::Version, "Prints version info"),
    special('h', "help", FlagEffect::Help, "Show this help message"),
];

/// Which flag table is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectKind {
    Legacy,
    Extended,
}

/// An immutable flag-letter-to-effect table.
#[derive(Debug)]
pub struct Dialect {
    pub kind: DialectKind,
    flags: &'static [FlagSpec],
}

/// Backwards-compatible flag layout.
pub static LEGACY: Dialect = Dialect {
    kind: DialectKind::Legacy,
    flags: LEGACY_FLAGS,
};

/// dmenu-compatible flag layout.
pub static EXTENDED: Dialect = Dialect {
    kind: DialectKind::Extended,
    flags: EXTENDED_FLAGS,
};

impl Dialect {
    /// The dialect selected at build time.
    pub fn active() -> &'static Dialect {
        if cfg!(feature = "scripting") {
            &EXTENDED
        } else {
            &LEGACY
        }
    }

    pub fn flags(&self) -> &'static [FlagSpec] {
        self.flags
    }

    pub fn lookup(&self, letter: char) -> Option<&'static FlagSpec> {
        self.flags.iter().find(|spec| spec.letter == letter)
    }

    /// Whether this dialect knows about dmenu mode at all.
    pub fn supports_dmenu(&self) -> bool {
        self.kind == DialectKind::Extended
    }
}
