//! Configuration table types.
//!
//! The launcher never interprets values: every value is an opaque string
//! handed through to the front-end module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Section that every command-line override writes into.
pub const MAIN_SECTION: &str = "main";

/// Well-known keys of the `main` section.
pub mod keys {
    pub const START_HIDDEN: &str = "start-hidden";
    pub const SEARCHBAR: &str = "searchbar";
    pub const ICON_SIZE: &str = "icon-size";
    pub const DOCK_ICON_SIZE: &str = "dock-icon-size";
    pub const NAME_UNDER_ICON: &str = "name-under-icon";
    pub const SCROLL_BARS: &str = "scroll-bars";
    pub const NAME_LENGTH: &str = "name-length";
    pub const ANCHORS: &str = "anchors";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const APP_MARGIN: &str = "app-margin";
    pub const MONITOR: &str = "monitor";
    pub const ITEMS_PER_ROW: &str = "items-per-row";
    pub const PROMPT: &str = "prompt";
    pub const LAYER_SHELL: &str = "layer-shell";
    pub const DOCK_ITEMS: &str = "dock-items";
    pub const DMENU: &str = "dmenu";
}

/// A section of key/value pairs.
pub type Section = BTreeMap<String, String>;

/// Two-level `section -> key -> value` table.
///
/// Lookups are exact and case-sensitive. Ordering carries no meaning; a
/// `BTreeMap` is used so dumps and comparisons are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTable {
    sections: BTreeMap<String, Section>,
}

impl ConfigTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    /// Look up a value in the `main` section.
    pub fn main(&self, key: &str) -> Option<&str> {
        self.get(MAIN_SECTION, key)
    }

    /// Whether `main.<key>` is exactly the string `"true"`.
    pub fn main_is_true(&self, key: &str) -> bool {
        self.main(key) == Some("true")
    }

    /// Write a value, replacing any previous value for `(section, key)`.
    pub fn set(&mut self, section: impl Into<String>, key: impl Into<String>, value: impl Into<String>) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Write a value into the `main` section.
    pub fn set_main(&mut self, key: &str, value: impl Into<String>) {
        self.set(MAIN_SECTION, key, value);
    }

    /// Get a whole section.
    pub fn section(&self, section: &str) -> Option<&Section> {
        self.sections.get(section)
    }

    /// Iterate over every `(section, key, value)` triple.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.sections.iter().flat_map(|(section, keys)| {
            keys.iter()
                .map(move |(key, value)| (section.as_str(), key.as_str(), value.as_str()))
        })
    }

    /// Total number of keys across all sections.
    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    /// True when the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
