//! Layer merging for configuration tables.
//!
//! Implements key-by-key merging where later layers override earlier ones.
//! Sections are never replaced wholesale; only the keys an overlay defines
//! are touched.

use super::types::ConfigTable;

/// Merge `overlay` into `base`, with `overlay` taking precedence.
///
/// Every `(section, key, value)` triple of the overlay is written into the
/// base, overwriting whatever was there. Keys only present in the base are
/// preserved. No conflict is ever reported.
///
/// # Example
/// ```
/// use sysmenu::config::{ConfigTable, merge};
///
/// let mut system = ConfigTable::new();
/// system.set("main", "icon-size", "32");
/// system.set("main", "width", "400");
///
/// let mut user = ConfigTable::new();
/// user.set("main", "icon-size", "48");
///
/// let merged = merge(system, &user);
/// assert_eq!(merged.get("main", "icon-size"), Some("48"));
/// assert_eq!(merged.get("main", "width"), Some("400"));
/// ```
pub fn merge(mut base: ConfigTable, overlay: &ConfigTable) -> ConfigTable {
    for (section, key, value) in overlay.entries() {
        base.set(section, key, value);
    }
    base
}

/// Merge multiple tables in order, with later tables taking precedence.
///
/// Equivalent to folding `merge` over the list, starting from an empty table.
pub fn merge_all<'a>(tables: impl IntoIterator<Item = &'a ConfigTable>) -> ConfigTable {
    tables.into_iter().fold(ConfigTable::new(), merge)
}
