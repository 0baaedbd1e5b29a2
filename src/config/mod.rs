//! Layered configuration.
//!
//! Consolidates configuration from up to three files with key-by-key merging:
//! 1. **System** - `/usr/share/sys64/menu/config.conf`, or
//!    `/usr/local/share/sys64/menu/config.conf` if the former is absent
//! 2. **User** - `~/.config/sys64/menu/config.conf`
//! 3. **Command line** - applied afterwards by [`crate::cli`]
//!
//! ## Environment Variables
//! - `SYSMENU_USER_CONFIG` - Explicit per-user config file

mod loader;
mod merge;
mod parser;
mod types;

pub use loader::{
    ConfigLoader, ConfigPaths, ConfigTier, ConfigWarning, LoadedSource, Resolution,
    SYSTEM_CONFIG, SYSTEM_FALLBACK_CONFIG, USER_CONFIG, USER_CONFIG_ENV, read_source,
};
pub use merge::{merge, merge_all};
pub use parser::{IniParser, TableParser};
pub use types::*;
