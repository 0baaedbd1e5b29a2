//! C ABI shared with the front-end library.
//!
//! ```c
//! struct sysmenu_entry  { const char *section, *key, *value; };
//! struct sysmenu_config { const struct sysmenu_entry *entries; size_t len; };
//!
//! void *sysmenu_create(const struct sysmenu_config *config);
//! void  sysmenu_signal(void *handle, int signum);
//! ```
//!
//! The strings passed to `sysmenu_create` are only valid for the duration of
//! the call.

use crate::config::ConfigTable;
use std::ffi::{CString, c_char, c_int, c_void};
use tracing::warn;

/// One `(section, key, value)` triple.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawEntry {
    pub section: *const c_char,
    pub key: *const c_char,
    pub value: *const c_char,
}

/// A borrowed view of a whole configuration table.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawConfig {
    pub entries: *const RawEntry,
    pub len: usize,
}

pub type CreateFn = unsafe extern "C" fn(config: *const RawConfig) -> *mut c_void;
pub type SignalFn = unsafe extern "C" fn(handle: *mut c_void, signum: c_int);

/// Owns the C strings behind a [`RawConfig`].
#[derive(Debug)]
pub struct MarshalledConfig {
    _strings: Vec<CString>,
    entries: Vec<RawEntry>,
}

impl MarshalledConfig {
    /// Copy `table` into NUL-terminated strings.
    ///
    /// Entries with an interior NUL cannot cross the boundary and are skipped.
    pub fn new(table: &ConfigTable) -> Self {
        let mut strings = Vec::with_capacity(table.len() * 3);
        let mut entries = Vec::with_capacity(table.len());

        for (section, key, value) in table.entries() {
            let (Ok(s), Ok(k), Ok(v)) = (CString::new(section), CString::new(key), CString::new(value)) else {
                warn!(section, key, "Skipping config entry containing a NUL byte");
                continue;
            };
            // The heap buffers do not move when the CStrings are moved below.
            entries.push(RawEntry {
                section: s.as_ptr(),
                key: k.as_ptr(),
                value: v.as_ptr(),
            });
            strings.extend([s, k, v]);
        }

        Self {
            _strings: strings,
            entries,
        }
    }

    pub fn raw(&self) -> RawConfig {
        RawConfig {
            entries: self.entries.as_ptr(),
            len: self.entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
