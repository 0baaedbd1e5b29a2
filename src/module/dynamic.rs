//! Front-end module loaded from a shared library at runtime.

use super::ffi::{CreateFn, MarshalledConfig, SignalFn};
use super::{CREATE_SYMBOL, Module, ModuleHandle, SIGNAL_SYMBOL};
use crate::config::ConfigTable;
use crate::error::LoadError;
use libloading::Library;
use std::ffi::c_int;
use std::mem::ManuallyDrop;
use tracing::{debug, info};

/// The two resolved C entry points.
#[derive(Debug, Clone, Copy)]
pub struct EntryPoints {
    pub create: CreateFn,
    pub signal: SignalFn,
}

impl Module for EntryPoints {
    fn create(&self, config: &ConfigTable) -> ModuleHandle {
        let marshalled = MarshalledConfig::new(config);
        let raw = marshalled.raw();
        debug!(entries = marshalled.len(), "Calling module create entry point");
        // SAFETY: `raw` and the strings it points to outlive the call.
        let handle = unsafe { (self.create)(&raw) };
        ModuleHandle::from_raw(handle)
    }

    fn handle_signal(&self, handle: ModuleHandle, signal: c_int) {
        // SAFETY: the module promises `sysmenu_signal` is callable from a
        // signal handler with the handle it returned from `sysmenu_create`.
        unsafe { (self.signal)(handle.as_raw(), signal) }
    }
}

/// A module bound from `libsysmenu.so` (or another library name).
///
/// The library is never unmapped: the front-end instance may keep running
/// code from it until the process exits.
#[derive(Debug)]
pub struct DynamicModule {
    entry: EntryPoints,
    _library: ManuallyDrop<Library>,
}

impl DynamicModule {
    /// Open `name` through the platform library search path and resolve both
    /// entry points.
    pub fn load(name: &str) -> Result<Self, LoadError> {
        // SAFETY: running the library's initialisers is the point of loading
        // the front-end; nothing else is known about it.
        let library = unsafe { Library::new(name) }.map_err(|e| LoadError::open(name, e))?;

        // SAFETY: the symbol types match the C ABI documented in `ffi`.
        let create = unsafe { library.get::<CreateFn>(CREATE_SYMBOL.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|e| LoadError::symbol(CREATE_SYMBOL, e))?;
        let signal = unsafe { library.get::<SignalFn>(SIGNAL_SYMBOL.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|e| LoadError::symbol(SIGNAL_SYMBOL, e))?;

        info!(module = name, "Front-end module bound");
        Ok(Self {
            entry: EntryPoints { create, signal },
            _library: ManuallyDrop::new(library),
        })
    }
}

impl Module for DynamicModule {
    fn create(&self, config: &ConfigTable) -> ModuleHandle {
        self.entry.create(config)
    }

    fn handle_signal(&self, handle: ModuleHandle, signal: c_int) {
        self.entry.handle_signal(handle, signal)
    }
}
