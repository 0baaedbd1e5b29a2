//! The front-end module boundary.
//!
//! The launcher only ever talks to the front-end through [`Module`]: one call
//! to create the instance with the resolved configuration, and any number of
//! signal relays afterwards. The production implementation is a shared
//! library resolved at startup ([`DynamicModule`]).

pub mod dynamic;
pub mod ffi;

use crate::config::ConfigTable;
use crate::error::LoadError;
use std::ffi::{c_int, c_void};
use std::sync::Arc;

pub use dynamic::{DynamicModule, EntryPoints};

/// Well-known name of the front-end library.
pub const MODULE_NAME: &str = "libsysmenu.so";

/// Creation entry point.
pub const CREATE_SYMBOL: &str = "sysmenu_create";

/// Signal-relay entry point.
pub const SIGNAL_SYMBOL: &str = "sysmenu_signal";

/// Opaque token for the live front-end instance.
///
/// Never dereferenced by the launcher; the module owns whatever it points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHandle(*mut c_void);

// SAFETY: the launcher never dereferences the pointer; it is only handed back
// to the module that produced it.
unsafe impl Send for ModuleHandle {}
unsafe impl Sync for ModuleHandle {}

impl ModuleHandle {
    pub fn from_raw(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    pub fn as_raw(self) -> *mut c_void {
        self.0
    }
}

/// Capability interface of a front-end implementation.
pub trait Module: Send + Sync {
    /// Create the single front-end instance. Called exactly once.
    fn create(&self, config: &ConfigTable) -> ModuleHandle;

    /// Relay an OS signal to the instance.
    ///
    /// Runs inside a signal handler: implementations must not allocate,
    /// block or take locks.
    fn handle_signal(&self, handle: ModuleHandle, signal: c_int);
}

/// Where modules come from.
pub trait ModuleSource {
    fn bind(&self, name: &str) -> Result<Arc<dyn Module>, LoadError>;
}

/// Binds modules from shared libraries on the library search path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleBridge;

impl ModuleBridge {
    pub fn load(name: &str) -> Result<DynamicModule, LoadError> {
        DynamicModule::load(name)
    }
}

impl ModuleSource for ModuleBridge {
    fn bind(&self, name: &str) -> Result<Arc<dyn Module>, LoadError> {
        Ok(Arc::new(Self::load(name)?))
    }
}
