//! OS signal plumbing.
//!
//! Two concerns live here: forwarding the user signals to the front-end
//! module ([`SignalBridge`]), and waiting for a termination request while the
//! front-end runs ([`TerminationListener`]).

use crate::error::SignalError;
use crate::module::{Module, ModuleHandle};
use signal_hook::SigId;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::ffi::c_int;
use std::sync::Arc;
use tracing::{debug, info};

/// Signals forwarded to the module: SIGUSR1, SIGUSR2 and SIGRTMIN.
pub fn forwarded_signals() -> [c_int; 3] {
    [libc::SIGUSR1, libc::SIGUSR2, libc::SIGRTMIN()]
}

/// Signals that end the launcher.
pub const TERMINATION_SIGNALS: [c_int; 3] = [SIGTERM, SIGINT, SIGHUP];

/// Relays signals to the module for as long as it is alive.
///
/// Holds a shared reference to the module and a copy of the instance handle.
/// Dropping the bridge unregisters every handler it installed.
pub struct SignalBridge {
    ids: Vec<(c_int, SigId)>,
}

impl SignalBridge {
    /// Forward [`forwarded_signals`] to `module`.
    pub fn install(module: Arc<dyn Module>, handle: ModuleHandle) -> Result<Self, SignalError> {
        Self::install_for(&forwarded_signals(), module, handle)
    }

    /// Forward an explicit set of signals to `module`.
    pub fn install_for(
        signals: &[c_int],
        module: Arc<dyn Module>,
        handle: ModuleHandle,
    ) -> Result<Self, SignalError> {
        let mut bridge = Self {
            ids: Vec::with_capacity(signals.len()),
        };

        for &signal in signals {
            let module = Arc::clone(&module);
            // SAFETY: the action only performs the relay call, which the
            // `Module` contract requires to be async-signal-safe.
            let id = unsafe {
                signal_hook::low_level::register(signal, move || module.handle_signal(handle, signal))
            }
            .map_err(|source| SignalError::Install { signal, source })?;
            debug!(signal, "Forwarding signal to module");
            bridge.ids.push((signal, id));
        }

        Ok(bridge)
    }

    /// Signals currently forwarded.
    pub fn signals(&self) -> Vec<c_int> {
        self.ids.iter().map(|(signal, _)| *signal).collect()
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        for (signal, id) in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
            debug!(signal, "Stopped forwarding signal");
        }
    }
}

impl std::fmt::Debug for SignalBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBridge")
            .field("signals", &self.signals())
            .finish()
    }
}

/// Blocks until SIGTERM, SIGINT or SIGHUP arrives.
pub struct TerminationListener {
    signals: Signals,
}

impl TerminationListener {
    /// Start listening. Termination signals no longer kill the process
    /// outright once this returns.
    pub fn new() -> Result<Self, SignalError> {
        let signals = Signals::new(TERMINATION_SIGNALS).map_err(SignalError::Listen)?;
        Ok(Self { signals })
    }

    /// Wait for the next termination signal and return it.
    pub fn wait(&mut self) -> Option<c_int> {
        let signal = self.signals.forever().next();
        if let Some(signal) = signal {
            info!(signal, "Termination requested");
        }
        signal
    }
}
