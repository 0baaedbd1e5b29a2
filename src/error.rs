//! Error types for binding and driving the front-end module.

use thiserror::Error;

/// The front-end module could not be bound.
///
/// Always fatal: there is no fallback implementation.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The shared library could not be located or opened.
    #[error("Cannot open library: {reason}")]
    Open { name: String, reason: String },

    /// A required entry point is missing from the library.
    #[error("Cannot load symbols: {symbol}: {reason}")]
    Symbol { symbol: &'static str, reason: String },
}

impl LoadError {
    pub fn open(name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Open {
            name: name.into(),
            reason: err.to_string(),
        }
    }

    pub fn symbol(symbol: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Symbol {
            symbol,
            reason: err.to_string(),
        }
    }
}

/// Signal forwarding could not be set up.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("Failed to install handler for signal {signal}: {source}")]
    Install {
        signal: i32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to listen for termination signals: {0}")]
    Listen(#[source] std::io::Error),
}
