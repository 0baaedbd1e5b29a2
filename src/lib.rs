//! sysmenu launcher library
//!
//! Resolves the layered configuration, binds the front-end module and relays
//! signals to it. The binary in `main.rs` is a thin wrapper around
//! [`orchestrator::Launcher`].

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod module;
pub mod orchestrator;
pub mod signals;
