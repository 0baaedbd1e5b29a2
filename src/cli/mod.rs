//! Command-line handling for sysmenu.
//!
//! Every option is a single letter. Which letters exist, and what they mean,
//! depends on the dialect chosen at build time; see [`dialect`].

pub mod dialect;
pub mod mapper;
pub mod usage;

pub use dialect::{DOCK_ANCHORS, Dialect, DialectKind, DmenuOnly, EXTENDED, FlagEffect, FlagSpec, LEGACY};
pub use mapper::{ArgOutcome, ArgumentMapper, IncompatibleFlags, Override, Overrides};
pub use usage::{usage, version};
