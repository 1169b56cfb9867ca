//! Session management, restart snapshots, and the demo REPL for Waymark.
//!
//! This crate provides:
//! - [`MenuManager`] - The per-subject session table with serialized
//!   input delivery
//! - [`MenuSource`] - The registry/template/producer start surface
//! - [`MenuSnapshot`] - Restart snapshots for persistent sessions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod manager;
pub mod repl;
pub mod snapshot;

pub use manager::{ExitHandler, MenuManager, MenuSource};
pub use snapshot::MenuSnapshot;
