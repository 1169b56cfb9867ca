//! Waymark - Interactive text-menu state machine for multi-user text
//! servers.
//!
//! This crate re-exports all layers of the Waymark system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: waymark_runtime    — Session table, snapshots, demo REPL
//! Layer 2: waymark_template   — Template compiler for menu graphs
//! Layer 1: waymark_engine     — Nodes, matching, goto, state machine
//! Layer 0: waymark_foundation — Core types (Value, Context, Error)
//! ```

pub use waymark_engine as engine;
pub use waymark_foundation as foundation;
pub use waymark_runtime as runtime;
pub use waymark_template as template;
