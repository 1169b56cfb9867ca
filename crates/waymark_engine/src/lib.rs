//! Menu nodes, option matching, goto resolution, and the session state
//! machine for Waymark.
//!
//! This crate provides:
//! - [`NodeRegistry`] - Named registry of node producers
//! - [`CompiledOptions`] - Per-node option lookup table
//! - [`resolve_goto`] - Transition-target resolution
//! - [`MenuSession`] - The per-subject state machine
//! - [`MenuFormatter`] - Render hooks for the transport layer
//! - [`paged_node`] - Paginated selection wrapper

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod format;
pub mod goto;
pub mod matcher;
pub mod menu;
pub mod node;
pub mod paged;
pub mod registry;

pub use format::{DefaultFormatter, MenuFormatter, dedent};
pub use goto::{Goto, GotoFn, GotoResult, Transition, goto_fn, resolve_goto};
pub use matcher::{CompiledEntry, CompiledOptions, PatternSpec};
pub use menu::{InputOutcome, MenuSession, MenuState};
pub use node::{
    BufferSubject, NodeOutput, NodeProducer, NodeText, OptionKey, OptionRecord, Subject,
    SubjectId, node_fn,
};
pub use paged::{ItemSource, SelectionResolver, paged_node};
pub use registry::NodeRegistry;
