//! Core types for the Waymark menu system.
//!
//! This crate provides:
//! - [`Value`] - The closed literal type for context payloads
//! - [`Context`] - The persistent key/value map threaded between menu nodes
//! - [`MenuConfig`] - Per-session configuration surface
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod context;
pub mod error;
pub mod value;

pub use config::{MenuConfig, MergeMode};
pub use context::Context;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use value::Value;
