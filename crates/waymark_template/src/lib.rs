//! Template language compiler for Waymark menus.
//!
//! A menu graph can be described as a marker-based text template instead
//! of hand-written node producers:
//!
//! ```text
//! ## NODE start
//!
//! This is the text of the start node.
//!
//! ## OPTIONS
//!
//!     # comments are allowed here
//!     1: Option number 1 -> node1
//!     next; n: This steps next -> go_next()
//!     back: go_back(from_node=start)
//!     > foo*: handle_foo()
//!     > [0-9]+: handle_numbers()
//!     >: start
//!
//! ## NODE node1
//!
//! A node without an OPTIONS section ends the menu.
//! ```
//!
//! [`compile_template`] turns such a template (plus a mapping of callable
//! names) into the same [`NodeRegistry`](waymark_engine::NodeRegistry)
//! shape hand-written producers use.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod literal;
pub mod parser;
pub mod scan;

pub use literal::{parse_kwargs, parse_literal};
pub use parser::{CallableMap, TemplateCallable, callable_fn, compile_template};
pub use scan::{NodeBlock, OptionLine, scan};
