//! Goto resolution: turning a matched option's transition target into the
//! next node and context.

use std::fmt;
use std::sync::Arc;

use waymark_foundation::{Context, Error, MergeMode, Result};

use crate::node::Subject;

/// What a goto-callable reports back.
#[derive(Clone, Debug)]
pub enum GotoResult {
    /// Advance to the named node, threading the invoked context along.
    Node(String),
    /// Advance to the named node with a new context-map.
    NodeWith(String, Context),
    /// Re-run the current node with the invoked context.
    Stay,
    /// Re-run the current node with a new context-map.
    StayWith(Context),
}

/// Logic invoked during a transition to compute the next node.
///
/// Receives the subject, the raw input that triggered the match, and the
/// context in effect for the call.
pub type GotoFn =
    Arc<dyn Fn(&mut dyn Subject, &str, &Context) -> Result<GotoResult> + Send + Sync>;

/// Wraps a closure as a [`GotoFn`].
pub fn goto_fn<F>(f: F) -> GotoFn
where
    F: Fn(&mut dyn Subject, &str, &Context) -> Result<GotoResult> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An option's transition target.
#[derive(Clone)]
pub enum Goto {
    /// Go straight to the named node; the inbound context passes through
    /// unchanged.
    Node(String),
    /// Invoke a callable with the inbound context.
    Call(GotoFn),
    /// Invoke a callable with an explicit context that replaces the
    /// inbound one for this call only.
    CallWith(GotoFn, Context),
}

impl fmt::Debug for Goto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(name) => f.debug_tuple("Node").field(name).finish(),
            Self::Call(_) => f.write_str("Call(..)"),
            Self::CallWith(_, kwargs) => f.debug_tuple("CallWith").field(kwargs).finish(),
        }
    }
}

/// A resolved transition.
#[derive(Clone, Debug)]
pub struct Transition {
    /// The node to enter next; `None` re-runs the current node.
    pub target: Option<String>,
    /// The context to enter it with.
    pub context: Context,
}

/// Checks a node name produced at runtime by a goto-callable.
///
/// Empty and underscore-reserved names are the malformed shapes the type
/// system cannot rule out.
fn validate_target(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::invalid_goto("empty node name"));
    }
    if name.starts_with('_') {
        return Err(Error::invalid_goto(format!(
            "node name '{name}' is reserved"
        )));
    }
    Ok(())
}

/// Resolves a goto directive into a [`Transition`].
///
/// The callable forms are invoked here; `merge_mode` governs how a
/// context-map carried in the result combines with the context the
/// callable was invoked with.
///
/// # Errors
/// Returns [`ErrorKind::InvalidGotoResult`](waymark_foundation::ErrorKind::InvalidGotoResult)
/// for unusable runtime targets; errors raised inside the callable
/// propagate unchanged.
pub fn resolve_goto(
    subject: &mut dyn Subject,
    goto: &Goto,
    raw_input: &str,
    inbound: &Context,
    merge_mode: MergeMode,
) -> Result<Transition> {
    let (result, invoked) = match goto {
        Goto::Node(name) => {
            return Ok(Transition {
                target: Some(name.clone()),
                context: inbound.clone(),
            });
        }
        Goto::Call(func) => (func(subject, raw_input, inbound)?, inbound.clone()),
        Goto::CallWith(func, kwargs) => (func(subject, raw_input, kwargs)?, kwargs.clone()),
    };

    match result {
        GotoResult::Node(name) => {
            validate_target(&name)?;
            Ok(Transition {
                target: Some(name),
                context: invoked,
            })
        }
        GotoResult::NodeWith(name, context) => {
            validate_target(&name)?;
            Ok(Transition {
                target: Some(name),
                context: invoked.merged(&context, merge_mode),
            })
        }
        GotoResult::Stay => Ok(Transition {
            target: None,
            context: invoked,
        }),
        GotoResult::StayWith(context) => Ok(Transition {
            target: None,
            context: invoked.merged(&context, merge_mode),
        }),
    }
}
