//! Menu node data model.
//!
//! A node is a named state in the menu graph. Evaluating it with
//! `(subject, raw_input, context)` yields a [`NodeOutput`]: the display
//! text plus the option records the next input resolves against.

use std::fmt;
use std::sync::Arc;

use waymark_foundation::{Context, Result};

use crate::goto::Goto;
use crate::matcher::PatternSpec;

/// Identity of a menu user, assigned by the transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectId(pub u64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject#{}", self.0)
    }
}

/// The per-user collaborator the engine renders through.
///
/// The engine never owns the transport; node producers and goto-callables
/// talk to the user exclusively through this seam.
pub trait Subject {
    /// Stable identity for the session table.
    fn id(&self) -> SubjectId;

    /// Delivers a block of text to the user.
    fn send(&mut self, text: &str);
}

/// A [`Subject`] that collects sent text into a buffer.
///
/// Useful for headless evaluation and tests.
#[derive(Debug, Default)]
pub struct BufferSubject {
    /// Identity reported by [`Subject::id`].
    pub subject_id: u64,
    /// Everything sent so far, in order.
    pub sent: Vec<String>,
}

impl BufferSubject {
    /// Creates a buffer subject with the given id.
    #[must_use]
    pub fn new(subject_id: u64) -> Self {
        Self {
            subject_id,
            sent: Vec::new(),
        }
    }

    /// Returns the last sent text, if any.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.sent.last().map(String::as_str)
    }
}

impl Subject for BufferSubject {
    fn id(&self) -> SubjectId {
        SubjectId(self.subject_id)
    }

    fn send(&mut self, text: &str) {
        self.sent.push(text.to_string());
    }
}

/// Display text produced by a node.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum NodeText {
    /// No text at all.
    #[default]
    Empty,
    /// Plain node text.
    Text(String),
    /// Node text plus a help text shown by the `help` built-in.
    WithHelp(String, String),
}

impl NodeText {
    /// The display text, empty string if none.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Text(t) | Self::WithHelp(t, _) => t,
        }
    }

    /// The node-specific help text, if any.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        match self {
            Self::WithHelp(_, h) => Some(h),
            _ => None,
        }
    }
}

impl From<&str> for NodeText {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for NodeText {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// How an option is keyed for matching.
#[derive(Clone, Debug)]
pub enum OptionKey {
    /// No explicit key; the option answers to its 1-based position number.
    Auto,
    /// Explicit keys. The first entry is the display label, every entry is
    /// a case-insensitive alias.
    Named(Vec<String>),
    /// Catch-all fired when no fixed key and no pattern matched. Invisible
    /// in the rendered option list. At most one per node.
    Default,
    /// Free-text pattern, tried glob-first then regex, in declaration
    /// order. Never auto-numbered, never rendered.
    Pattern(PatternSpec),
}

/// One selectable choice within a node.
#[derive(Clone, Debug)]
pub struct OptionRecord {
    /// How user input selects this option.
    pub key: OptionKey,
    /// Description shown next to the key label.
    pub desc: Option<String>,
    /// Transition target when this option is selected.
    pub goto: Goto,
}

impl OptionRecord {
    /// Creates an auto-numbered option.
    #[must_use]
    pub fn auto(desc: impl Into<String>, goto: Goto) -> Self {
        Self {
            key: OptionKey::Auto,
            desc: Some(desc.into()),
            goto,
        }
    }

    /// Creates a named option from a display key and aliases.
    #[must_use]
    pub fn named<S: Into<String>>(
        keys: impl IntoIterator<Item = S>,
        desc: Option<&str>,
        goto: Goto,
    ) -> Self {
        Self {
            key: OptionKey::Named(keys.into_iter().map(Into::into).collect()),
            desc: desc.map(str::to_string),
            goto,
        }
    }

    /// Creates the `_default` catch-all option.
    #[must_use]
    pub fn default_catchall(goto: Goto) -> Self {
        Self {
            key: OptionKey::Default,
            desc: None,
            goto,
        }
    }

    /// Creates a pattern option.
    #[must_use]
    pub fn pattern(spec: PatternSpec, goto: Goto) -> Self {
        Self {
            key: OptionKey::Pattern(spec),
            desc: None,
            goto,
        }
    }
}

/// What a node evaluation produces.
#[derive(Clone, Debug, Default)]
pub struct NodeOutput {
    /// Display text for this visit.
    pub text: NodeText,
    /// Option records, in declaration order. `None` (or an empty list)
    /// marks a terminal node: display the text, then exit.
    pub options: Option<Vec<OptionRecord>>,
}

impl NodeOutput {
    /// Creates a node output with options.
    #[must_use]
    pub fn new(text: impl Into<NodeText>, options: Vec<OptionRecord>) -> Self {
        Self {
            text: text.into(),
            options: Some(options),
        }
    }

    /// Creates a terminal node output.
    #[must_use]
    pub fn terminal(text: impl Into<NodeText>) -> Self {
        Self {
            text: text.into(),
            options: None,
        }
    }

    /// Returns true if this output ends the session.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        match &self.options {
            None => true,
            Some(options) => options.is_empty(),
        }
    }
}

/// A node producer: the single polymorphic interface every node is
/// evaluated through.
///
/// `raw_input` is the user's exact input on the previous node (the input
/// that led here); `context` is the payload threaded along the transition.
pub type NodeProducer =
    Arc<dyn Fn(&mut dyn Subject, &str, &Context) -> Result<NodeOutput> + Send + Sync>;

/// Wraps a closure as a [`NodeProducer`].
pub fn node_fn<F>(f: F) -> NodeProducer
where
    F: Fn(&mut dyn Subject, &str, &Context) -> Result<NodeOutput> + Send + Sync + 'static,
{
    Arc::new(f)
}
