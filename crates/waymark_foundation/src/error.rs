//! Error types for the Waymark menu system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the Waymark crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Waymark operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unknown-node error.
    #[must_use]
    pub fn unknown_node(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownNode(name.into()))
    }

    /// Creates a no-matching-option error.
    #[must_use]
    pub fn no_matching_option(input: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoMatchingOption {
            input: input.into(),
        })
    }

    /// Creates an invalid-goto-result error.
    #[must_use]
    pub fn invalid_goto(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidGotoResult {
            reason: reason.into(),
        })
    }

    /// Creates an unknown-goto-callable error.
    #[must_use]
    pub fn unknown_callable(name: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::UnknownGotoCallable {
            name: name.into(),
            line,
        })
    }

    /// Creates a duplicate-node error.
    #[must_use]
    pub fn duplicate_node(name: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::DuplicateNode {
            name: name.into(),
            line,
        })
    }

    /// Creates a template syntax error.
    #[must_use]
    pub fn template_syntax(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::TemplateSyntax {
            message: message.into(),
            line,
        })
    }

    /// Creates a reserved-node-name error.
    #[must_use]
    pub fn reserved_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReservedNodeName(name.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this error is recoverable inside a running session.
    ///
    /// Recoverable errors produce a user-visible notice and leave the
    /// session on its current node; everything else propagates to the
    /// session supervisor.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NoMatchingOption { .. } | ErrorKind::InvalidGotoResult { .. }
        )
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A node name was not found in the registry.
    #[error("unknown menu node: {0}")]
    UnknownNode(String),

    /// User input did not match any option on the current node.
    #[error("no option matches input: {input:?}")]
    NoMatchingOption {
        /// The unmatched input, trimmed.
        input: String,
    },

    /// A goto-callable produced a transition target the engine cannot use.
    #[error("invalid goto result: {reason}")]
    InvalidGotoResult {
        /// What was wrong with the returned target.
        reason: String,
    },

    /// A template references a callable not present in the callable mapping.
    #[error("unknown goto callable '{name}' at line {line}")]
    UnknownGotoCallable {
        /// The callable name used in the template.
        name: String,
        /// Line number (1-indexed) of the offending option.
        line: usize,
    },

    /// Two nodes in one template share a name.
    #[error("duplicate node '{name}' at line {line}")]
    DuplicateNode {
        /// The duplicated node name.
        name: String,
        /// Line number (1-indexed) of the second definition.
        line: usize,
    },

    /// The template text does not follow the menu grammar.
    #[error("template syntax error at line {line}: {message}")]
    TemplateSyntax {
        /// Description of the syntax problem.
        message: String,
        /// Line number (1-indexed) where it occurred.
        line: usize,
    },

    /// A node declared more than one `_default` option.
    #[error("more than one _default option in node")]
    DuplicateDefault,

    /// An underscore-prefixed name was registered as a node.
    #[error("node name '{0}' is reserved (leading underscore)")]
    ReservedNodeName(String),

    /// Input was delivered to a session that has already closed.
    #[error("menu session is closed")]
    SessionClosed,

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The menu node involved, if known.
    pub node: Option<String>,
    /// Line number in template source, if applicable.
    pub line: Option<usize>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node name.
    #[must_use]
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Sets the template line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(node) = &self.node {
            write!(f, "in node '{node}'")?;
        }
        if let Some(line) = self.line {
            if self.node.is_some() {
                write!(f, " ")?;
            }
            write!(f, "at line {line}")?;
        }
        Ok(())
    }
}
