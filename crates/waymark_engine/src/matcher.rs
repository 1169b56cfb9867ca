//! Option matching: resolving raw user input against a node's options.
//!
//! Options are compiled once per node visit into a lookup table, then each
//! input event resolves against the table. Resolution order:
//!
//! 1. fixed keys and aliases (including auto-assigned numbers), exact,
//!    case-insensitive, first declaration wins
//! 2. pattern options in declaration order, glob first then regex, first
//!    match wins
//! 3. the `_default` catch-all, if present

use std::collections::HashMap;
use std::fmt;

use regex::{Regex, RegexBuilder};
use waymark_foundation::{Error, Result};

use crate::goto::Goto;
use crate::node::{OptionKey, OptionRecord};

// =============================================================================
// Pattern specification
// =============================================================================

/// A compiled free-text pattern.
///
/// The source is matched two ways against the entire trimmed input: first
/// as a glob where `*` and `?` are wildcards and everything else is
/// literal, then as a regex. A source that is not a valid regex still
/// participates in glob matching. The empty pattern matches only empty
/// input.
#[derive(Clone)]
pub struct PatternSpec {
    source: String,
    glob: Regex,
    regex: Option<Regex>,
}

impl PatternSpec {
    /// Compiles a pattern specification.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let glob_src = glob_to_regex(&source);
        // A fully escaped glob translation is always a valid regex.
        let glob = RegexBuilder::new(&glob_src)
            .case_insensitive(true)
            .build()
            .expect("escaped glob translation is a valid regex");
        let regex = RegexBuilder::new(&format!("^(?:{source})$"))
            .case_insensitive(true)
            .build()
            .ok();
        Self {
            source,
            glob,
            regex,
        }
    }

    /// The original pattern text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern matches the entire input.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        if self.glob.is_match(input) {
            return true;
        }
        self.regex.as_ref().is_some_and(|re| re.is_match(input))
    }
}

impl fmt::Debug for PatternSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSpec")
            .field("source", &self.source)
            .field("regex_valid", &self.regex.is_some())
            .finish()
    }
}

/// Translates a glob into an anchored regex source.
///
/// Only `*` and `?` are wildcards; all other characters match literally.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push_str("^(?:");
    for ch in glob.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(&ch.to_string())),
        }
    }
    out.push_str(")$");
    out
}

// =============================================================================
// Compiled options
// =============================================================================

/// One option after compilation.
#[derive(Clone, Debug)]
pub struct CompiledEntry {
    /// Display label (first alias, or the assigned number).
    pub label: String,
    /// Description shown next to the label.
    pub desc: Option<String>,
    /// Transition target.
    pub goto: Goto,
    /// Whether this entry appears in the rendered option list.
    pub visible: bool,
}

/// A node's options compiled for lookup.
#[derive(Clone, Debug, Default)]
pub struct CompiledOptions {
    entries: Vec<CompiledEntry>,
    /// Lowercased alias to entry index; first declaration wins.
    aliases: HashMap<String, usize>,
    /// Pattern entries in declaration order.
    patterns: Vec<(usize, PatternSpec)>,
    /// Index of the `_default` entry, if any.
    default_index: Option<usize>,
}

impl CompiledOptions {
    /// Compiles an ordered option list.
    ///
    /// Auto-numbered options answer to their overall 1-based declaration
    /// position, so descriptions can change without renumbering.
    ///
    /// # Errors
    /// Returns [`ErrorKind::DuplicateDefault`](waymark_foundation::ErrorKind::DuplicateDefault)
    /// if more than one `_default` option is present.
    pub fn build(options: &[OptionRecord]) -> Result<Self> {
        let mut compiled = Self::default();

        for (index, option) in options.iter().enumerate() {
            let entry_index = compiled.entries.len();
            match &option.key {
                OptionKey::Auto => {
                    let label = (index + 1).to_string();
                    compiled.aliases.entry(label.clone()).or_insert(entry_index);
                    compiled.entries.push(CompiledEntry {
                        label,
                        desc: option.desc.clone(),
                        goto: option.goto.clone(),
                        visible: true,
                    });
                }
                OptionKey::Named(keys) => {
                    let label = keys
                        .first()
                        .map_or_else(|| (index + 1).to_string(), Clone::clone);
                    for key in keys {
                        let alias = key.trim().to_lowercase();
                        if !alias.is_empty() {
                            compiled.aliases.entry(alias).or_insert(entry_index);
                        }
                    }
                    compiled.entries.push(CompiledEntry {
                        label,
                        desc: option.desc.clone(),
                        goto: option.goto.clone(),
                        visible: true,
                    });
                }
                OptionKey::Default => {
                    if compiled.default_index.is_some() {
                        return Err(Error::new(
                            waymark_foundation::ErrorKind::DuplicateDefault,
                        ));
                    }
                    compiled.default_index = Some(entry_index);
                    compiled.entries.push(CompiledEntry {
                        label: String::new(),
                        desc: None,
                        goto: option.goto.clone(),
                        visible: false,
                    });
                }
                OptionKey::Pattern(spec) => {
                    compiled.patterns.push((entry_index, spec.clone()));
                    compiled.entries.push(CompiledEntry {
                        label: String::new(),
                        desc: None,
                        goto: option.goto.clone(),
                        visible: false,
                    });
                }
            }
        }

        Ok(compiled)
    }

    /// Matches input against fixed keys and aliases only.
    #[must_use]
    pub fn match_exact(&self, input: &str) -> Option<usize> {
        let cmd = input.trim().to_lowercase();
        self.aliases.get(&cmd).copied()
    }

    /// Matches input against pattern options, then the `_default`
    /// catch-all.
    #[must_use]
    pub fn match_free(&self, input: &str) -> Option<usize> {
        let trimmed = input.trim().to_lowercase();
        for (index, spec) in &self.patterns {
            if spec.matches(&trimmed) {
                return Some(*index);
            }
        }
        self.default_index
    }

    /// Resolves input through the full matching order.
    ///
    /// # Errors
    /// Returns [`ErrorKind::NoMatchingOption`](waymark_foundation::ErrorKind::NoMatchingOption)
    /// when nothing matches.
    pub fn resolve(&self, input: &str) -> Result<usize> {
        self.match_exact(input)
            .or_else(|| self.match_free(input))
            .ok_or_else(|| Error::no_matching_option(input.trim()))
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&CompiledEntry> {
        self.entries.get(index)
    }

    /// The `(label, description)` pairs of visible entries, in order.
    #[must_use]
    pub fn visible(&self) -> Vec<(String, Option<String>)> {
        self.entries
            .iter()
            .filter(|entry| entry.visible)
            .map(|entry| (entry.label.clone(), entry.desc.clone()))
            .collect()
    }

    /// Number of compiled entries, visible or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
