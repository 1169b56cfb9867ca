//! Render hooks exposed to the transport layer.
//!
//! Three hooks cover a node's visual assembly: node text, option list, and
//! the final composition, plus one for help text. Each is a pure function
//! of its inputs and independently overridable; [`DefaultFormatter`] keeps
//! the defaults.

/// Border character used by the default node assembly.
const BORDER_CHAR: char = '_';

/// Widest border the default assembly will draw.
const MAX_BORDER_WIDTH: usize = 78;

/// Formatting hooks for rendering a node.
pub trait MenuFormatter {
    /// Formats the node text itself.
    fn format_node_text(&self, text: &str) -> String {
        dedent(text.trim_matches('\n')).trim_end().to_string()
    }

    /// Formats the node's help text.
    fn format_help_text(&self, text: &str) -> String {
        dedent(text.trim_matches('\n')).trim_end().to_string()
    }

    /// Formats the option block from ordered `(label, description)` pairs.
    fn format_options(&self, options: &[(String, Option<String>)]) -> String {
        let mut lines = Vec::with_capacity(options.len());
        for (label, desc) in options {
            match desc {
                Some(desc) if !desc.is_empty() => lines.push(format!(" {label}: {desc}")),
                _ => lines.push(format!(" {label}")),
            }
        }
        lines.join("\n")
    }

    /// Assembles the full node display from the formatted text and option
    /// block.
    fn format_node(&self, node_text: &str, options_text: &str) -> String {
        let width = node_text
            .lines()
            .chain(options_text.lines())
            .map(str::len)
            .max()
            .unwrap_or(0)
            .min(MAX_BORDER_WIDTH);
        if options_text.is_empty() {
            return node_text.to_string();
        }
        if node_text.is_empty() {
            return options_text.to_string();
        }
        let border = BORDER_CHAR.to_string().repeat(width);
        format!("{node_text}\n{border}\n\n{options_text}")
    }
}

/// The stock formatter, using every default hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFormatter;

impl MenuFormatter for DefaultFormatter {}

/// Strips the longest common leading whitespace from every non-blank line.
#[must_use]
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    if indent == 0 {
        return text.to_string();
    }
    text.lines()
        .map(|line| if line.len() >= indent { &line[indent..] } else { line.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}
