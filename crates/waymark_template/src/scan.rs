//! Line scanner for the menu template format.
//!
//! Splits template source into node blocks on the `## NODE <name>` and
//! `## OPTIONS` markers. Markers are case-insensitive and tolerate
//! interior whitespace. Text before the first node marker is ignored, as
//! are blank and `#`-comment lines inside an options section.

use waymark_foundation::{Error, Result};

/// One raw option line with its source position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionLine {
    /// 1-indexed source line number.
    pub line: usize,
    /// The option text, trimmed.
    pub text: String,
}

/// One node block: name, body text, and raw option lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeBlock {
    /// The node name from the `## NODE` marker.
    pub name: String,
    /// 1-indexed line of the marker.
    pub line: usize,
    /// Body text between the markers, outer blank lines stripped.
    pub text: String,
    /// Option lines, or `None` when the block has no `## OPTIONS`
    /// section (a terminal node).
    pub options: Option<Vec<OptionLine>>,
}

/// A recognized marker line.
enum Marker {
    Node(String),
    Options,
}

/// Recognizes `## NODE <name>` and `## OPTIONS` markers.
fn marker(line: &str) -> Option<Marker> {
    let rest = line.trim_start().strip_prefix("##")?.trim_start();
    let lower = rest.to_lowercase();
    if lower == "options" {
        return Some(Marker::Options);
    }
    if let Some(after) = rest.get(4..) {
        if lower.starts_with("node") && after.chars().next().is_none_or(char::is_whitespace) {
            return Some(Marker::Node(after.trim().to_string()));
        }
    }
    None
}

enum Mode {
    Preamble,
    Text,
    Options,
}

struct PartialBlock {
    name: String,
    line: usize,
    text_lines: Vec<String>,
    options: Option<Vec<OptionLine>>,
}

impl PartialBlock {
    fn finish(self) -> NodeBlock {
        let text = self.text_lines.join("\n");
        NodeBlock {
            name: self.name,
            line: self.line,
            text: text.trim_matches('\n').to_string(),
            options: self.options,
        }
    }
}

/// Splits template source into node blocks.
///
/// # Errors
/// Returns [`ErrorKind::TemplateSyntax`](waymark_foundation::ErrorKind::TemplateSyntax)
/// for a nameless `## NODE` marker, an `## OPTIONS` marker outside a
/// node, or a second `## OPTIONS` marker in the same node.
pub fn scan(source: &str) -> Result<Vec<NodeBlock>> {
    let mut blocks = Vec::new();
    let mut current: Option<PartialBlock> = None;
    let mut mode = Mode::Preamble;

    for (index, raw_line) in source.lines().enumerate() {
        let lineno = index + 1;
        match marker(raw_line) {
            Some(Marker::Node(name)) => {
                if name.is_empty() {
                    return Err(Error::template_syntax("## NODE marker without a name", lineno));
                }
                if let Some(block) = current.take() {
                    blocks.push(block.finish());
                }
                current = Some(PartialBlock {
                    name,
                    line: lineno,
                    text_lines: Vec::new(),
                    options: None,
                });
                mode = Mode::Text;
            }
            Some(Marker::Options) => {
                let Some(block) = current.as_mut() else {
                    return Err(Error::template_syntax(
                        "## OPTIONS marker before any ## NODE",
                        lineno,
                    ));
                };
                if block.options.is_some() {
                    return Err(Error::template_syntax(
                        "second ## OPTIONS marker in one node",
                        lineno,
                    ));
                }
                block.options = Some(Vec::new());
                mode = Mode::Options;
            }
            None => match mode {
                Mode::Preamble => {}
                Mode::Text => {
                    if let Some(block) = current.as_mut() {
                        block.text_lines.push(raw_line.to_string());
                    }
                }
                Mode::Options => {
                    let text = raw_line.trim();
                    if text.is_empty() || text.starts_with('#') {
                        continue;
                    }
                    if let Some(lines) = current.as_mut().and_then(|b| b.options.as_mut()) {
                        lines.push(OptionLine {
                            line: lineno,
                            text: text.to_string(),
                        });
                    }
                }
            },
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block.finish());
    }
    Ok(blocks)
}
