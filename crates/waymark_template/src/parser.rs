//! Compiles scanned node blocks into a [`NodeRegistry`].
//!
//! Option lines follow one of these forms:
//!
//! ```text
//! key; alias; alias: description -> target
//! key: target
//! > pattern: target
//! >: target
//! ```
//!
//! A target is a node name or a call expression `name(k=v, ...)` whose
//! name must exist in the supplied callable mapping. Compilation is
//! all-or-nothing: any bad line fails the whole template.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;
use waymark_foundation::{Context, Error, Result};
use waymark_engine::{
    Goto, GotoResult, NodeOutput, NodeRegistry, OptionKey, OptionRecord, PatternSpec, Subject,
    goto_fn, node_fn,
};

use crate::literal::parse_kwargs;
use crate::scan::{NodeBlock, OptionLine, scan};

/// A goto-callable usable from templates.
///
/// Receives `(subject, raw_input, kwargs)` and returns the next node
/// name, or `None` to re-run the current node.
pub type TemplateCallable =
    Arc<dyn Fn(&mut dyn Subject, &str, &Context) -> Result<Option<String>> + Send + Sync>;

/// Mapping of call-expression names to callables.
pub type CallableMap = HashMap<String, TemplateCallable>;

/// Wraps a closure as a [`TemplateCallable`].
pub fn callable_fn<F>(f: F) -> TemplateCallable
where
    F: Fn(&mut dyn Subject, &str, &Context) -> Result<Option<String>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Compiles a template into a node registry.
///
/// The registry is independent of any session and may back any number of
/// concurrent sessions.
///
/// # Errors
/// Returns [`ErrorKind::TemplateSyntax`](waymark_foundation::ErrorKind::TemplateSyntax),
/// [`ErrorKind::DuplicateNode`](waymark_foundation::ErrorKind::DuplicateNode),
/// [`ErrorKind::ReservedNodeName`](waymark_foundation::ErrorKind::ReservedNodeName) or
/// [`ErrorKind::UnknownGotoCallable`](waymark_foundation::ErrorKind::UnknownGotoCallable);
/// nothing is produced on failure.
pub fn compile_template(source: &str, callables: &CallableMap) -> Result<NodeRegistry> {
    let blocks = scan(source)?;
    if blocks.is_empty() {
        return Err(Error::template_syntax("template contains no ## NODE blocks", 1));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut registry = NodeRegistry::new();
    for block in blocks {
        if block.name.starts_with('_') {
            return Err(Error::reserved_name(block.name));
        }
        if !seen.insert(block.name.clone()) {
            return Err(Error::duplicate_node(block.name, block.line));
        }
        let producer = compile_block(&block, callables)?;
        registry.register(block.name, producer)?;
    }
    debug!(nodes = registry.len(), "template compiled");
    Ok(registry)
}

/// Compiles one node block into a producer.
fn compile_block(
    block: &NodeBlock,
    callables: &CallableMap,
) -> Result<waymark_engine::NodeProducer> {
    let options = match &block.options {
        None => None,
        Some(lines) => {
            let mut records = Vec::with_capacity(lines.len());
            for line in lines {
                records.push(parse_option_line(line, callables)?);
            }
            Some(records)
        }
    };
    let text = block.text.clone();
    Ok(node_fn(move |_, _, _| {
        Ok(NodeOutput {
            text: text.as_str().into(),
            options: options.clone(),
        })
    }))
}

/// Parses one option line into an option record.
fn parse_option_line(line: &OptionLine, callables: &CallableMap) -> Result<OptionRecord> {
    let text = line.text.as_str();

    if let Some(rest) = text.strip_prefix('>') {
        let Some((pattern, target)) = rest.split_once(':') else {
            return Err(Error::template_syntax(
                "pattern option is missing ':'",
                line.line,
            ));
        };
        let target = target.trim();
        if target.is_empty() {
            return Err(Error::template_syntax(
                "pattern option is missing a goto target",
                line.line,
            ));
        }
        let goto = parse_target(target, line.line, callables)?;
        return Ok(OptionRecord::pattern(PatternSpec::new(pattern.trim()), goto));
    }

    let Some((key_part, rest)) = text.split_once(':') else {
        return Err(Error::template_syntax(
            format!("option line '{text}' is missing ':'"),
            line.line,
        ));
    };
    let rest = rest.trim();

    let (desc, target) = match rest.split_once("->") {
        Some((desc, target)) => {
            let desc = desc.trim();
            ((!desc.is_empty()).then(|| desc.to_string()), target.trim())
        }
        // No separator: the whole remainder is a bare goto.
        None => (None, rest),
    };
    if target.is_empty() {
        return Err(Error::template_syntax(
            format!("option line '{text}' is missing a goto target"),
            line.line,
        ));
    }

    let keys: Vec<String> = key_part
        .split(';')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    let key = if keys.is_empty() {
        OptionKey::Auto
    } else if keys.iter().any(|k| k == "_default") {
        OptionKey::Default
    } else {
        OptionKey::Named(keys)
    };

    let goto = parse_target(target, line.line, callables)?;
    Ok(OptionRecord { key, desc, goto })
}

/// Parses a goto target: a node name or a call expression.
fn parse_target(target: &str, line: usize, callables: &CallableMap) -> Result<Goto> {
    let Some((name, remainder)) = target.split_once('(') else {
        return Ok(Goto::Node(target.to_string()));
    };
    let name = name.trim();
    let Some(args) = remainder.strip_suffix(')') else {
        return Err(Error::template_syntax(
            format!("call expression '{target}' is missing ')'"),
            line,
        ));
    };

    let Some(func) = callables.get(name).cloned() else {
        return Err(Error::unknown_callable(name, line));
    };
    let kwargs = parse_kwargs(args, line)?;

    let adapter = goto_fn(move |subject, raw, ctx| {
        match func(subject, raw, ctx)? {
            Some(node) => Ok(GotoResult::Node(node)),
            None => Ok(GotoResult::Stay),
        }
    });

    // Without kwargs the inbound context flows through; with kwargs the
    // parsed literals replace it for the call.
    if kwargs.is_empty() {
        Ok(Goto::Call(adapter))
    } else {
        let context: Context = kwargs
            .into_iter()
            .map(|(k, v)| (Arc::from(k.as_str()), v))
            .collect();
        Ok(Goto::CallWith(adapter, context))
    }
}
