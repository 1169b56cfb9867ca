//! The closed literal grammar for call-expression keyword values.
//!
//! Values are numbers, booleans, `None`, quoted strings, or bareword
//! strings. This is a dedicated parser for that small set, not a general
//! expression evaluator; anything unrecognized is a bareword string.

use waymark_foundation::{Error, Result, Value};

/// Parses a single literal.
#[must_use]
pub fn parse_literal(text: &str) -> Value {
    let text = text.trim();
    match text {
        "None" | "none" | "nil" => return Value::Nil,
        "True" | "true" => return Value::Bool(true),
        "False" | "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::Int(n);
    }
    // Require a digit so barewords like "inf" stay strings.
    if text.contains(|c: char| c.is_ascii_digit()) {
        if let Ok(n) = text.parse::<f64>() {
            return Value::Float(n);
        }
    }
    if let Some(unquoted) = unquote(text) {
        return Value::Str(unquoted.into());
    }
    Value::from(text)
}

/// Strips matching single or double quotes and resolves basic escapes.
fn unquote(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let quote = *bytes.first()?;
    if (quote != b'"' && quote != b'\'') || *bytes.last()? != quote {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

/// Splits a kwargs body on top-level commas, respecting quotes.
fn split_args(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in text.chars() {
        if escaped {
            buf.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if quote.is_some() => {
                buf.push(ch);
                escaped = true;
            }
            '\'' | '"' => {
                match quote {
                    None => quote = Some(ch),
                    Some(q) if q == ch => quote = None,
                    Some(_) => {}
                }
                buf.push(ch);
            }
            ',' if quote.is_none() => {
                parts.push(std::mem::take(&mut buf));
                continue;
            }
            _ => buf.push(ch),
        }
    }
    if !buf.trim().is_empty() {
        parts.push(buf);
    }
    parts
}

/// Returns true if `text` is a plain identifier.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses a call-expression kwargs body like `a=1, b="two"`.
///
/// # Errors
/// Returns [`ErrorKind::TemplateSyntax`](waymark_foundation::ErrorKind::TemplateSyntax)
/// for positional arguments or malformed keyword names. Only keyword
/// arguments (or none at all) are allowed.
pub fn parse_kwargs(text: &str, line: usize) -> Result<Vec<(String, Value)>> {
    let mut kwargs = Vec::new();
    for part in split_args(text) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((key, value)) = part.split_once('=') else {
            return Err(Error::template_syntax(
                format!("positional argument '{part}' (only keyword arguments are allowed)"),
                line,
            ));
        };
        let key = key.trim();
        if !is_identifier(key) {
            return Err(Error::template_syntax(
                format!("'{key}' is not a valid keyword name"),
                line,
            ));
        }
        kwargs.push((key.to_string(), parse_literal(value)));
    }
    Ok(kwargs)
}
