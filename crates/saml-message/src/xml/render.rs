//! Element tree serialization.

use crate::error::{SamlError, SamlResult};

use super::{Element, Node};

/// Serializes an element tree to XML text.
///
/// No prolog is written and no whitespace is inserted; attributes keep their
/// declaration order and childless elements are self-closing, so identical
/// trees always produce identical bytes.
///
/// # Errors
///
/// Returns [`SamlError::MalformedTree`] for an empty or invalid tag or
/// attribute name, or a duplicate attribute key.
pub fn render(element: &Element) -> SamlResult<String> {
    let mut out = String::new();
    write_element(element, &mut out)?;
    Ok(out)
}

fn write_element(element: &Element, out: &mut String) -> SamlResult<()> {
    if !is_valid_name(&element.name) {
        return Err(SamlError::MalformedTree(format!(
            "invalid element name '{}'",
            element.name
        )));
    }

    out.push('<');
    out.push_str(&element.name);

    for (i, (key, value)) in element.attributes.iter().enumerate() {
        if !is_valid_name(key) {
            return Err(SamlError::MalformedTree(format!(
                "invalid attribute name '{key}' on <{}>",
                element.name
            )));
        }
        if element.attributes[..i].iter().any(|(other, _)| other == key) {
            return Err(SamlError::MalformedTree(format!(
                "duplicate attribute '{key}' on <{}>",
                element.name
            )));
        }
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return Ok(());
    }

    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(el) => write_element(el, out)?,
            Node::Text(text) => escape_text(text, out),
        }
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
    Ok(())
}

/// Strips line breaks and collapses inter-tag whitespace.
///
/// Only for unsigned documents: the result is not byte-identical to the
/// input, so a signature over the input would no longer verify.
#[must_use]
pub fn minify(xml: &str) -> String {
    let without_breaks: String = xml
        .trim()
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect();
    without_breaks
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("> <", "><")
}

/// Returns true if `name` is a name or a single-colon qualified name.
pub(crate) fn is_valid_name(name: &str) -> bool {
    fn is_ncname(part: &str) -> bool {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_'))
    }

    match name.split_once(':') {
        Some((prefix, local)) => is_ncname(prefix) && is_ncname(local),
        None => is_ncname(name),
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}
