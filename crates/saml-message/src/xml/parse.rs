//! XML text to element tree, using quick-xml events.

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{SamlError, SamlResult};

use super::{Element, Node};

/// Parses a document into its root element.
///
/// Text is kept exactly, including whitespace, because canonical digests
/// depend on it. Line endings are normalized to `\n` first, and literal tabs
/// and line breaks in attribute values become spaces; character references
/// such as `&#10;` keep their value. Comments, processing instructions and
/// the XML declaration are dropped.
///
/// # Errors
///
/// Returns [`SamlError::XmlParse`] if the document is not well-formed,
/// contains a DOCTYPE, or does not have exactly one root element.
pub fn parse(xml: &str) -> SamlResult<Element> {
    let xml = normalize_line_endings(xml);
    let mut reader = Reader::from_str(&xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| SamlError::XmlParse("unexpected closing tag".to_string()))?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                push_text(&text, &mut stack)?;
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| SamlError::XmlParse(format!("invalid UTF-8 in CDATA: {e}")))?;
                push_text(text, &mut stack)?;
            }
            Event::DocType(_) => {
                return Err(SamlError::XmlParse(
                    "DOCTYPE declarations are not allowed".to_string(),
                ));
            }
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(SamlError::XmlParse(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| SamlError::XmlParse("document has no root element".to_string()))
}

fn start_element(start: &BytesStart<'_>) -> SamlResult<Element> {
    let name = utf8(start.name().as_ref())?.to_string();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| SamlError::XmlParse(format!("<{}>: {e}", element.name)))?;
        let key = utf8(attr.key.as_ref())?.to_string();
        let raw = utf8(&attr.value)?;
        let normalized = raw.replace(['\t', '\n', '\r'], " ");
        let value = unescape(&normalized)
            .map_err(|e| SamlError::XmlParse(format!("<{}> attribute {key}: {e}", element.name)))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Rewrites `\r\n` and lone `\r` as `\n`.
fn normalize_line_endings(xml: &str) -> Cow<'_, str> {
    if xml.contains('\r') {
        Cow::Owned(xml.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(xml)
    }
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> SamlResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_some() {
        return Err(SamlError::XmlParse(format!(
            "multiple root elements, found <{}> after the root",
            element.name
        )));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn push_text(text: &str, stack: &mut [Element]) -> SamlResult<()> {
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(SamlError::XmlParse(
            "text content outside the root element".to_string(),
        ));
    };

    if text.is_empty() {
        return Ok(());
    }
    match parent.children.last_mut() {
        Some(Node::Text(previous)) => previous.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
    Ok(())
}

fn utf8(bytes: &[u8]) -> SamlResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| SamlError::XmlParse(format!("invalid UTF-8 name: {e}")))
}
