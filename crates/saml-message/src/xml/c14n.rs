//! Exclusive XML Canonicalization 1.0, without comments.
//!
//! `xml_canonicalization` produces the canonical serialization, but it only
//! reads a complete document. A subtree is therefore projected here first:
//! its namespace declarations are replaced by the visibly utilized bindings
//! from its document context, so the projected document, and its canonical
//! form, no longer depend on where the subtree sat or on unrelated
//! declarations inherited from its ancestors.

use std::collections::{BTreeMap, BTreeSet};

use xml_canonicalization::Canonicalizer;

use crate::error::{SamlError, SamlResult};

use super::{namespace_declaration, render, split_qname, Element, Node};

/// Namespace bound to the reserved `xml` prefix.
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// In-scope namespace bindings, keyed by prefix (`""` for the default namespace).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceScope {
    bindings: BTreeMap<String, String>,
}

impl NamespaceScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the namespace URI bound to `prefix`.
    ///
    /// The default namespace un-declared with `xmlns=""` resolves to `None`.
    #[must_use]
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NS);
        }
        self.bindings
            .get(prefix)
            .map(String::as_str)
            .filter(|uri| !uri.is_empty())
    }

    /// Binds `prefix` to `uri`.
    pub fn declare(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(prefix.into(), uri.into());
    }

    /// Returns the namespace URI of `element`'s own name, honouring the
    /// declarations made on `element` itself.
    #[must_use]
    pub fn element_namespace(&self, element: &Element) -> Option<String> {
        let prefix = split_qname(&element.name).0.unwrap_or("");
        self.enter(element).resolve(prefix).map(str::to_string)
    }

    /// Returns the scope seen by the children of `element`.
    #[must_use]
    pub fn enter(&self, element: &Element) -> Self {
        let mut scope = self.clone();
        for (name, value) in &element.attributes {
            if let Some(prefix) = namespace_declaration(name) {
                scope.declare(prefix, value.as_str());
            }
        }
        scope
    }
}

/// Computes the namespace scope inherited by the element at `path`, i.e.
/// the declarations of all of its ancestors.
///
/// # Errors
///
/// Returns [`SamlError::XmlParse`] if `path` does not address an element.
pub fn scope_at(root: &Element, path: &[usize]) -> SamlResult<NamespaceScope> {
    let mut scope = NamespaceScope::new();
    let mut current = root;
    for &i in path {
        scope = scope.enter(current);
        current = match current.children.get(i) {
            Some(Node::Element(child)) => child,
            _ => {
                return Err(SamlError::XmlParse(format!(
                    "no element at child index {i} of <{}>",
                    current.name
                )));
            }
        };
    }
    Ok(scope)
}

/// Canonicalizes `element` given the namespace bindings of its ancestors.
///
/// # Errors
///
/// Returns [`SamlError::XmlParse`] if a prefix used in the subtree is not
/// bound or the canonicalizer rejects the projected document.
pub fn canonicalize(element: &Element, inherited: &NamespaceScope) -> SamlResult<String> {
    let projected = project(element, inherited, &BTreeMap::new())?;
    let xml = render(&projected)?;

    let mut out = Vec::new();
    Canonicalizer::read_from_str(&xml)
        .write_to_writer(&mut out)
        .canonicalize(false)
        .map_err(|e| SamlError::XmlParse(format!("canonicalization failed: {e}")))?;
    String::from_utf8(out)
        .map_err(|e| SamlError::XmlParse(format!("canonical form is not UTF-8: {e}")))
}

/// Copies `element` with its namespace declarations replaced by the ones
/// exclusive canonicalization renders. `rendered` holds the bindings already
/// declared by projected ancestors.
fn project(
    element: &Element,
    parent_scope: &NamespaceScope,
    rendered: &BTreeMap<String, String>,
) -> SamlResult<Element> {
    let scope = parent_scope.enter(element);

    // Visibly utilized prefixes; unprefixed attributes have no namespace.
    let mut utilized = BTreeSet::new();
    utilized.insert(split_qname(&element.name).0.unwrap_or(""));
    for (name, _) in &element.attributes {
        if namespace_declaration(name).is_some() {
            continue;
        }
        if let (Some(prefix), _) = split_qname(name) {
            utilized.insert(prefix);
        }
    }

    let mut projected = Element::new(element.name.clone());
    let mut rendered_here = rendered.clone();
    for prefix in utilized {
        if prefix == "xml" {
            continue;
        }
        let uri = match scope.resolve(prefix) {
            Some(uri) if rendered.get(prefix).map(String::as_str) != Some(uri) => uri,
            Some(_) => continue,
            None if prefix.is_empty() => {
                if !rendered.get("").is_some_and(|uri| !uri.is_empty()) {
                    continue;
                }
                ""
            }
            None => {
                return Err(SamlError::XmlParse(format!(
                    "unbound namespace prefix '{prefix}' on <{}>",
                    element.name
                )));
            }
        };
        let name = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{prefix}")
        };
        projected.attributes.push((name, uri.to_string()));
        rendered_here.insert(prefix.to_string(), uri.to_string());
    }
    projected.attributes.extend(
        element
            .attributes
            .iter()
            .filter(|(name, _)| namespace_declaration(name).is_none())
            .cloned(),
    );

    for child in &element.children {
        projected.children.push(match child {
            Node::Element(el) => Node::Element(project(el, &scope, &rendered_here)?),
            Node::Text(text) => Node::Text(text.clone()),
        });
    }
    Ok(projected)
}
