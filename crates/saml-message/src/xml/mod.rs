//! Owned XML element tree.
//!
//! SAML messages are built as [`Element`] trees, rendered once with
//! [`render`], and parsed back with [`parse`]. Namespace declarations are
//! plain `xmlns` / `xmlns:p` attributes so that serialization reproduces
//! them exactly where they were declared.

pub mod c14n;
mod parse;
mod render;

pub use c14n::{canonicalize, scope_at, NamespaceScope};
pub use parse::parse;
pub use render::{minify, render};

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data, stored unescaped.
    Text(String),
}

/// An XML element with a qualified name, ordered attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name, e.g. `saml:Issuer`.
    pub name: String,
    /// Attributes in declaration order, including namespace declarations.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Appends an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Appends a text node.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Returns the value of the attribute with the given qualified name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the tag name without its prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Returns the concatenated text of the direct text children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Iterates over the child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Returns the first child element with the given local name.
    #[must_use]
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.local_name() == local)
    }

    /// Returns the first element with the given local name, searching this
    /// element and its descendants in document order.
    #[must_use]
    pub fn find(&self, local: &str) -> Option<&Element> {
        self.find_path(local).and_then(|path| self.at_path(&path))
    }

    /// Returns the child-index path to the first element with the given
    /// local name, or `None`. The empty path addresses `self`.
    #[must_use]
    pub fn find_path(&self, local: &str) -> Option<Vec<usize>> {
        if self.local_name() == local {
            return Some(Vec::new());
        }
        self.children.iter().enumerate().find_map(|(i, node)| match node {
            Node::Element(el) => el.find_path(local).map(|mut path| {
                path.insert(0, i);
                path
            }),
            Node::Text(_) => None,
        })
    }

    /// Returns the element addressed by a child-index path.
    #[must_use]
    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        path.iter().try_fold(self, |el, &i| match el.children.get(i) {
            Some(Node::Element(child)) => Some(child),
            _ => None,
        })
    }

    /// Mutable variant of [`Element::at_path`].
    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &i in path {
            current = match current.children.get_mut(i) {
                Some(Node::Element(child)) => child,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns every element in the subtree, this one included, in document order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        for child in self.child_elements() {
            out.extend(child.descendants());
        }
        out
    }
}

/// Splits a qualified name into its optional prefix and local part.
#[must_use]
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Returns the local part of a qualified name.
#[must_use]
pub fn local_name(qname: &str) -> &str {
    split_qname(qname).1
}

/// Returns the declared prefix if `name` is a namespace declaration
/// (`""` for the default namespace).
#[must_use]
pub fn namespace_declaration(name: &str) -> Option<&str> {
    if name == "xmlns" {
        Some("")
    } else {
        name.strip_prefix("xmlns:")
    }
}
