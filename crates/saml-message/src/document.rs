//! Parsed SAML documents.

use crate::error::SamlResult;
use crate::types::{AuthnRequest, Response};
use crate::xml::{self, Element};

/// A decoded SAML message as an element tree.
///
/// Returned by the decode operations and by a successful verification.
/// Typed views are available through [`ParsedDocument::authn_request`] and
/// [`ParsedDocument::response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    root: Element,
}

impl ParsedDocument {
    /// Wraps an element tree.
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parses XML text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::XmlParse`] if the text is not well-formed.
    pub fn parse(xml: &str) -> SamlResult<Self> {
        xml::parse(xml).map(Self::new)
    }

    /// The document element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Unwraps the element tree.
    #[must_use]
    pub fn into_root(self) -> Element {
        self.root
    }

    /// First element with the given local name, searching the whole document.
    #[must_use]
    pub fn find(&self, local: &str) -> Option<&Element> {
        self.root.find(local)
    }

    /// Text of the message-level `Issuer`.
    #[must_use]
    pub fn issuer(&self) -> Option<String> {
        self.root.child("Issuer").map(Element::text)
    }

    /// Reads the document as an `AuthnRequest`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::XmlParse`] if the root is not a
    /// well-formed `AuthnRequest`.
    pub fn authn_request(&self) -> SamlResult<AuthnRequest> {
        AuthnRequest::from_element(&self.root)
    }

    /// Reads the document as a `Response`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::XmlParse`] if the root is not a
    /// well-formed `Response`.
    pub fn response(&self) -> SamlResult<Response> {
        Response::from_element(&self.root)
    }

    /// Renders the document back to XML.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SamlError::MalformedTree`] if the tree holds an
    /// invalid name.
    pub fn to_xml(&self) -> SamlResult<String> {
        xml::render(&self.root)
    }
}

impl From<Element> for ParsedDocument {
    fn from(root: Element) -> Self {
        Self::new(root)
    }
}
