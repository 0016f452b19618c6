//! XML Signature support for SAML.
//!
//! Enveloped signatures over the `Assertion` element, with a fixed
//! algorithm set:
//!
//! - canonicalization: exclusive C14N without comments
//! - transforms: enveloped-signature, then exclusive C14N
//! - digest: SHA-256
//! - signature: RSA PKCS#1 v1.5 with SHA-256
//!
//! Signer and validator share the digest and canonicalization code below,
//! so a document signed here always verifies here.

mod signer;
mod validator;

pub use signer::*;
pub use validator::*;

use base64::Engine;

use crate::error::{SamlError, SamlResult};
use crate::types::{algorithms, XMLDSIG_NS};
use crate::xml::{canonicalize, scope_at, Element, NamespaceScope, Node};

/// Parsed `<ds:Signature>` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSignature {
    /// `SignedInfo/CanonicalizationMethod/@Algorithm`.
    pub canonicalization_method: String,
    /// `SignedInfo/SignatureMethod/@Algorithm`.
    pub signature_method: String,
    /// `Reference/@URI`, e.g. `#_abc`.
    pub reference_uri: String,
    /// `Reference/Transforms/Transform/@Algorithm`, in order.
    pub transforms: Vec<String>,
    /// `Reference/DigestMethod/@Algorithm`.
    pub digest_method: String,
    /// Base64 digest, whitespace removed.
    pub digest_value: String,
    /// Base64 signature value, whitespace removed.
    pub signature_value: String,
    /// Embedded certificate body from `KeyInfo/X509Data`, if any.
    pub x509_certificate: Option<String>,
}

impl XmlSignature {
    /// Reads a `Signature` element.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::XmlParse`] describing the first missing part.
    pub fn from_element(signature: &Element) -> SamlResult<Self> {
        let signed_info = child(signature, "SignedInfo")?;

        let mut references = signed_info
            .child_elements()
            .filter(|el| el.local_name() == "Reference");
        let reference = references
            .next()
            .ok_or_else(|| missing("SignedInfo", "Reference"))?;
        if references.next().is_some() {
            return Err(SamlError::XmlParse(
                "SignedInfo must contain exactly one Reference".to_string(),
            ));
        }

        let transforms = match reference.child("Transforms") {
            Some(transforms) => transforms
                .child_elements()
                .filter(|el| el.local_name() == "Transform")
                .map(|el| algorithm(el).map(String::from))
                .collect::<SamlResult<_>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            canonicalization_method: algorithm(child(signed_info, "CanonicalizationMethod")?)?
                .to_string(),
            signature_method: algorithm(child(signed_info, "SignatureMethod")?)?.to_string(),
            reference_uri: reference
                .attr("URI")
                .ok_or_else(|| SamlError::XmlParse("Reference has no URI".to_string()))?
                .to_string(),
            transforms,
            digest_method: algorithm(child(reference, "DigestMethod")?)?.to_string(),
            digest_value: compact(&child(reference, "DigestValue")?.text()),
            signature_value: compact(&child(signature, "SignatureValue")?.text()),
            x509_certificate: signature
                .child("KeyInfo")
                .and_then(|key_info| key_info.child("X509Data"))
                .and_then(|data| data.child("X509Certificate"))
                .map(|cert| compact(&cert.text())),
        })
    }

    /// Returns every algorithm URI outside the supported set.
    #[must_use]
    pub fn unsupported_algorithms(&self) -> Vec<String> {
        let mut unsupported = Vec::new();
        if self.canonicalization_method != algorithms::EXCLUSIVE_C14N {
            unsupported.push(self.canonicalization_method.clone());
        }
        if self.signature_method != algorithms::RSA_SHA256 {
            unsupported.push(self.signature_method.clone());
        }
        if self.digest_method != algorithms::SHA256 {
            unsupported.push(self.digest_method.clone());
        }
        unsupported.extend(
            self.transforms
                .iter()
                .filter(|uri| {
                    uri.as_str() != algorithms::ENVELOPED_SIGNATURE
                        && uri.as_str() != algorithms::EXCLUSIVE_C14N
                })
                .cloned(),
        );
        if !self
            .transforms
            .iter()
            .any(|uri| uri == algorithms::ENVELOPED_SIGNATURE)
        {
            unsupported.push(format!(
                "transforms without {}",
                algorithms::ENVELOPED_SIGNATURE
            ));
        }
        unsupported
    }
}

fn child<'a>(element: &'a Element, local: &str) -> SamlResult<&'a Element> {
    element
        .child(local)
        .ok_or_else(|| missing(element.local_name(), local))
}

fn missing(parent: &str, local: &str) -> SamlError {
    SamlError::XmlParse(format!("{parent} has no {local}"))
}

fn algorithm(element: &Element) -> SamlResult<&str> {
    element.attr("Algorithm").ok_or_else(|| {
        SamlError::XmlParse(format!("{} has no Algorithm", element.local_name()))
    })
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Builds `ds:SignedInfo` referencing `#reference_id`.
pub(crate) fn signed_info_element(reference_id: &str, digest_b64: &str) -> Element {
    let method = |name: &str, uri: &str| Element::new(name).with_attr("Algorithm", uri);

    Element::new("ds:SignedInfo")
        .with_child(method("ds:CanonicalizationMethod", algorithms::EXCLUSIVE_C14N))
        .with_child(method("ds:SignatureMethod", algorithms::RSA_SHA256))
        .with_child(
            Element::new("ds:Reference")
                .with_attr("URI", format!("#{reference_id}"))
                .with_child(
                    Element::new("ds:Transforms")
                        .with_child(method("ds:Transform", algorithms::ENVELOPED_SIGNATURE))
                        .with_child(method("ds:Transform", algorithms::EXCLUSIVE_C14N)),
                )
                .with_child(method("ds:DigestMethod", algorithms::SHA256))
                .with_child(Element::new("ds:DigestValue").with_text(digest_b64)),
        )
}

/// Builds the `ds:Signature` shell around `signed_info`.
pub(crate) fn signature_element(signed_info: Element) -> Element {
    Element::new("ds:Signature")
        .with_attr("xmlns:ds", XMLDSIG_NS)
        .with_child(signed_info)
}

/// Applies the enveloped-signature and exclusive C14N transforms to the
/// element at `path` and returns its base64 SHA-256 digest.
///
/// `signature` is the child index of the enveloped `ds:Signature`; only that
/// one child is removed before digesting.
pub(crate) fn reference_digest(
    root: &Element,
    path: &[usize],
    signature: Option<usize>,
) -> SamlResult<String> {
    let element = root
        .at_path(path)
        .ok_or_else(|| SamlError::XmlParse("referenced element not found".to_string()))?;

    let mut stripped = element.clone();
    if let Some(index) = signature {
        match stripped.children.get(index) {
            Some(Node::Element(_)) => {
                stripped.children.remove(index);
            }
            _ => {
                return Err(SamlError::XmlParse(
                    "enveloped signature not found".to_string(),
                ));
            }
        }
    }

    let canonical = canonicalize(&stripped, &scope_at(root, path)?)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(saml_crypto::sha256(canonical.as_bytes())))
}

/// Canonicalizes the element at `path` (a `SignedInfo`) in its document context.
pub(crate) fn canonical_signed_info(root: &Element, path: &[usize]) -> SamlResult<String> {
    let signed_info = root
        .at_path(path)
        .ok_or_else(|| SamlError::XmlParse("SignedInfo not found".to_string()))?;
    canonicalize(signed_info, &scope_at(root, path)?)
}

/// Returns the index of the first child element with the given local name.
pub(crate) fn child_index(element: &Element, local: &str) -> Option<usize> {
    element
        .children
        .iter()
        .position(|node| matches!(node, Node::Element(el) if el.local_name() == local))
}

/// Returns the index of the first `Signature` child of `element` in the
/// XML-DSig namespace. `inherited` holds the bindings of `element`'s ancestors.
pub(crate) fn signature_index(element: &Element, inherited: &NamespaceScope) -> Option<usize> {
    let scope = inherited.enter(element);
    element.children.iter().position(|node| {
        matches!(node, Node::Element(el)
            if el.local_name() == "Signature"
                && scope.element_namespace(el).as_deref() == Some(XMLDSIG_NS))
    })
}
