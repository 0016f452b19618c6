//! AuthnRequest operations.
//!
//! Requests travel over the HTTP-Redirect binding and are not signed.

use tracing::debug;

use crate::bindings::redirect;
use crate::document::ParsedDocument;
use crate::error::SamlResult;
use crate::types::{AuthnRequest, AuthnRequestDescriptor};
use crate::xml::{minify, render};

/// Builds an unsigned `AuthnRequest` and returns its XML.
///
/// # Errors
///
/// Returns [`crate::SamlError::MalformedInput`] if a descriptor field is empty.
pub async fn build_authn_request(descriptor: &AuthnRequestDescriptor) -> SamlResult<String> {
    let request = AuthnRequest::from_descriptor(descriptor)?;
    let xml = render(&request.to_element())?;
    debug!(request_id = %request.id, issuer = %request.issuer, "built AuthnRequest");
    Ok(xml)
}

/// Builds an `AuthnRequest` and encodes it for the HTTP-Redirect binding:
/// minified XML, raw DEFLATE, base64.
///
/// # Errors
///
/// Returns [`crate::SamlError::MalformedInput`] for an invalid descriptor or
/// [`crate::SamlError::Compression`] if deflating fails.
pub async fn encode_authn_request(descriptor: &AuthnRequestDescriptor) -> SamlResult<String> {
    let xml = build_authn_request(descriptor).await?;
    let encoded = redirect::encode(&minify(&xml))?;
    debug!(encoded_len = encoded.len(), "encoded AuthnRequest");
    Ok(encoded)
}

/// Decodes an HTTP-Redirect encoded `AuthnRequest`.
///
/// # Errors
///
/// Returns [`crate::SamlError::Decode`] for invalid base64, DEFLATE or
/// UTF-8, and [`crate::SamlError::XmlParse`] for malformed XML.
pub async fn decode_authn_request(raw: &str) -> SamlResult<ParsedDocument> {
    let xml = redirect::decode(raw)?;
    let document = ParsedDocument::parse(&xml)?;
    debug!(
        root = %document.root().name,
        id = document.root().attr("ID").unwrap_or_default(),
        "decoded AuthnRequest"
    );
    Ok(document)
}
