//! SAML transport encodings.
//!
//! The message-encoding half of the two SAML 2.0 browser bindings:
//!
//! - **HTTP-Redirect** - raw DEFLATE, then base64
//! - **HTTP-POST** - base64 of the exact XML bytes
//!
//! URL construction and HTML form handling belong to the hosting
//! application.

pub mod post;
pub mod redirect;

use base64::Engine;

use crate::error::SamlResult;

/// Decodes base64, ignoring whitespace and line breaks inserted by
/// form encoders.
pub(crate) fn decode_base64(raw: &str) -> SamlResult<Vec<u8>> {
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}

/// Converts decoded bytes to a string.
pub(crate) fn utf8(bytes: Vec<u8>) -> SamlResult<String> {
    String::from_utf8(bytes)
        .map_err(|e| crate::error::SamlError::Decode(format!("message is not UTF-8: {e}")))
}
