//! HTTP-POST message encoding (base64 only).

use base64::Engine;

use crate::error::SamlResult;

use super::{decode_base64, utf8};

/// Base64-encodes the exact bytes of a message.
///
/// Signed messages must not be re-serialized before this step.
#[must_use]
pub fn encode(xml: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(xml.as_bytes())
}

/// Base64-decodes a message.
///
/// # Errors
///
/// Returns [`crate::SamlError::Decode`] for invalid base64 or non-UTF-8 content.
pub fn decode(raw: &str) -> SamlResult<String> {
    utf8(decode_base64(raw)?)
}
