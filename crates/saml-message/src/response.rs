//! Response operations.
//!
//! Responses travel over the HTTP-POST binding with a signed assertion.
//! The signed XML is encoded byte for byte; any re-serialization between
//! signing and encoding would break the signature.

use tracing::{debug, warn};

use crate::bindings::post;
use crate::document::ParsedDocument;
use crate::error::{SamlError, SamlResult};
use crate::signature::{XmlSignatureValidator, XmlSigner};
use crate::types::{Response, ResponseDescriptor};
use crate::xml::render;

/// Builds a success `Response` with one signed assertion and returns its XML.
///
/// # Errors
///
/// Returns [`SamlError::MalformedInput`] for an incomplete descriptor and
/// [`SamlError::Signing`] if the key material is invalid or the key does
/// not match the certificate.
pub async fn build_response(descriptor: &ResponseDescriptor) -> SamlResult<String> {
    descriptor.validate()?;
    let signer = XmlSigner::from_pem(&descriptor.private_key, &descriptor.certificate)?;

    let response = Response::from_descriptor(descriptor)?;
    let signed = signer.sign(response.to_element())?;
    let xml = render(&signed)?;

    debug!(
        response_id = %response.id,
        assertion_id = response.first_assertion().map(|a| a.id.as_str()).unwrap_or_default(),
        in_response_to = %descriptor.in_response_to,
        "built signed Response"
    );
    Ok(xml)
}

/// Builds a signed `Response` and base64-encodes it for the HTTP-POST binding.
///
/// # Errors
///
/// Same as [`build_response`].
pub async fn encode_response(descriptor: &ResponseDescriptor) -> SamlResult<String> {
    let xml = build_response(descriptor).await?;
    let encoded = post::encode(&xml);
    debug!(encoded_len = encoded.len(), "encoded Response");
    Ok(encoded)
}

/// Decodes an HTTP-POST encoded `Response` without checking its signature.
///
/// # Errors
///
/// Returns [`SamlError::Decode`] for invalid base64 or UTF-8 and
/// [`SamlError::XmlParse`] for malformed XML.
pub async fn decode_response(raw: &str) -> SamlResult<ParsedDocument> {
    let xml = post::decode(raw)?;
    let document = ParsedDocument::parse(&xml)?;
    debug!(
        root = %document.root().name,
        id = document.root().attr("ID").unwrap_or_default(),
        "decoded Response"
    );
    Ok(document)
}

/// Verifies the assertion signature of a decoded `Response` against
/// `certificate_pem` and hands the document back unchanged.
///
/// # Errors
///
/// Returns [`SamlError::MalformedInput`] if the certificate cannot be
/// parsed, or [`SamlError::SignatureInvalid`] listing every discrepancy.
pub async fn verify_response(
    document: ParsedDocument,
    certificate_pem: &str,
) -> SamlResult<ParsedDocument> {
    let validator = XmlSignatureValidator::from_pem(certificate_pem)?;

    match validator.validate(document.root()) {
        Ok(signature) => {
            debug!(reference = %signature.reference_uri, "Response signature verified");
            Ok(document)
        }
        Err(issues) => {
            warn!(
                id = document.root().attr("ID").unwrap_or_default(),
                issues = %SamlError::SignatureInvalid(issues.clone()),
                "Response signature rejected"
            );
            Err(SamlError::SignatureInvalid(issues))
        }
    }
}
