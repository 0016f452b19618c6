//! Document helpers for the end-to-end tests.

use anyhow::Context;
use saml_integration_tests::{init_tracing, response_descriptor, IDP_CERT};
use saml_message::xml::Node;
use saml_message::{
    decode_response, encode_response, verify_response, ErrorKind, ParsedDocument, SamlError,
    VerificationIssue,
};

/// Builds, encodes and decodes the standard response.
pub async fn signed_response() -> anyhow::Result<ParsedDocument> {
    init_tracing();
    let encoded = encode_response(&response_descriptor()).await?;
    Ok(decode_response(&encoded).await?)
}

/// Replaces the last character of the first `local` element's text.
pub fn tamper_text(document: &ParsedDocument, local: &str) -> anyhow::Result<ParsedDocument> {
    let mut root = document.clone().into_root();
    let path = root.find_path(local).with_context(|| format!("no <{local}>"))?;
    let element = root.at_path_mut(&path).context("stale path")?;

    let mut text: Vec<char> = element.text().chars().collect();
    let last = text.last_mut().with_context(|| format!("<{local}> has no text"))?;
    *last = if *last == 'x' { 'y' } else { 'x' };
    element.children = vec![Node::Text(text.into_iter().collect())];
    Ok(ParsedDocument::new(root))
}

/// Replaces one attribute value on the first `local` element.
pub fn tamper_attr(
    document: &ParsedDocument,
    local: &str,
    attr: &str,
    value: &str,
) -> anyhow::Result<ParsedDocument> {
    let mut root = document.clone().into_root();
    let path = root.find_path(local).with_context(|| format!("no <{local}>"))?;
    let element = root.at_path_mut(&path).context("stale path")?;
    let slot = element
        .attributes
        .iter_mut()
        .find(|(name, _)| name == attr)
        .with_context(|| format!("<{local}> has no {attr}"))?;
    slot.1 = value.to_string();
    Ok(ParsedDocument::new(root))
}

/// Verifies with the identity provider certificate, expecting failure.
pub async fn rejection(document: ParsedDocument) -> anyhow::Result<Vec<VerificationIssue>> {
    match verify_response(document, IDP_CERT).await {
        Ok(_) => anyhow::bail!("tampered document verified"),
        Err(err @ SamlError::SignatureInvalid(_)) => {
            assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
            Ok(err.issues().to_vec())
        }
        Err(other) => Err(other.into()),
    }
}
