//! Minimal PEM armour handling.
//!
//! Only the single-block, label-checked form is supported; that is all the
//! SAML layer receives from its callers.

use base64::Engine;

use crate::error::CryptoError;

/// PEM label for X.509 certificates.
pub const CERTIFICATE: &str = "CERTIFICATE";

/// PEM label for PKCS#8 private keys.
pub const PRIVATE_KEY: &str = "PRIVATE KEY";

/// PEM label for PKCS#1 RSA private keys.
pub const RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";

/// Returns the base64 body of a PEM block with the armour and all
/// whitespace removed.
///
/// # Errors
///
/// Returns an error if the `BEGIN`/`END` lines for `label` are missing or
/// out of order.
pub fn pem_body(pem: &str, label: &str) -> Result<String, CryptoError> {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");

    let start = pem
        .find(&begin)
        .map(|pos| pos + begin.len())
        .ok_or_else(|| CryptoError::InvalidPem(format!("missing '{begin}'")))?;
    let end_pos = pem[start..]
        .find(&end)
        .map(|pos| start + pos)
        .ok_or_else(|| CryptoError::InvalidPem(format!("missing '{end}'")))?;

    let body: String = pem[start..end_pos]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if body.is_empty() {
        return Err(CryptoError::InvalidPem(format!("empty {label} block")));
    }
    Ok(body)
}

/// Extracts DER data from a PEM string.
///
/// # Errors
///
/// Returns an error if the armour is missing or the body is not valid base64.
pub fn pem_to_der(pem: &str, label: &str) -> Result<Vec<u8>, CryptoError> {
    let body = pem_body(pem, label)?;
    base64::engine::general_purpose::STANDARD
        .decode(body.as_bytes())
        .map_err(|e| CryptoError::InvalidPem(format!("{label} body is not base64: {e}")))
}

/// Returns the label of the first PEM block in `pem`, if any.
#[must_use]
pub fn pem_label(pem: &str) -> Option<&str> {
    let start = pem.find("-----BEGIN ")? + "-----BEGIN ".len();
    let len = pem[start..].find("-----")?;
    Some(&pem[start..start + len])
}
