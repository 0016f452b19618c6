//! RSA PKCS#1 v1.5 signing and verification with SHA-256.
//!
//! This is the only signature scheme the SAML layer uses
//! (`http://www.w3.org/2001/04/xmldsig-more#rsa-sha256`).

use aws_lc_rs::{
    rand::SystemRandom,
    signature::{self, RsaKeyPair, UnparsedPublicKey},
};

use crate::error::CryptoError;
use crate::pem::{self, PRIVATE_KEY, RSA_PRIVATE_KEY};

/// RSA private key used to sign `SignedInfo` blocks.
pub struct RsaSigningKey {
    key_pair: RsaKeyPair,
}

impl RsaSigningKey {
    /// Creates a signing key from a PEM-encoded private key.
    ///
    /// Accepts PKCS#8 (`PRIVATE KEY`) and PKCS#1 (`RSA PRIVATE KEY`) blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the PEM is malformed or does not hold an RSA key.
    pub fn from_pem(pem_text: &str) -> Result<Self, CryptoError> {
        match pem::pem_label(pem_text) {
            Some(PRIVATE_KEY) => Self::from_pkcs8(&pem::pem_to_der(pem_text, PRIVATE_KEY)?),
            Some(RSA_PRIVATE_KEY) => Self::from_der(&pem::pem_to_der(pem_text, RSA_PRIVATE_KEY)?),
            Some(other) => Err(CryptoError::InvalidKey(format!(
                "unsupported PEM block '{other}', expected an RSA private key"
            ))),
            None => Err(CryptoError::InvalidPem("no PEM block found".to_string())),
        }
    }

    /// Creates a signing key from a PKCS#8 DER-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid.
    pub fn from_pkcs8(pkcs8_der: &[u8]) -> Result<Self, CryptoError> {
        let key_pair = RsaKeyPair::from_pkcs8(pkcs8_der)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid RSA PKCS#8 key: {e}")))?;
        Ok(Self { key_pair })
    }

    /// Creates a signing key from a PKCS#1 DER-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let key_pair = RsaKeyPair::from_der(der)
            .map_err(|e| CryptoError::InvalidKey(format!("Invalid RSA DER key: {e}")))?;
        Ok(Self { key_pair })
    }

    /// Returns the modulus length in bits.
    #[must_use]
    pub fn modulus_bits(&self) -> usize {
        self.key_pair.public_modulus_len() * 8
    }

    /// Signs `data` with RSA PKCS#1 v1.5 / SHA-256.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn sign_sha256(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let rng = SystemRandom::new();
        let mut sig = vec![0u8; self.key_pair.public_modulus_len()];

        self.key_pair
            .sign(&signature::RSA_PKCS1_SHA256, &rng, data, &mut sig)
            .map_err(|e| CryptoError::Signing(format!("RSA signing failed: {e}")))?;

        Ok(sig)
    }
}

impl std::fmt::Debug for RsaSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSigningKey")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

/// Verifies an RSA PKCS#1 v1.5 / SHA-256 signature.
///
/// `public_key_der` is a DER-encoded PKCS#1 `RSAPublicKey`, as returned by
/// [`crate::Certificate::public_key`]. Any failure, including a malformed
/// key, yields `false`.
#[must_use]
pub fn rsa_verify_sha256(public_key_der: &[u8], data: &[u8], sig: &[u8]) -> bool {
    UnparsedPublicKey::new(&signature::RSA_PKCS1_2048_8192_SHA256, public_key_der)
        .verify(data, sig)
        .is_ok()
}
