//! X.509 signing certificates.
//!
//! A [`Certificate`] keeps the three things the SAML layer needs: the
//! base64 body that goes into `ds:X509Certificate`, the RSA public key used
//! for verification, and the subject name for log lines.

use base64::Engine;

use crate::error::CryptoError;
use crate::pem::{self, CERTIFICATE};

/// `rsaEncryption` algorithm identifier.
const RSA_ENCRYPTION_OID: &str = "1.2.840.113549.1.1.1";

/// A parsed X.509 certificate carrying an RSA public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    body: String,
    public_key: Vec<u8>,
    subject: String,
}

impl Certificate {
    /// Parses a PEM-encoded certificate.
    ///
    /// A bare base64 body without the `BEGIN`/`END` lines is accepted too,
    /// since that is the form found inside `ds:X509Certificate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a certificate or its key is not RSA.
    pub fn from_pem(text: &str) -> Result<Self, CryptoError> {
        let body = if text.contains("-----BEGIN") {
            pem::pem_body(text, CERTIFICATE)?
        } else {
            text.chars().filter(|c| !c.is_whitespace()).collect()
        };

        let der = base64::engine::general_purpose::STANDARD
            .decode(body.as_bytes())
            .map_err(|e| CryptoError::InvalidCertificate(format!("body is not base64: {e}")))?;

        Self::from_der_with_body(der, body)
    }

    /// Parses a DER-encoded certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a certificate or its key is not RSA.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let body = base64::engine::general_purpose::STANDARD.encode(der);
        Self::from_der_with_body(der.to_vec(), body)
    }

    fn from_der_with_body(der: Vec<u8>, body: String) -> Result<Self, CryptoError> {
        use x509_parser::prelude::*;

        let (public_key, subject) = {
            let (_, cert) = X509Certificate::from_der(&der)
                .map_err(|e| CryptoError::InvalidCertificate(format!("failed to parse: {e}")))?;

            let spki = cert.public_key();
            let algorithm = spki.algorithm.algorithm.to_id_string();
            if algorithm != RSA_ENCRYPTION_OID {
                return Err(CryptoError::InvalidCertificate(format!(
                    "unsupported public key algorithm {algorithm}, expected RSA"
                )));
            }

            // The BIT STRING of an RSA SubjectPublicKeyInfo is the PKCS#1 RSAPublicKey.
            (
                spki.subject_public_key.data.to_vec(),
                cert.subject().to_string(),
            )
        };

        Ok(Self {
            der,
            body,
            public_key,
            subject,
        })
    }

    /// Returns the DER encoding.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Returns the base64 body with PEM armour and line breaks removed.
    #[must_use]
    pub fn base64_body(&self) -> &str {
        &self.body
    }

    /// Returns the DER-encoded PKCS#1 `RSAPublicKey`.
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Returns the subject distinguished name.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
