//! XML Signature creation.
//!
//! Signs the `Assertion` inside a SAML document with an enveloped
//! signature placed directly after the assertion's `Issuer`.

use base64::Engine;
use saml_crypto::{rsa_verify_sha256, Certificate, RsaSigningKey};
use tracing::{debug, warn};

use crate::error::{SamlError, SamlResult};
use crate::xml::{Element, Node};

use super::{canonical_signed_info, child_index, reference_digest, signature_element, signed_info_element};

/// XML document signer.
///
/// Holds the identity provider's private key and the certificate that is
/// embedded in every signature it produces.
pub struct XmlSigner {
    key: RsaSigningKey,
    certificate: Certificate,
}

impl XmlSigner {
    /// Creates a signer from a key and certificate already loaded.
    #[must_use]
    pub fn new(key: RsaSigningKey, certificate: Certificate) -> Self {
        Self { key, certificate }
    }

    /// Creates a signer from PEM-encoded key and certificate.
    ///
    /// The key may be PKCS#8 or PKCS#1.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Signing`] if either PEM cannot be loaded.
    pub fn from_pem(private_key_pem: &str, certificate_pem: &str) -> SamlResult<Self> {
        let key = RsaSigningKey::from_pem(private_key_pem)?;
        let certificate = Certificate::from_pem(certificate_pem)?;
        Ok(Self::new(key, certificate))
    }

    /// The certificate embedded in produced signatures.
    #[must_use]
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Signs the first `Assertion` in `document`.
    ///
    /// The document is consumed so that a failed signing never leaves a
    /// half-built signature behind.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::Signing`] if there is no assertion, the
    /// assertion lacks an `ID` or `Issuer`, or the private key does not
    /// belong to the certificate.
    pub fn sign(&self, mut document: Element) -> SamlResult<Element> {
        let assertion_path = document
            .find_path("Assertion")
            .ok_or_else(|| SamlError::Signing("document has no Assertion to sign".to_string()))?;
        let assertion = document
            .at_path(&assertion_path)
            .ok_or_else(|| SamlError::Signing("assertion path is stale".to_string()))?;
        let id = assertion
            .attr("ID")
            .ok_or_else(|| SamlError::Signing("assertion has no ID".to_string()))?
            .to_string();
        let issuer_index = child_index(assertion, "Issuer")
            .ok_or_else(|| SamlError::Signing("assertion has no Issuer".to_string()))?;

        let digest = reference_digest(&document, &assertion_path, None)?;

        let signature_index = issuer_index + 1;
        let assertion = document
            .at_path_mut(&assertion_path)
            .ok_or_else(|| SamlError::Signing("assertion path is stale".to_string()))?;
        assertion.children.insert(
            signature_index,
            Node::Element(signature_element(signed_info_element(&id, &digest))),
        );

        let mut signature_path = assertion_path;
        signature_path.push(signature_index);
        let mut signed_info_path = signature_path.clone();
        signed_info_path.push(0);

        let canonical = canonical_signed_info(&document, &signed_info_path)?;
        let signature_value = self.key.sign_sha256(canonical.as_bytes())?;

        if !rsa_verify_sha256(self.certificate.public_key(), canonical.as_bytes(), &signature_value) {
            warn!(
                subject = %self.certificate.subject(),
                "signing key does not match certificate"
            );
            return Err(SamlError::Signing(
                "private key does not match certificate".to_string(),
            ));
        }

        let signature = document
            .at_path_mut(&signature_path)
            .ok_or_else(|| SamlError::Signing("signature path is stale".to_string()))?;
        signature.children.push(Node::Element(
            Element::new("ds:SignatureValue")
                .with_text(base64::engine::general_purpose::STANDARD.encode(&signature_value)),
        ));
        signature.children.push(Node::Element(
            Element::new("ds:KeyInfo").with_child(
                Element::new("ds:X509Data").with_child(
                    Element::new("ds:X509Certificate").with_text(self.certificate.base64_body()),
                ),
            ),
        ));

        debug!(assertion_id = %id, key_bits = self.key.modulus_bits(), "assertion signed");
        Ok(document)
    }
}

impl std::fmt::Debug for XmlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlSigner")
            .field("key", &"<redacted>")
            .field("certificate", &self.certificate.subject())
            .finish()
    }
}
