//! XML Signature validation.
//!
//! Checks the enveloped signature on a document's single `Assertion`
//! against a trusted certificate, collecting every problem found rather
//! than stopping at the first.

use std::collections::BTreeSet;
use std::fmt;

use base64::Engine;
use saml_crypto::{rsa_verify_sha256, Certificate};

use crate::error::{SamlError, SamlResult};
use crate::xml::{scope_at, Element};

use super::{canonical_signed_info, child_index, reference_digest, signature_index, XmlSignature};

/// One reason a signed document failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationIssue {
    /// The document contains no `Assertion`.
    MissingAssertion,
    /// The assertion carries no `Signature` child.
    MissingSignature,
    /// The `Signature` block is incomplete or undecodable.
    MalformedSignature(String),
    /// An algorithm outside the supported set is named.
    UnsupportedAlgorithm(String),
    /// The reference does not point at the assertion.
    ReferenceMismatch {
        /// `#` followed by the assertion's ID.
        expected: String,
        /// The reference URI found.
        actual: String,
    },
    /// The same `ID` value appears on more than one element.
    DuplicateId(String),
    /// More than one `Assertion` is present.
    MultipleAssertions(usize),
    /// The recomputed assertion digest differs from `DigestValue`.
    DigestMismatch,
    /// `SignatureValue` does not verify against the certificate.
    SignatureMismatch,
}

impl fmt::Display for VerificationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAssertion => f.write_str("no assertion found"),
            Self::MissingSignature => f.write_str("assertion is not signed"),
            Self::MalformedSignature(detail) => write!(f, "malformed signature: {detail}"),
            Self::UnsupportedAlgorithm(uri) => write!(f, "unsupported algorithm: {uri}"),
            Self::ReferenceMismatch { expected, actual } => {
                write!(f, "reference {actual} does not match assertion {expected}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate ID {id}"),
            Self::MultipleAssertions(count) => write!(f, "expected one assertion, found {count}"),
            Self::DigestMismatch => f.write_str("digest does not match assertion content"),
            Self::SignatureMismatch => {
                f.write_str("signature value does not verify against the certificate")
            }
        }
    }
}

/// XML signature validator bound to one trusted certificate.
#[derive(Debug, Clone)]
pub struct XmlSignatureValidator {
    certificate: Certificate,
}

impl XmlSignatureValidator {
    /// Creates a validator trusting `certificate`.
    #[must_use]
    pub fn new(certificate: Certificate) -> Self {
        Self { certificate }
    }

    /// Creates a validator from a PEM certificate (or its bare base64 body).
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedInput`] if the certificate cannot be parsed.
    pub fn from_pem(certificate_pem: &str) -> SamlResult<Self> {
        Certificate::from_pem(certificate_pem)
            .map(Self::new)
            .map_err(|e| SamlError::MalformedInput(format!("verification certificate: {e}")))
    }

    /// Validates the assertion signature in `document`.
    ///
    /// # Errors
    ///
    /// Returns every [`VerificationIssue`] found.
    pub fn validate(&self, document: &Element) -> Result<XmlSignature, Vec<VerificationIssue>> {
        let mut issues = Vec::new();

        let assertions = document
            .descendants()
            .into_iter()
            .filter(|el| el.local_name() == "Assertion")
            .count();
        if assertions == 0 {
            return Err(vec![VerificationIssue::MissingAssertion]);
        }
        if assertions > 1 {
            issues.push(VerificationIssue::MultipleAssertions(assertions));
        }
        issues.extend(duplicate_ids(document).into_iter().map(VerificationIssue::DuplicateId));

        let Some(assertion_path) = document.find_path("Assertion") else {
            return Err(vec![VerificationIssue::MissingAssertion]);
        };
        let Some(assertion) = document.at_path(&assertion_path) else {
            return Err(vec![VerificationIssue::MissingAssertion]);
        };

        let scope = match scope_at(document, &assertion_path) {
            Ok(scope) => scope,
            Err(e) => {
                issues.push(VerificationIssue::MalformedSignature(detail(e)));
                return Err(issues);
            }
        };
        let Some(signature_child) = signature_index(assertion, &scope) else {
            issues.push(VerificationIssue::MissingSignature);
            return Err(issues);
        };
        let mut signature_path = assertion_path.clone();
        signature_path.push(signature_child);
        let Some(signature_element) = document.at_path(&signature_path) else {
            issues.push(VerificationIssue::MissingSignature);
            return Err(issues);
        };

        let signature = match XmlSignature::from_element(signature_element) {
            Ok(signature) => signature,
            Err(e) => {
                issues.push(VerificationIssue::MalformedSignature(detail(e)));
                return Err(issues);
            }
        };

        let unsupported = signature.unsupported_algorithms();
        if !unsupported.is_empty() {
            issues.extend(unsupported.into_iter().map(VerificationIssue::UnsupportedAlgorithm));
            return Err(issues);
        }

        match assertion.attr("ID") {
            Some(id) => {
                let expected = format!("#{id}");
                if signature.reference_uri != expected {
                    issues.push(VerificationIssue::ReferenceMismatch {
                        expected,
                        actual: signature.reference_uri.clone(),
                    });
                }
            }
            None => issues.push(VerificationIssue::MalformedSignature(
                "assertion has no ID".to_string(),
            )),
        }

        match reference_digest(document, &assertion_path, Some(signature_child)) {
            Ok(digest) if digest == signature.digest_value => {}
            Ok(_) => issues.push(VerificationIssue::DigestMismatch),
            Err(e) => issues.push(VerificationIssue::MalformedSignature(detail(e))),
        }

        if let Err(issue) = self.check_signature_value(document, signature_path, signature_element, &signature) {
            issues.push(issue);
        }

        if issues.is_empty() {
            Ok(signature)
        } else {
            Err(issues)
        }
    }

    fn check_signature_value(
        &self,
        document: &Element,
        mut signed_info_path: Vec<usize>,
        signature_element: &Element,
        signature: &XmlSignature,
    ) -> Result<(), VerificationIssue> {
        let signed_info_index = child_index(signature_element, "SignedInfo").ok_or_else(|| {
            VerificationIssue::MalformedSignature("Signature has no SignedInfo".to_string())
        })?;
        signed_info_path.push(signed_info_index);

        let canonical = canonical_signed_info(document, &signed_info_path)
            .map_err(|e| VerificationIssue::MalformedSignature(detail(e)))?;
        let value = base64::engine::general_purpose::STANDARD
            .decode(&signature.signature_value)
            .map_err(|e| {
                VerificationIssue::MalformedSignature(format!("SignatureValue is not base64: {e}"))
            })?;

        if rsa_verify_sha256(self.certificate.public_key(), canonical.as_bytes(), &value) {
            Ok(())
        } else {
            Err(VerificationIssue::SignatureMismatch)
        }
    }
}

/// Returns each `ID` value used by more than one element.
fn duplicate_ids(document: &Element) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for id in document.descendants().into_iter().filter_map(|el| el.attr("ID")) {
        if !seen.insert(id) {
            duplicates.insert(id.to_string());
        }
    }
    duplicates.into_iter().collect()
}

fn detail(error: SamlError) -> String {
    match error {
        SamlError::XmlParse(message) => message,
        other => other.to_string(),
    }
}
