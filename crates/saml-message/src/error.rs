//! SAML error types.
//!
//! Every public operation returns [`SamlResult`]. Failures are grouped into
//! a small set of [`ErrorKind`]s so callers can branch on the class of
//! problem without matching message text.

use thiserror::Error;

use crate::signature::VerificationIssue;
use crate::types::status_codes;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML message-layer errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// A required descriptor field is missing or empty.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An element tree cannot be serialized.
    #[error("malformed element tree: {0}")]
    MalformedTree(String),

    /// DEFLATE compression failed.
    #[error("compression error: {0}")]
    Compression(String),

    /// Base64, inflate or UTF-8 decoding failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// XML is not well-formed or lacks an expected element.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Key material is invalid or the private key does not match the certificate.
    #[error("signature creation failed: {0}")]
    Signing(String),

    /// XML signature verification failed.
    #[error("signature validation failed: {}", join_issues(.0))]
    SignatureInvalid(Vec<VerificationIssue>),
}

/// Coarse classification of a [`SamlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-supplied values or trees are unusable.
    MalformedInput,
    /// Compression, decompression or base64 failure.
    Encoding,
    /// XML not well-formed.
    Parse,
    /// Key material invalid or mismatched.
    Signing,
    /// Verification failure.
    SignatureInvalid,
}

fn join_issues(issues: &[VerificationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SamlError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) | Self::MalformedTree(_) => ErrorKind::MalformedInput,
            Self::Compression(_) | Self::Decode(_) => ErrorKind::Encoding,
            Self::XmlParse(_) => ErrorKind::Parse,
            Self::Signing(_) => ErrorKind::Signing,
            Self::SignatureInvalid(_) => ErrorKind::SignatureInvalid,
        }
    }

    /// Returns the verification discrepancies, if this is a verification failure.
    #[must_use]
    pub fn issues(&self) -> &[VerificationIssue] {
        match self {
            Self::SignatureInvalid(issues) => issues,
            _ => &[],
        }
    }

    /// Returns the SAML status code for this error.
    ///
    /// Problems with what the peer sent map to `Requester`; problems with
    /// our own key material or tree construction map to `Responder`.
    #[must_use]
    pub const fn status_code(&self) -> &'static str {
        match self {
            Self::Decode(_) | Self::XmlParse(_) | Self::SignatureInvalid(_) => {
                status_codes::REQUESTER
            }
            Self::MalformedInput(_)
            | Self::MalformedTree(_)
            | Self::Compression(_)
            | Self::Signing(_) => status_codes::RESPONDER,
        }
    }
}

impl From<quick_xml::Error> for SamlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlParse(err.to_string())
    }
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64: {err}"))
    }
}

impl From<saml_crypto::CryptoError> for SamlError {
    fn from(err: saml_crypto::CryptoError) -> Self {
        Self::Signing(err.to_string())
    }
}
