//! Fixed protocol values.
//!
//! Namespaces, name ID formats, authentication context classes,
//! status codes and the fixed XML signature algorithm set.

/// Namespace of `saml:` elements.
pub const SAML_NS: &str = "urn:oasis:names:tc:SAML:2.0:assertion";

/// Namespace of `samlp:` elements.
pub const SAMLP_NS: &str = "urn:oasis:names:tc:SAML:2.0:protocol";

/// Namespace of `ds:` elements.
pub const XMLDSIG_NS: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Namespace bound to `xsi:` on attribute values.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Namespace bound to `xs:` on attribute values.
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// The only protocol version produced or accepted.
pub const SAML_VERSION: &str = "2.0";

/// Bearer subject confirmation method.
pub const BEARER: &str = "urn:oasis:names:tc:SAML:2.0:cm:bearer";

// ============================================================================
// Name ID Formats
// ============================================================================

/// SAML Name ID formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameIdFormat {
    /// `nameid-format:unspecified`.
    #[default]
    Unspecified,
    /// `nameid-format:emailAddress`.
    Email,
    /// `nameid-format:entity`.
    Entity,
    /// `nameid-format:persistent`, requested by every AuthnRequest built here.
    Persistent,
    /// `nameid-format:transient`.
    Transient,
}

impl NameIdFormat {
    /// Format URI.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:1.1:nameid-format:unspecified",
            Self::Email => "urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress",
            Self::Entity => "urn:oasis:names:tc:SAML:2.0:nameid-format:entity",
            Self::Persistent => "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent",
            Self::Transient => "urn:oasis:names:tc:SAML:2.0:nameid-format:transient",
        }
    }

    /// Looks up a format by URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [
            Self::Unspecified,
            Self::Email,
            Self::Entity,
            Self::Persistent,
            Self::Transient,
        ]
        .into_iter()
        .find(|format| format.uri() == uri)
    }
}

// ============================================================================
// Authentication Context Classes
// ============================================================================

/// `AuthnContextClassRef` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthnContextClass {
    /// No particular mechanism.
    Unspecified,
    /// Password over an unprotected channel.
    Password,
    /// Password over TLS; used for every assertion built here.
    #[default]
    PasswordProtectedTransport,
    /// Client certificate.
    X509,
    /// Existing SSO session.
    PreviousSession,
}

impl AuthnContextClass {
    /// Class URI.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Unspecified => "urn:oasis:names:tc:SAML:2.0:ac:classes:unspecified",
            Self::Password => "urn:oasis:names:tc:SAML:2.0:ac:classes:Password",
            Self::PasswordProtectedTransport => {
                "urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport"
            }
            Self::X509 => "urn:oasis:names:tc:SAML:2.0:ac:classes:X509",
            Self::PreviousSession => "urn:oasis:names:tc:SAML:2.0:ac:classes:PreviousSession",
        }
    }

    /// Looks up a class by URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [
            Self::Unspecified,
            Self::Password,
            Self::PasswordProtectedTransport,
            Self::X509,
            Self::PreviousSession,
        ]
        .into_iter()
        .find(|class| class.uri() == uri)
    }
}

// ============================================================================
// Status Codes
// ============================================================================

/// `StatusCode` values.
pub mod status_codes {
    /// The request succeeded.
    pub const SUCCESS: &str = "urn:oasis:names:tc:SAML:2.0:status:Success";

    /// The peer's message was at fault.
    pub const REQUESTER: &str = "urn:oasis:names:tc:SAML:2.0:status:Requester";

    /// This side failed.
    pub const RESPONDER: &str = "urn:oasis:names:tc:SAML:2.0:status:Responder";
}

// ============================================================================
// Signature Algorithms
// ============================================================================

/// XML signature algorithm URIs. Only RSA-SHA256 with SHA-256 digests is used.
pub mod algorithms {
    /// `xml-exc-c14n#`, comments dropped.
    pub const EXCLUSIVE_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

    /// RSA PKCS#1 v1.5 over SHA-256.
    pub const RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";

    /// Reference digest.
    pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";

    /// Enveloped signature transform.
    pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
}
