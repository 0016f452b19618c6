//! Fixtures shared by the end-to-end tests.
//!
//! Key material lives in the workspace `testdata/` directory: two unrelated
//! RSA-2048 key pairs, the identity provider's key also in PKCS#1 form.

use saml_message::{AttributeMap, AuthnRequestDescriptor, NameIdFormat, ResponseDescriptor};

/// Identity provider key, PKCS#8.
pub const IDP_KEY: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/idp.key.pem"));
/// Identity provider key, PKCS#1.
pub const IDP_PKCS1_KEY: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/idp.pkcs1.key.pem"));
/// Identity provider certificate.
pub const IDP_CERT: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/idp.cert.pem"));
/// Unrelated key.
pub const OTHER_KEY: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/other.key.pem"));
/// Unrelated certificate.
pub const OTHER_CERT: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../testdata/other.cert.pem"));

/// Installs a test subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("saml_message=debug")
        .with_test_writer()
        .try_init();
}

/// Request from `https://sp.example` to `https://idp.example/sso`.
#[must_use]
pub fn authn_request_descriptor() -> AuthnRequestDescriptor {
    AuthnRequestDescriptor::new(
        "https://sp.example",
        "https://idp.example/sso",
        "https://sp.example/acs",
    )
}

/// Response for `user@example.com` with `role` and `dept` attributes,
/// signed with the identity provider key.
#[must_use]
pub fn response_descriptor() -> ResponseDescriptor {
    ResponseDescriptor {
        issuer: "https://idp.example".to_string(),
        destination: "https://sp.example/acs".to_string(),
        in_response_to: "_0f8e2a6c-request".to_string(),
        name_id: "user@example.com".to_string(),
        name_id_format: NameIdFormat::Email.uri().to_string(),
        audience: "https://sp.example".to_string(),
        attributes: AttributeMap::from([("role", "admin"), ("dept", "eng")]),
        private_key: IDP_KEY.to_string(),
        certificate: IDP_CERT.to_string(),
        assertion_lifetime_secs: saml_message::DEFAULT_ASSERTION_LIFETIME_SECS,
    }
}
