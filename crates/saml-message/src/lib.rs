//! SAML 2.0 Web Browser SSO message layer.
//!
//! Builds, encodes, decodes and verifies the two messages of the SP-initiated
//! flow:
//!
//! - **AuthnRequest** - unsigned, minified, DEFLATE + base64 for the
//!   HTTP-Redirect binding
//! - **Response** - one assertion with an enveloped RSA-SHA256 signature,
//!   base64 for the HTTP-POST binding
//!
//! # Architecture
//!
//! - [`xml`] - element tree, renderer, parser and exclusive C14N
//! - [`generator`] - message identifiers and timestamps
//! - [`types`] - typed SAML elements and caller descriptors
//! - [`signature`] - XML-DSig signing and validation
//! - [`bindings`] - Redirect and POST message encodings
//! - [`request`] / [`response`] - the public operations
//! - [`error`] - error types
//!
//! # Example
//!
//! ```rust,ignore
//! use saml_message::{decode_authn_request, encode_authn_request, AuthnRequestDescriptor};
//!
//! let descriptor = AuthnRequestDescriptor::new(
//!     "https://sp.example",
//!     "https://idp.example/sso",
//!     "https://sp.example/acs",
//! );
//! let encoded = encode_authn_request(&descriptor).await?;
//! let request = decode_authn_request(&encoded).await?.authn_request()?;
//! assert_eq!(request.issuer, "https://sp.example");
//! ```
//!
//! # SAML Specifications
//!
//! - [SAML 2.0 Core](https://docs.oasis-open.org/security/saml/v2.0/saml-core-2.0-os.pdf)
//! - [SAML 2.0 Bindings](https://docs.oasis-open.org/security/saml/v2.0/saml-bindings-2.0-os.pdf)
//! - [XML Signature](https://www.w3.org/TR/xmldsig-core1/)
//! - [Exclusive XML Canonicalization](https://www.w3.org/TR/xml-exc-c14n/)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bindings;
pub mod document;
pub mod error;
pub mod generator;
pub mod request;
pub mod response;
pub mod signature;
pub mod types;
pub mod xml;

pub use document::ParsedDocument;
pub use error::{ErrorKind, SamlError, SamlResult};
pub use request::{build_authn_request, decode_authn_request, encode_authn_request};
pub use response::{build_response, decode_response, encode_response, verify_response};
pub use signature::{VerificationIssue, XmlSignature, XmlSignatureValidator, XmlSigner};
pub use types::*;
