//! # saml-crypto
//!
//! Cryptographic primitives for SAML message signing using aws-lc-rs.
//!
//! The SAML layer signs with exactly one algorithm pair:
//! - **Digest** - SHA-256
//! - **Signature** - RSA PKCS#1 v1.5 with SHA-256
//!
//! Key material arrives as PEM text. Private keys may be PKCS#8
//! (`PRIVATE KEY`) or PKCS#1 (`RSA PRIVATE KEY`); certificates are X.509
//! (`CERTIFICATE`).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod certificate;
pub mod error;
pub mod hash;
pub mod pem;
pub mod rsa;

pub use certificate::Certificate;
pub use error::CryptoError;
pub use hash::sha256;
pub use rsa::{rsa_verify_sha256, RsaSigningKey};
