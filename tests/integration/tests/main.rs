//! End-to-end tests for the SAML message layer.
//!
//! Every scenario goes through the public operations only: build, encode,
//! decode, verify.

mod authn_request;
mod common;
mod response;
mod verification;
