//! SAML AuthnRequest types.
//!
//! Authentication request message sent by a service provider to an identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    expect_element, required_attr, required_child, required_instant, NameIdPolicy, SAMLP_NS,
    SAML_NS, SAML_VERSION,
};
use crate::error::{SamlError, SamlResult};
use crate::generator::{self, InstantPrecision};
use crate::xml::Element;

/// Caller-supplied values for an `AuthnRequest`.
///
/// Field names follow the SAML attribute names when deserialized, with
/// snake_case aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthnRequestDescriptor {
    /// Where the identity provider should deliver its response.
    #[serde(
        rename = "AssertionConsumerServiceURL",
        alias = "assertion_consumer_service_url"
    )]
    pub assertion_consumer_service_url: String,

    /// The identity provider's SSO endpoint.
    #[serde(alias = "destination")]
    pub destination: String,

    /// The service provider's entity ID.
    #[serde(alias = "issuer")]
    pub issuer: String,
}

impl AuthnRequestDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        destination: impl Into<String>,
        assertion_consumer_service_url: impl Into<String>,
    ) -> Self {
        Self {
            assertion_consumer_service_url: assertion_consumer_service_url.into(),
            destination: destination.into(),
            issuer: issuer.into(),
        }
    }

    /// Checks that every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedInput`] naming the first empty field.
    pub fn validate(&self) -> SamlResult<()> {
        for (field, value) in [
            ("AssertionConsumerServiceURL", &self.assertion_consumer_service_url),
            ("Destination", &self.destination),
            ("Issuer", &self.issuer),
        ] {
            if value.trim().is_empty() {
                return Err(SamlError::MalformedInput(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// SAML Authentication Request.
///
/// An authentication request message sent from a service provider to an
/// identity provider requesting authentication of a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthnRequest {
    /// Unique identifier for this request.
    pub id: String,

    /// Version of the SAML protocol (always "2.0" when built here).
    pub version: String,

    /// Timestamp when this request was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the service provider issuing the request.
    pub issuer: String,

    /// The URL where the request is sent.
    pub destination: Option<String>,

    /// The URL where the response should be sent.
    pub assertion_consumer_service_url: Option<String>,

    /// Name ID policy constraints.
    pub name_id_policy: Option<NameIdPolicy>,
}

impl AuthnRequest {
    /// Creates a request with a fresh ID and the current instant.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedInput`] if a descriptor field is empty.
    pub fn from_descriptor(descriptor: &AuthnRequestDescriptor) -> SamlResult<Self> {
        descriptor.validate()?;
        Ok(Self {
            id: generator::new_id(),
            version: SAML_VERSION.to_string(),
            issue_instant: generator::truncate(generator::now(), InstantPrecision::Seconds),
            issuer: descriptor.issuer.clone(),
            destination: Some(descriptor.destination.clone()),
            assertion_consumer_service_url: Some(descriptor.assertion_consumer_service_url.clone()),
            name_id_policy: Some(NameIdPolicy::persistent()),
        })
    }

    /// Builds the `samlp:AuthnRequest` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("samlp:AuthnRequest");
        if let Some(acs) = &self.assertion_consumer_service_url {
            element = element.with_attr("AssertionConsumerServiceURL", acs);
        }
        if let Some(destination) = &self.destination {
            element = element.with_attr("Destination", destination);
        }
        element = element
            .with_attr("ID", &self.id)
            .with_attr(
                "IssueInstant",
                generator::format_instant(self.issue_instant, InstantPrecision::Seconds),
            )
            .with_attr("Version", &self.version)
            .with_attr("xmlns:saml", SAML_NS)
            .with_attr("xmlns:samlp", SAMLP_NS)
            .with_child(Element::new("saml:Issuer").with_text(&self.issuer));
        if let Some(policy) = &self.name_id_policy {
            element = element.with_child(policy.to_element());
        }
        element
    }

    /// Reads an `AuthnRequest` element.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::XmlParse`] if a required attribute or the
    /// `Issuer` is missing.
    pub fn from_element(element: &Element) -> SamlResult<Self> {
        let element = expect_element(element, "AuthnRequest")?;
        Ok(Self {
            id: required_attr(element, "ID")?.to_string(),
            version: required_attr(element, "Version")?.to_string(),
            issue_instant: required_instant(element, "IssueInstant")?,
            issuer: required_child(element, "Issuer")?.text(),
            destination: element.attr("Destination").map(String::from),
            assertion_consumer_service_url: element
                .attr("AssertionConsumerServiceURL")
                .map(String::from),
            name_id_policy: element
                .child("NameIDPolicy")
                .map(NameIdPolicy::from_element)
                .transpose()?,
        })
    }
}
