//! SAML Response types.
//!
//! Response messages sent by an identity provider to a service provider.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{
    expect_element, required_attr, required_instant, Assertion, Attribute, AttributeMap,
    AuthnContextClass, AuthnStatement, Conditions, NameId, Status, Subject, SubjectConfirmation,
    SubjectConfirmationData, SAMLP_NS, SAML_NS, SAML_VERSION,
};
use crate::error::{SamlError, SamlResult};
use crate::generator::{self, InstantPrecision};
use crate::xml::{Element, NamespaceScope};

/// Default assertion lifetime in seconds.
pub const DEFAULT_ASSERTION_LIFETIME_SECS: u64 = 600;

fn default_lifetime() -> u64 {
    DEFAULT_ASSERTION_LIFETIME_SECS
}

/// Caller-supplied values for a signed `Response`.
///
/// `private_key` and `certificate` are PEM text and must form a key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseDescriptor {
    /// The identity provider's entity ID.
    #[serde(alias = "issuer")]
    pub issuer: String,

    /// The service provider's assertion consumer service URL.
    #[serde(alias = "destination")]
    pub destination: String,

    /// ID of the `AuthnRequest` being answered.
    #[serde(alias = "in_response_to")]
    pub in_response_to: String,

    /// Subject identifier.
    #[serde(rename = "NameID", alias = "name_id")]
    pub name_id: String,

    /// Name ID format URI.
    #[serde(rename = "Format", alias = "name_id_format")]
    pub name_id_format: String,

    /// Audience the assertion is restricted to.
    #[serde(alias = "audience")]
    pub audience: String,

    /// Subject attributes, emitted in order.
    #[serde(default, alias = "attributes")]
    pub attributes: AttributeMap,

    /// PEM-encoded RSA private key (PKCS#8 or PKCS#1).
    #[serde(alias = "private_key")]
    pub private_key: String,

    /// PEM-encoded X.509 certificate matching `private_key`.
    #[serde(alias = "certificate")]
    pub certificate: String,

    /// How long the assertion and its bearer confirmation stay valid.
    #[serde(default = "default_lifetime", alias = "assertion_lifetime_secs")]
    pub assertion_lifetime_secs: u64,
}

impl ResponseDescriptor {
    /// Checks that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedInput`] naming the first problem found.
    pub fn validate(&self) -> SamlResult<()> {
        for (field, value) in [
            ("Issuer", &self.issuer),
            ("Destination", &self.destination),
            ("InResponseTo", &self.in_response_to),
            ("NameID", &self.name_id),
            ("Format", &self.name_id_format),
            ("Audience", &self.audience),
            ("PrivateKey", &self.private_key),
            ("Certificate", &self.certificate),
        ] {
            if value.trim().is_empty() {
                return Err(SamlError::MalformedInput(format!("{field} is required")));
            }
        }
        if self.attributes.iter().any(|(name, _)| name.trim().is_empty()) {
            return Err(SamlError::MalformedInput(
                "attribute names must not be empty".to_string(),
            ));
        }
        if self.assertion_lifetime_secs == 0 {
            return Err(SamlError::MalformedInput(
                "assertion lifetime must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn lifetime(&self) -> SamlResult<Duration> {
        i64::try_from(self.assertion_lifetime_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| SamlError::MalformedInput("assertion lifetime out of range".to_string()))
    }
}

impl fmt::Debug for ResponseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseDescriptor")
            .field("issuer", &self.issuer)
            .field("destination", &self.destination)
            .field("in_response_to", &self.in_response_to)
            .field("name_id", &self.name_id)
            .field("name_id_format", &self.name_id_format)
            .field("audience", &self.audience)
            .field("attributes", &self.attributes)
            .field("private_key", &"[REDACTED]")
            .field("assertion_lifetime_secs", &self.assertion_lifetime_secs)
            .finish_non_exhaustive()
    }
}

/// SAML Response.
///
/// A response message sent from an identity provider to a service provider
/// containing authentication results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Unique identifier for this response.
    pub id: String,

    /// Version of the SAML protocol.
    pub version: String,

    /// Timestamp when this response was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the identity provider that issued this response.
    pub issuer: Option<String>,

    /// The ID of the request this response is for.
    pub in_response_to: Option<String>,

    /// The URL where this response was sent.
    pub destination: Option<String>,

    /// The status of the response.
    pub status: Status,

    /// The assertions in this response.
    pub assertions: Vec<Assertion>,
}

impl Response {
    /// Creates a success response wrapping one unsigned assertion.
    ///
    /// Response, assertion and authentication instants share one clock
    /// reading at millisecond precision; the assertion expires after the
    /// descriptor's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`SamlError::MalformedInput`] if the descriptor is incomplete.
    pub fn from_descriptor(descriptor: &ResponseDescriptor) -> SamlResult<Self> {
        descriptor.validate()?;

        let now = generator::truncate(generator::now(), InstantPrecision::Millis);
        let expires = now
            .checked_add_signed(descriptor.lifetime()?)
            .ok_or_else(|| SamlError::MalformedInput("assertion lifetime out of range".to_string()))?;

        let subject = Subject::new(NameId {
            value: descriptor.name_id.clone(),
            format: Some(descriptor.name_id_format.clone()),
        })
        .with_confirmation(SubjectConfirmation::bearer().with_data(SubjectConfirmationData {
            in_response_to: Some(descriptor.in_response_to.clone()),
            not_on_or_after: Some(expires),
            recipient: Some(descriptor.destination.clone()),
        }));

        let assertion = Assertion {
            id: generator::new_id(),
            version: SAML_VERSION.to_string(),
            issue_instant: now,
            issuer: descriptor.issuer.clone(),
            subject: Some(subject),
            conditions: Some(Conditions {
                not_before: Some(now),
                not_on_or_after: Some(expires),
                audiences: vec![descriptor.audience.clone()],
            }),
            attributes: descriptor
                .attributes
                .iter()
                .map(|(name, value)| Attribute::single(name, value))
                .collect(),
            authn_statement: Some(AuthnStatement::new(
                now,
                generator::new_id(),
                AuthnContextClass::PasswordProtectedTransport,
            )),
            signed: false,
        };

        Ok(Self {
            id: generator::new_id(),
            version: SAML_VERSION.to_string(),
            issue_instant: now,
            issuer: Some(descriptor.issuer.clone()),
            in_response_to: Some(descriptor.in_response_to.clone()),
            destination: Some(descriptor.destination.clone()),
            status: Status::success(),
            assertions: vec![assertion],
        })
    }

    /// Returns true if this response indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Gets the first assertion if present.
    #[must_use]
    pub fn first_assertion(&self) -> Option<&Assertion> {
        self.assertions.first()
    }

    /// Builds the `samlp:Response` element with unsigned assertions.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("samlp:Response")
            .with_attr("xmlns:samlp", SAMLP_NS)
            .with_attr("ID", &self.id);
        if let Some(in_response_to) = &self.in_response_to {
            element = element.with_attr("InResponseTo", in_response_to);
        }
        element = element.with_attr("Version", &self.version).with_attr(
            "IssueInstant",
            generator::format_instant(self.issue_instant, InstantPrecision::Millis),
        );
        if let Some(destination) = &self.destination {
            element = element.with_attr("Destination", destination);
        }
        if let Some(issuer) = &self.issuer {
            element = element.with_child(
                Element::new("saml:Issuer")
                    .with_attr("xmlns:saml", SAML_NS)
                    .with_text(issuer),
            );
        }
        element = element.with_child(self.status.to_element());
        self.assertions
            .iter()
            .fold(element, |element, assertion| element.with_child(assertion.to_element()))
    }

    /// Reads a `Response` element.
    ///
    /// # Errors
    ///
    /// Returns an error if a required attribute or the `Status` is missing,
    /// or an assertion is malformed.
    pub fn from_element(element: &Element) -> SamlResult<Self> {
        let element = expect_element(element, "Response")?;
        let scope = NamespaceScope::new().enter(element);
        let status = element.child("Status").ok_or_else(|| {
            SamlError::XmlParse(format!("<{}> has no <Status> child", element.name))
        })?;

        Ok(Self {
            id: required_attr(element, "ID")?.to_string(),
            version: required_attr(element, "Version")?.to_string(),
            issue_instant: required_instant(element, "IssueInstant")?,
            issuer: element.child("Issuer").map(Element::text),
            in_response_to: element.attr("InResponseTo").map(String::from),
            destination: element.attr("Destination").map(String::from),
            status: Status::from_element(status)?,
            assertions: element
                .child_elements()
                .filter(|el| el.local_name() == "Assertion")
                .map(|assertion| Assertion::from_element_in(assertion, &scope))
                .collect::<SamlResult<_>>()?,
        })
    }
}
