//! SAML Assertion types.
//!
//! Assertions contain statements about a subject made by an issuer.

use chrono::{DateTime, Utc};

use super::{
    expect_element, optional_instant, required_attr, required_child, required_instant,
    AuthnContextClass, NameId, BEARER, SAML_NS, XSI_NS, XS_NS,
};
use crate::error::SamlResult;
use crate::generator::{format_instant, InstantPrecision};
use crate::signature::signature_index;
use crate::xml::{Element, NamespaceScope};

fn instant(time: DateTime<Utc>) -> String {
    format_instant(time, InstantPrecision::Millis)
}

/// SAML Assertion.
///
/// A package of information that supplies one or more statements made
/// by a SAML authority (the issuer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    /// Unique identifier for this assertion.
    pub id: String,

    /// Version of the SAML protocol.
    pub version: String,

    /// Timestamp when this assertion was issued.
    pub issue_instant: DateTime<Utc>,

    /// The entity ID of the identity provider that issued this assertion.
    pub issuer: String,

    /// The subject of this assertion.
    pub subject: Option<Subject>,

    /// Conditions that must be evaluated for the assertion to be valid.
    pub conditions: Option<Conditions>,

    /// Attributes about the subject, in document order.
    pub attributes: Vec<Attribute>,

    /// Authentication statement describing how the subject authenticated.
    pub authn_statement: Option<AuthnStatement>,

    /// Whether the parsed assertion carries a `Signature` element.
    pub signed: bool,
}

impl Assertion {
    /// Builds the unsigned `saml:Assertion` element.
    ///
    /// The `AttributeStatement` is omitted when there are no attributes.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("saml:Assertion")
            .with_attr("xmlns:saml", SAML_NS)
            .with_attr("ID", &self.id)
            .with_attr("Version", &self.version)
            .with_attr("IssueInstant", instant(self.issue_instant))
            .with_child(Element::new("saml:Issuer").with_text(&self.issuer));

        if let Some(subject) = &self.subject {
            element = element.with_child(subject.to_element());
        }
        if let Some(conditions) = &self.conditions {
            element = element.with_child(conditions.to_element());
        }
        if !self.attributes.is_empty() {
            let statement = self.attributes.iter().fold(
                Element::new("saml:AttributeStatement")
                    .with_attr("xmlns:xs", XS_NS)
                    .with_attr("xmlns:xsi", XSI_NS),
                |statement, attribute| statement.with_child(attribute.to_element()),
            );
            element = element.with_child(statement);
        }
        if let Some(statement) = &self.authn_statement {
            element = element.with_child(statement.to_element());
        }
        element
    }

    /// Reads an `Assertion` element.
    ///
    /// # Errors
    ///
    /// Returns an error if a required attribute, the `Issuer`, or a nested
    /// statement is missing or malformed.
    pub fn from_element(element: &Element) -> SamlResult<Self> {
        Self::from_element_in(element, &NamespaceScope::new())
    }

    /// Reads an `Assertion` element whose ancestors declare `inherited`.
    pub(crate) fn from_element_in(element: &Element, inherited: &NamespaceScope) -> SamlResult<Self> {
        let element = expect_element(element, "Assertion")?;

        let attributes = match element.child("AttributeStatement") {
            Some(statement) => statement
                .child_elements()
                .filter(|el| el.local_name() == "Attribute")
                .map(Attribute::from_element)
                .collect::<SamlResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            id: required_attr(element, "ID")?.to_string(),
            version: required_attr(element, "Version")?.to_string(),
            issue_instant: required_instant(element, "IssueInstant")?,
            issuer: required_child(element, "Issuer")?.text(),
            subject: element.child("Subject").map(Subject::from_element).transpose()?,
            conditions: element
                .child("Conditions")
                .map(Conditions::from_element)
                .transpose()?,
            attributes,
            authn_statement: element
                .child("AuthnStatement")
                .map(AuthnStatement::from_element)
                .transpose()?,
            signed: signature_index(element, inherited).is_some(),
        })
    }

    /// Returns the first value of the named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .and_then(|attr| attr.values.first())
            .map(String::as_str)
    }

    /// Returns the subject's name ID value.
    #[must_use]
    pub fn name_id(&self) -> Option<&str> {
        self.subject
            .as_ref()
            .and_then(|subject| subject.name_id.as_ref())
            .map(|name_id| name_id.value.as_str())
    }
}

/// Subject of an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// The name identifier for the subject.
    pub name_id: Option<NameId>,

    /// Subject confirmation data.
    pub subject_confirmations: Vec<SubjectConfirmation>,
}

impl Subject {
    /// Creates a new subject with a name ID.
    #[must_use]
    pub fn new(name_id: NameId) -> Self {
        Self {
            name_id: Some(name_id),
            subject_confirmations: Vec::new(),
        }
    }

    /// Adds a subject confirmation.
    #[must_use]
    pub fn with_confirmation(mut self, confirmation: SubjectConfirmation) -> Self {
        self.subject_confirmations.push(confirmation);
        self
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new("saml:Subject");
        if let Some(name_id) = &self.name_id {
            element = element.with_child(name_id.to_element());
        }
        self.subject_confirmations
            .iter()
            .fold(element, |element, confirmation| {
                element.with_child(confirmation.to_element())
            })
    }

    fn from_element(element: &Element) -> SamlResult<Self> {
        Ok(Self {
            name_id: element.child("NameID").map(NameId::from_element).transpose()?,
            subject_confirmations: element
                .child_elements()
                .filter(|el| el.local_name() == "SubjectConfirmation")
                .map(SubjectConfirmation::from_element)
                .collect::<SamlResult<_>>()?,
        })
    }
}

/// Subject confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectConfirmation {
    /// The confirmation method.
    pub method: String,

    /// Additional confirmation data.
    pub subject_confirmation_data: Option<SubjectConfirmationData>,
}

impl SubjectConfirmation {
    /// Creates a bearer confirmation.
    #[must_use]
    pub fn bearer() -> Self {
        Self {
            method: BEARER.to_string(),
            subject_confirmation_data: None,
        }
    }

    /// Sets the confirmation data.
    #[must_use]
    pub fn with_data(mut self, data: SubjectConfirmationData) -> Self {
        self.subject_confirmation_data = Some(data);
        self
    }

    fn to_element(&self) -> Element {
        let element = Element::new("saml:SubjectConfirmation").with_attr("Method", &self.method);
        match &self.subject_confirmation_data {
            Some(data) => element.with_child(data.to_element()),
            None => element,
        }
    }

    fn from_element(element: &Element) -> SamlResult<Self> {
        Ok(Self {
            method: required_attr(element, "Method")?.to_string(),
            subject_confirmation_data: element
                .child("SubjectConfirmationData")
                .map(SubjectConfirmationData::from_element)
                .transpose()?,
        })
    }
}

/// Subject confirmation data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectConfirmationData {
    /// The request ID that this assertion responds to.
    pub in_response_to: Option<String>,

    /// Time after which the subject can no longer be confirmed.
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// The location to which the assertion can be presented.
    pub recipient: Option<String>,
}

impl SubjectConfirmationData {
    fn to_element(&self) -> Element {
        let mut element = Element::new("saml:SubjectConfirmationData");
        if let Some(id) = &self.in_response_to {
            element = element.with_attr("InResponseTo", id);
        }
        if let Some(time) = self.not_on_or_after {
            element = element.with_attr("NotOnOrAfter", instant(time));
        }
        if let Some(recipient) = &self.recipient {
            element = element.with_attr("Recipient", recipient);
        }
        element
    }

    fn from_element(element: &Element) -> SamlResult<Self> {
        Ok(Self {
            in_response_to: element.attr("InResponseTo").map(String::from),
            not_on_or_after: optional_instant(element, "NotOnOrAfter")?,
            recipient: element.attr("Recipient").map(String::from),
        })
    }
}

/// Conditions for assertion validity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    /// Time before which the assertion is not valid.
    pub not_before: Option<DateTime<Utc>>,

    /// Time at or after which the assertion is not valid.
    pub not_on_or_after: Option<DateTime<Utc>>,

    /// Audiences of the `AudienceRestriction`.
    pub audiences: Vec<String>,
}

impl Conditions {
    /// Returns true if `time` falls inside the validity window.
    #[must_use]
    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.not_before.map_or(true, |start| time >= start)
            && self.not_on_or_after.map_or(true, |end| time < end)
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new("saml:Conditions");
        if let Some(time) = self.not_before {
            element = element.with_attr("NotBefore", instant(time));
        }
        if let Some(time) = self.not_on_or_after {
            element = element.with_attr("NotOnOrAfter", instant(time));
        }
        if !self.audiences.is_empty() {
            let restriction = self.audiences.iter().fold(
                Element::new("saml:AudienceRestriction"),
                |restriction, audience| {
                    restriction.with_child(Element::new("saml:Audience").with_text(audience))
                },
            );
            element = element.with_child(restriction);
        }
        element
    }

    fn from_element(element: &Element) -> SamlResult<Self> {
        let audiences = element
            .child_elements()
            .filter(|el| el.local_name() == "AudienceRestriction")
            .flat_map(Element::child_elements)
            .filter(|el| el.local_name() == "Audience")
            .map(Element::text)
            .collect();
        Ok(Self {
            not_before: optional_instant(element, "NotBefore")?,
            not_on_or_after: optional_instant(element, "NotOnOrAfter")?,
            audiences,
        })
    }
}

/// Authentication statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthnStatement {
    /// The time of authentication.
    pub authn_instant: DateTime<Utc>,

    /// The session index.
    pub session_index: Option<String>,

    /// Authentication context class reference.
    pub authn_context_class_ref: Option<String>,
}

impl AuthnStatement {
    /// Creates a statement for a session authenticated at `authn_instant`.
    #[must_use]
    pub fn new(
        authn_instant: DateTime<Utc>,
        session_index: impl Into<String>,
        context_class: AuthnContextClass,
    ) -> Self {
        Self {
            authn_instant,
            session_index: Some(session_index.into()),
            authn_context_class_ref: Some(context_class.uri().to_string()),
        }
    }

    fn to_element(&self) -> Element {
        let mut element =
            Element::new("saml:AuthnStatement").with_attr("AuthnInstant", instant(self.authn_instant));
        if let Some(index) = &self.session_index {
            element = element.with_attr("SessionIndex", index);
        }
        let mut context = Element::new("saml:AuthnContext");
        if let Some(class_ref) = &self.authn_context_class_ref {
            context = context.with_child(Element::new("saml:AuthnContextClassRef").with_text(class_ref));
        }
        element.with_child(context)
    }

    fn from_element(element: &Element) -> SamlResult<Self> {
        Ok(Self {
            authn_instant: required_instant(element, "AuthnInstant")?,
            session_index: element.attr("SessionIndex").map(String::from),
            authn_context_class_ref: element
                .child("AuthnContext")
                .and_then(|context| context.child("AuthnContextClassRef"))
                .map(Element::text),
        })
    }
}

/// SAML Attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub name: String,

    /// The attribute values.
    pub values: Vec<String>,
}

impl Attribute {
    /// Creates a new attribute with a single value.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Builds the `saml:Attribute` element, one `xs:anyType` value per entry.
    #[must_use]
    pub fn to_element(&self) -> Element {
        self.values.iter().fold(
            Element::new("saml:Attribute").with_attr("Name", &self.name),
            |element, value| {
                element.with_child(
                    Element::new("saml:AttributeValue")
                        .with_attr("xsi:type", "xs:anyType")
                        .with_text(value),
                )
            },
        )
    }

    /// Reads an `Attribute` element.
    ///
    /// # Errors
    ///
    /// Returns an error if the `Name` attribute is missing.
    pub fn from_element(element: &Element) -> SamlResult<Self> {
        let element = expect_element(element, "Attribute")?;
        Ok(Self {
            name: required_attr(element, "Name")?.to_string(),
            values: element
                .child_elements()
                .filter(|el| el.local_name() == "AttributeValue")
                .map(Element::text)
                .collect(),
        })
    }
}
