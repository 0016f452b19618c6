//! Subject identifiers and the policy a request places on them.

use serde::{Deserialize, Serialize};

use super::{expect_element, NameIdFormat};
use crate::error::SamlResult;
use crate::xml::Element;

/// `saml:NameID`: who the assertion is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameId {
    /// Identifier text.
    pub value: String,

    /// Format URI, kept verbatim so unknown formats survive a round trip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl NameId {
    /// A name ID without a format.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: None,
        }
    }

    /// An `emailAddress` name ID.
    #[must_use]
    pub fn email(email: impl Into<String>) -> Self {
        Self::new(email).with_format(NameIdFormat::Email)
    }

    /// Replaces the format.
    #[must_use]
    pub fn with_format(mut self, format: NameIdFormat) -> Self {
        self.format = Some(format.uri().to_string());
        self
    }

    /// Known format, `Unspecified` when absent or unrecognized.
    #[must_use]
    pub fn parsed_format(&self) -> NameIdFormat {
        self.format
            .as_deref()
            .and_then(NameIdFormat::from_uri)
            .unwrap_or_default()
    }

    /// Builds the `saml:NameID` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("saml:NameID");
        if let Some(format) = &self.format {
            element = element.with_attr("Format", format);
        }
        element.with_text(&self.value)
    }

    /// Reads a `NameID` element.
    ///
    /// # Errors
    ///
    /// Returns an error if `element` is not a `NameID`.
    pub fn from_element(element: &Element) -> SamlResult<Self> {
        let element = expect_element(element, "NameID")?;
        Ok(Self {
            value: element.text(),
            format: element.attr("Format").map(String::from),
        })
    }
}

/// Name ID policy for authentication requests.
///
/// Specifies constraints on the name identifier to be returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameIdPolicy {
    /// The requested name ID format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Whether a new identifier should be created for this request.
    #[serde(default)]
    pub allow_create: bool,
}

impl NameIdPolicy {
    /// Creates a policy requesting a specific format.
    #[must_use]
    pub fn with_format(format: NameIdFormat) -> Self {
        Self {
            format: Some(format.uri().to_string()),
            allow_create: false,
        }
    }

    /// The policy sent with every request: persistent identifiers, created on demand.
    #[must_use]
    pub fn persistent() -> Self {
        Self::with_format(NameIdFormat::Persistent).allow_create(true)
    }

    /// Sets whether new identifiers can be created.
    #[must_use]
    pub const fn allow_create(mut self, allow: bool) -> Self {
        self.allow_create = allow;
        self
    }

    /// Returns the parsed name ID format.
    #[must_use]
    pub fn parsed_format(&self) -> Option<NameIdFormat> {
        self.format.as_deref().and_then(NameIdFormat::from_uri)
    }

    /// Builds the `samlp:NameIDPolicy` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("samlp:NameIDPolicy")
            .with_attr("AllowCreate", if self.allow_create { "true" } else { "false" });
        if let Some(format) = &self.format {
            element = element.with_attr("Format", format);
        }
        element
    }

    /// Reads a `NameIDPolicy` element.
    ///
    /// # Errors
    ///
    /// Returns an error if `element` is not a `NameIDPolicy`.
    pub fn from_element(element: &Element) -> SamlResult<Self> {
        let element = expect_element(element, "NameIDPolicy")?;
        Ok(Self {
            format: element.attr("Format").map(String::from),
            allow_create: matches!(element.attr("AllowCreate"), Some("true" | "1")),
        })
    }
}
