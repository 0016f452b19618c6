//! `samlp:Status` and its nested status codes.

use serde::{Deserialize, Serialize};

use super::{expect_element, required_attr, required_child, status_codes};
use crate::error::SamlResult;
use crate::xml::Element;

/// SAML protocol status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// The status code.
    pub status_code: StatusCode,

    /// Human-readable detail, rarely present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl Status {
    /// Top-level `Success` with no message.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status_code: StatusCode::success(),
            status_message: None,
        }
    }

    /// True for a top-level `Success` code.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code.is_success()
    }

    /// Builds the `samlp:Status` element.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("samlp:Status").with_child(self.status_code.to_element());
        if let Some(message) = &self.status_message {
            element = element.with_child(Element::new("samlp:StatusMessage").with_text(message));
        }
        element
    }

    /// Reads a `Status` element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element or its `StatusCode` is missing or malformed.
    pub fn from_element(element: &Element) -> SamlResult<Self> {
        let element = expect_element(element, "Status")?;
        Ok(Self {
            status_code: StatusCode::from_element(required_child(element, "StatusCode")?)?,
            status_message: element.child("StatusMessage").map(Element::text),
        })
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::success()
    }
}

/// A status code URI with an optional second-level code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    /// Status URI.
    pub value: String,

    /// Second-level code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<Box<StatusCode>>,
}

impl StatusCode {
    /// A code without a second level.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status_code: None,
        }
    }

    /// `Success`.
    #[must_use]
    pub fn success() -> Self {
        Self::new(status_codes::SUCCESS)
    }

    /// Nests `sub` as the second-level code.
    #[must_use]
    pub fn with_sub_status(mut self, sub: StatusCode) -> Self {
        self.status_code = Some(Box::new(sub));
        self
    }

    /// Returns true if this is a success status code.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.value == status_codes::SUCCESS
    }

    /// Returns the sub-status code value if present.
    #[must_use]
    pub fn sub_status_value(&self) -> Option<&str> {
        self.status_code.as_ref().map(|s| s.value.as_str())
    }

    /// Builds the `samlp:StatusCode` element, nesting any sub-status.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let element = Element::new("samlp:StatusCode").with_attr("Value", &self.value);
        match &self.status_code {
            Some(sub) => element.with_child(sub.to_element()),
            None => element,
        }
    }

    /// Reads a `StatusCode` element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element or its `Value` attribute is missing.
    pub fn from_element(element: &Element) -> SamlResult<Self> {
        let element = expect_element(element, "StatusCode")?;
        let status_code = element
            .child("StatusCode")
            .map(Self::from_element)
            .transpose()?
            .map(Box::new);
        Ok(Self {
            value: required_attr(element, "Value")?.to_string(),
            status_code,
        })
    }
}
