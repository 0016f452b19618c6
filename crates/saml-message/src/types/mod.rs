//! SAML 2.0 types and data structures.
//!
//! Each message element has a typed counterpart with a `to_element`
//! constructor used by the builders and a `from_element` reader used by the
//! parsed views.

mod assertion;
mod attribute_map;
mod authn_request;
mod constants;
mod name_id;
mod response;
mod status;

pub use assertion::*;
pub use attribute_map::*;
pub use authn_request::*;
pub use constants::*;
pub use name_id::*;
pub use response::*;
pub use status::*;

use chrono::{DateTime, Utc};

use crate::error::{SamlError, SamlResult};
use crate::generator;
use crate::xml::Element;

/// Checks that `element` has the expected local name.
pub(crate) fn expect_element<'a>(element: &'a Element, local: &str) -> SamlResult<&'a Element> {
    if element.local_name() == local {
        Ok(element)
    } else {
        Err(SamlError::XmlParse(format!(
            "expected <{local}>, found <{}>",
            element.name
        )))
    }
}

pub(crate) fn required_child<'a>(element: &'a Element, local: &str) -> SamlResult<&'a Element> {
    element.child(local).ok_or_else(|| {
        SamlError::XmlParse(format!("<{}> has no <{local}> child", element.name))
    })
}

pub(crate) fn required_attr<'a>(element: &'a Element, name: &str) -> SamlResult<&'a str> {
    element.attr(name).ok_or_else(|| {
        SamlError::XmlParse(format!("<{}> has no {name} attribute", element.name))
    })
}

pub(crate) fn optional_instant(element: &Element, name: &str) -> SamlResult<Option<DateTime<Utc>>> {
    element.attr(name).map(generator::parse_instant).transpose()
}

pub(crate) fn required_instant(element: &Element, name: &str) -> SamlResult<DateTime<Utc>> {
    generator::parse_instant(required_attr(element, name)?)
}
