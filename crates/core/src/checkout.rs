//! Checkout form validation.

use serde::{Deserialize, Serialize};

use crate::types::{ContactError, Email, PhoneNumber, Pincode};

/// Errors found while validating a [`CheckoutForm`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A required field is blank.
    #[error("{0} is required")]
    Missing(&'static str),
    /// A contact field is malformed.
    #[error(transparent)]
    Contact(#[from] ContactError),
}

/// Raw checkout input as typed by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

/// A validated shipping destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub address: String,
    pub city: String,
    pub pincode: Pincode,
}

impl CheckoutForm {
    /// Check every field, reporting the first problem in form order.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Missing`] for blank fields and
    /// [`FormError::Contact`] for malformed email, phone or pincode.
    pub fn validate(&self) -> Result<ShippingDetails, FormError> {
        let name = required("name", &self.name)?;
        let email = Email::parse(required("email", &self.email)?)?;
        let phone = PhoneNumber::parse(required("phone", &self.phone)?)?;
        let address = required("address", &self.address)?;
        let city = required("city", &self.city)?;
        let pincode = Pincode::parse(required("pincode", &self.pincode)?)?;

        Ok(ShippingDetails {
            name: name.to_owned(),
            email,
            phone,
            address: address.to_owned(),
            city: city.to_owned(),
            pincode,
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(trimmed)
    }
}
