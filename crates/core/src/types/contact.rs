//! Contact details collected at checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing contact details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The email does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    EmailAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmailLocalPart,
    /// The domain part (after @) is empty or has no dot.
    #[error("email domain must look like example.com")]
    EmailDomain,
    /// The email is longer than RFC 5321 allows.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The phone number is not ten digits.
    #[error("phone number must have 10 digits")]
    Phone,
    /// The pincode is not six digits.
    #[error("pincode must be 6 digits and cannot start with 0")]
    Pincode,
}

/// A syntactically plausible email address.
///
/// ```
/// use shophub_core::Email;
///
/// assert!(Email::parse("buyer@example.com").is_ok());
/// assert!(Email::parse("buyer@localhost").is_err());
/// assert!(Email::parse("@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an email, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns a [`ContactError`] describing the first failed rule.
    pub fn parse(input: &str) -> Result<Self, ContactError> {
        let s = input.trim();
        if s.len() > Self::MAX_LENGTH {
            return Err(ContactError::EmailTooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let mut parts = s.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ContactError::EmailAtSymbol);
        };
        if local.is_empty() {
            return Err(ContactError::EmailLocalPart);
        }
        if domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(ContactError::EmailDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ten digit Indian mobile number, stored without the country prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a phone number. Spaces, dashes and a leading `+91` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::Phone`] unless exactly ten digits remain.
    pub fn parse(input: &str) -> Result<Self, ContactError> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        let digits = compact.strip_prefix("+91").unwrap_or(&compact);

        if digits.len() == 10 && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(digits.to_owned()))
        } else {
            Err(ContactError::Phone)
        }
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A six digit postal index number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Pincode(String);

impl Pincode {
    /// Parse a pincode.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::Pincode`] unless the input is six digits with a
    /// non-zero first digit.
    pub fn parse(input: &str) -> Result<Self, ContactError> {
        let s = input.trim();
        let valid = s.len() == 6
            && s.bytes().all(|b| b.is_ascii_digit())
            && !s.starts_with('0');
        if valid {
            Ok(Self(s.to_owned()))
        } else {
            Err(ContactError::Pincode)
        }
    }

    /// Returns the pincode as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
