//! Email Address

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]*?@[^@\s]*?\.[^@\s]*$").unwrap();
}

use std::fmt;

use thiserror::Error;

use EmailAddressError::*;

/// Lowercase `email` and remove its leading and trailing whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// An error that can occur when creating an email address
#[derive(Debug, Error)]
pub enum EmailAddressError {
    /// The email address is empty
    #[error("email is empty")]
    EmptyEmailAddress,

    /// The email address is invalid
    #[error("email is invalid")]
    InvalidEmailAddress,
}

/// An email address, as accepted from a form field.
///
/// Nothing on the sending path requires this type: [`send_mail2`] and
/// [`send_templated_mail`] deliver to whatever text they are given.
///
/// [`send_mail2`]: crate::domain::communication::mailer::send_mail2
/// [`send_templated_mail`]: crate::domain::communication::mailer::send_templated_mail
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address from trimmed input
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(EmptyEmailAddress);
        }

        if !EMAIL_REGEX.is_match(trimmed) {
            return Err(InvalidEmailAddress);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Create a new email address, lower-casing it before validation
    pub fn new_lowercase(raw: &str) -> Result<Self, EmailAddressError> {
        Self::new(&normalize_email(raw))
    }

    /// Wrap `raw` without any checks
    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.to_string())
    }

    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_email_address_display() -> TestResult {
        let email = EmailAddress::new("email@example.com")?;

        assert_eq!(format!("{}", email), "email@example.com".to_string());

        Ok(())
    }

    #[test]
    fn test_empty_email_address_is_invalid() {
        let result = EmailAddress::new("  ");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), EmptyEmailAddress));
    }

    #[test]
    fn test_email_address_without_at_symbol_is_invalid() {
        let result = EmailAddress::new("email");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), InvalidEmailAddress));
    }

    #[test]
    fn test_email_address_is_trimmed() -> TestResult {
        let email = EmailAddress::new("\t Email@Example.com\n")?;

        assert_eq!(email.as_str(), "Email@Example.com");

        Ok(())
    }

    #[test]
    fn test_lowercase_email_address() -> TestResult {
        let email = EmailAddress::new_lowercase("  A@A.COM ")?;

        assert_eq!(String::from(email), "a@a.com".to_string());

        Ok(())
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("A@A.COM"), "a@a.com");
        assert_eq!(normalize_email("\t  a@a.com\n"), "a@a.com");
    }
}
