//! Mailer errors

use lettre::address::AddressError;
use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// An address list holds something other than text
    #[error("email addresses in `{field}` couldn't be joined in a single string: {addresses}")]
    InvalidAddresses {
        /// The offending collection, e.g. `to`
        field: &'static str,

        /// The list as it was received
        addresses: String,
    },

    /// A header-bound value contains a newline
    #[error("header values can't contain newlines (got {value:?} for header '{name}')")]
    BadHeader {
        /// Header name
        name: String,

        /// Offending value
        value: String,
    },

    /// An address the transport can't parse
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// An error occurred while sending the email
    #[error("An error occurred while sending the email")]
    SendError,

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<AddressError> for MailerError {
    fn from(err: AddressError) -> Self {
        MailerError::InvalidEmail(err.to_string())
    }
}

impl From<lettre::error::Error> for MailerError {
    fn from(err: lettre::error::Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}

impl From<lettre::transport::smtp::Error> for MailerError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}
