//! Mail transport abstraction and the helpers built on top of it

use std::fmt;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod email;
mod errors;
mod message;
mod send;
mod templated;

pub use email::{Email, EmailOptions, HtmlEmail, PlainEmail};
pub use errors::MailerError;
pub use message::{
    set_header_reply_to, Alternative, Attachment, EmailMessage, Headers, REPLY_TO, TEXT_HTML,
};
pub use send::{send_mail2, SendMail};
pub use templated::{send_templated_mail, TemplateNames};

/// Options used when opening a connection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Username to authenticate with, instead of the configured one
    pub username: Option<String>,

    /// Password to authenticate with, instead of the configured one
    pub password: Option<String>,

    /// Log and skip failed messages instead of returning an error
    pub fail_silently: bool,
}

/// A mail transport that hands out connections
pub trait MailTransport: Clone + Send + Sync + 'static {
    /// The connection type this transport opens
    type Connection: MailConnection;

    /// Open a connection
    ///
    /// # Arguments
    /// * `options` - Credentials and failure handling for the connection.
    ///
    /// # Returns
    /// A [`Result`] containing the connection, or a [`MailerError`] if it
    /// could not be set up.
    fn connection(&self, options: &ConnectionOptions) -> Result<Self::Connection, MailerError>;
}

/// An open connection able to deliver messages
#[async_trait]
pub trait MailConnection: fmt::Debug + Send + Sync {
    /// Send `messages`, returning how many were handed to the transport.
    ///
    /// Messages without recipients are skipped and not counted.
    async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailerError>;
}

#[cfg(test)]
mock! {
    pub MailConnection {}

    #[async_trait]
    impl MailConnection for MailConnection {
        async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailerError>;
    }
}

#[cfg(test)]
impl fmt::Debug for MockMailConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MockMailConnection")
    }
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    impl Clone for MailTransport {
        fn clone(&self) -> Self;
    }

    impl MailTransport for MailTransport {
        type Connection = MockMailConnection;

        fn connection(&self, options: &ConnectionOptions) -> Result<MockMailConnection, MailerError>;
    }
}
