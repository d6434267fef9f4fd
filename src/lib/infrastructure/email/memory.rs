//! In-memory mail transport
//!
//! Messages are stored in an [`Outbox`] instead of being delivered. Each
//! [`MemoryMailer`] owns its outbox, so tests create one and inspect it
//! without any shared global state.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::domain::communication::mailer::{
    ConnectionOptions, EmailMessage, MailConnection, MailTransport, MailerError,
};

/// Sender used when a message doesn't set one
pub const DEFAULT_FROM_EMAIL: &str = "webmaster@localhost";

/// Messages "sent" through a [`MemoryMailer`]
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    messages: Arc<RwLock<Vec<EmailMessage>>>,
}

impl Outbox {
    /// A copy of every stored message, oldest first
    pub fn messages(&self) -> Vec<EmailMessage> {
        self.messages.read().clone()
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// Whether nothing has been sent
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// Drop every stored message
    pub fn clear(&self) {
        self.messages.write().clear();
    }

    fn push(&self, message: EmailMessage) {
        self.messages.write().push(message);
    }
}

/// Mail transport storing messages in memory
#[derive(Clone, Debug)]
pub struct MemoryMailer {
    outbox: Outbox,
    default_from_email: String,
}

impl MemoryMailer {
    /// Create a mailer with an empty outbox
    pub fn new() -> Self {
        Self {
            outbox: Outbox::default(),
            default_from_email: DEFAULT_FROM_EMAIL.to_string(),
        }
    }

    /// Use `from_email` for messages that don't set a sender
    pub fn with_default_from_email(mut self, from_email: impl Into<String>) -> Self {
        self.default_from_email = from_email.into();
        self
    }

    /// The outbox shared by every connection of this mailer
    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }
}

impl Default for MemoryMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl MailTransport for MemoryMailer {
    type Connection = MemoryConnection;

    fn connection(&self, options: &ConnectionOptions) -> Result<MemoryConnection, MailerError> {
        if options.username.is_some() {
            debug!("memory connections ignore credentials");
        }

        Ok(MemoryConnection {
            outbox: self.outbox.clone(),
            default_from_email: self.default_from_email.clone(),
            fail_silently: options.fail_silently,
        })
    }
}

/// Connection of a [`MemoryMailer`]
#[derive(Clone, Debug)]
pub struct MemoryConnection {
    outbox: Outbox,
    default_from_email: String,
    fail_silently: bool,
}

impl MemoryConnection {
    fn store(&self, message: &EmailMessage) -> Result<(), MailerError> {
        message.check_headers()?;

        let mut message = message.clone();
        message
            .from_email
            .get_or_insert_with(|| self.default_from_email.clone());

        self.outbox.push(message);

        Ok(())
    }
}

#[async_trait]
impl MailConnection for MemoryConnection {
    async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailerError> {
        let mut sent = 0;

        for message in messages.iter().filter(|m| m.has_recipients()) {
            match self.store(message) {
                Ok(()) => sent += 1,
                Err(e) if self.fail_silently => {
                    warn!(error = %e, subject = %message.subject, "failed to store message");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(sent)
    }
}
