//! SMTP mail transport implementation

use std::fmt;

use anyhow::anyhow;
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{
        header::{ContentDisposition, ContentType, HeaderName, HeaderValue},
        Mailbox, MessageBuilder, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

use crate::domain::communication::mailer::{
    ConnectionOptions, EmailMessage, MailConnection, MailTransport, MailerError, REPLY_TO,
};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SmtpConfig {
    /// The SMTP host
    #[clap(long, env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[clap(long, env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long, env = "SMTP_USER")]
    pub username: String,

    /// The SMTP password
    #[clap(long, env = "SMTP_PASSWORD")]
    pub password: String,

    /// The default sender email address
    #[clap(long, env = "SMTP_SENDER")]
    pub sender: String,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long, env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Build a transport, authenticating with the given credentials or the configured ones
    fn transport(
        &self,
        options: &ConnectionOptions,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let creds = Credentials::new(
            options
                .username
                .clone()
                .unwrap_or_else(|| self.config.username.clone()),
            options
                .password
                .clone()
                .unwrap_or_else(|| self.config.password.clone()),
        );

        let relay = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
        };

        Ok(relay
            .credentials(creds)
            .port(self.config.port)
            .tls(Tls::Opportunistic(
                TlsParameters::builder(self.config.host.to_string())
                    .dangerous_accept_invalid_certs(!self.config.verify_tls)
                    .build()?,
            ))
            .build())
    }
}

impl MailTransport for SmtpMailer {
    type Connection = SmtpConnection;

    fn connection(&self, options: &ConnectionOptions) -> Result<SmtpConnection, MailerError> {
        debug!(host = %self.config.host, port = self.config.port, "opening SMTP connection");

        Ok(SmtpConnection {
            transport: self.transport(options)?,
            sender: self.config.sender.clone(),
            fail_silently: options.fail_silently,
        })
    }
}

/// Connection of an [`SmtpMailer`]
pub struct SmtpConnection {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    fail_silently: bool,
}

impl SmtpConnection {
    async fn send_message(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let email = build_message(message, &self.sender)?;

        self.transport.send(email).await?;

        Ok(())
    }
}

impl fmt::Debug for SmtpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConnection")
            .field("sender", &self.sender)
            .field("fail_silently", &self.fail_silently)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MailConnection for SmtpConnection {
    async fn send_messages(&self, messages: &[EmailMessage]) -> Result<usize, MailerError> {
        let mut sent = 0;

        for message in messages.iter().filter(|m| m.has_recipients()) {
            match self.send_message(message).await {
                Ok(()) => sent += 1,
                Err(e) if self.fail_silently => {
                    warn!(error = %e, subject = %message.subject, "failed to send message");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(sent)
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailerError> {
    address
        .parse()
        .map_err(|_| MailerError::InvalidEmail(address.to_string()))
}

fn content_type(mime_type: &str) -> Result<ContentType, MailerError> {
    ContentType::parse(mime_type)
        .map_err(|_| MailerError::UnknownError(anyhow!("invalid content type: {mime_type}")))
}

fn with_headers(
    mut builder: MessageBuilder,
    message: &EmailMessage,
) -> Result<MessageBuilder, MailerError> {
    for (name, value) in &message.headers {
        if name.eq_ignore_ascii_case(REPLY_TO) {
            builder = builder.reply_to(mailbox(value)?);
        } else {
            let name = HeaderName::new_from_ascii(name.clone())
                .map_err(|e| MailerError::UnknownError(anyhow!("invalid header {name}: {e}")))?;
            builder = builder.raw_header(HeaderValue::new(name, value.clone()));
        }
    }

    Ok(builder)
}

/// Convert an [`EmailMessage`] into a lettre [`Message`], using `sender` when it has none
fn build_message(message: &EmailMessage, sender: &str) -> Result<Message, MailerError> {
    message.check_headers()?;

    let mut builder = Message::builder()
        .from(mailbox(message.from_email.as_deref().unwrap_or(sender))?)
        .subject(message.subject.clone());

    for address in &message.to {
        builder = builder.to(mailbox(address)?);
    }
    for address in &message.cc {
        builder = builder.cc(mailbox(address)?);
    }
    for address in &message.bcc {
        builder = builder.bcc(mailbox(address)?);
    }

    let builder = with_headers(builder, message)?;

    if message.alternatives.is_empty() && message.attachments.is_empty() {
        return Ok(builder.body(message.body.clone())?);
    }

    let text = SinglePart::plain(message.body.clone());

    let mut content = MultiPart::alternative().singlepart(text);
    for alternative in &message.alternatives {
        content = content.singlepart(
            SinglePart::builder()
                .header(content_type(&alternative.mime_type)?)
                .body(alternative.content.clone()),
        );
    }

    if message.attachments.is_empty() {
        return Ok(builder.multipart(content)?);
    }

    let mut mixed = MultiPart::mixed().multipart(content);
    for attachment in &message.attachments {
        let mime_type = attachment
            .mime_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        mixed = mixed.singlepart(
            SinglePart::builder()
                .header(content_type(mime_type)?)
                .header(ContentDisposition::attachment(&attachment.filename))
                .body(attachment.content.clone()),
        );
    }

    Ok(builder.multipart(mixed)?)
}
