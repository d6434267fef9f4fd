//! Plain and HTML message builders

use std::{fmt, slice};

use tracing::debug;

use super::{
    set_header_reply_to, Attachment, ConnectionOptions, EmailMessage, Headers, MailConnection,
    MailTransport, MailerError, TEXT_HTML,
};

/// Everything an email takes besides its subject and bodies
pub struct EmailOptions<'a, C> {
    /// Sender, the connection's default sender if unset
    pub from_email: Option<String>,

    /// Recipients
    pub to: Vec<String>,

    /// Carbon-copy recipients
    pub cc: Vec<String>,

    /// Blind carbon-copy recipients
    pub bcc: Vec<String>,

    /// Address replies should go to
    pub reply_to: Option<String>,

    /// Connection to send through, a default one is opened if unset
    pub connection: Option<&'a C>,

    /// Attached files
    pub attachments: Vec<Attachment>,

    /// Extra headers
    pub headers: Option<Headers>,
}

impl<C> Default for EmailOptions<'_, C> {
    fn default() -> Self {
        Self {
            from_email: None,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: None,
            connection: None,
            attachments: Vec::new(),
            headers: None,
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for EmailOptions<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailOptions")
            .field("from_email", &self.from_email)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("bcc", &self.bcc)
            .field("reply_to", &self.reply_to)
            .field("connection", &self.connection)
            .field("attachments", &self.attachments.len())
            .field("headers", &self.headers)
            .finish()
    }
}

/// A plain text email
///
/// `connection` is the only public field since it can be swapped safely
/// after construction.
pub struct PlainEmail<'a, C> {
    subject: String,
    body: String,
    from_email: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    attachments: Vec<Attachment>,
    headers: Option<Headers>,

    /// Connection to send through
    pub connection: Option<&'a C>,
}

impl<'a, C> PlainEmail<'a, C> {
    /// Creates a plain text email, merging `reply_to` into the headers
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        options: EmailOptions<'a, C>,
    ) -> Self {
        let headers = set_header_reply_to(options.headers, options.reply_to.as_deref());

        Self {
            subject: subject.into(),
            body: body.into(),
            from_email: options.from_email,
            to: options.to,
            cc: options.cc,
            bcc: options.bcc,
            attachments: options.attachments,
            headers,
            connection: options.connection,
        }
    }

    /// Creates the message to hand to a connection
    pub fn create_message(&self) -> EmailMessage {
        EmailMessage {
            subject: self.subject.clone(),
            body: self.body.clone(),
            from_email: self.from_email.clone(),
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            headers: self.headers.clone().unwrap_or_default(),
            attachments: self.attachments.clone(),
            alternatives: Vec::new(),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for PlainEmail<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainEmail")
            .field("subject", &self.subject)
            .field("body", &self.body)
            .field("from_email", &self.from_email)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("bcc", &self.bcc)
            .field("attachments", &self.attachments.len())
            .field("headers", &self.headers)
            .field("connection", &self.connection)
            .finish()
    }
}

/// A multipart email with an HTML alternative to the plain text body
#[derive(Debug)]
pub struct HtmlEmail<'a, C> {
    html_body: String,
    email: PlainEmail<'a, C>,
}

impl<'a, C> HtmlEmail<'a, C> {
    /// Creates an HTML email
    pub fn new(
        html_body: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        options: EmailOptions<'a, C>,
    ) -> Self {
        Self {
            html_body: html_body.into(),
            email: PlainEmail::new(subject, body, options),
        }
    }

    /// Replaces the connection the email will be sent through
    pub fn set_connection(&mut self, connection: Option<&'a C>) {
        self.email.connection = connection;
    }
}

/// An email ready to be sent
#[derive(Debug)]
pub enum Email<'a, C> {
    /// Plain text only
    Plain(PlainEmail<'a, C>),

    /// Plain text with an HTML alternative
    Html(HtmlEmail<'a, C>),
}

impl<'a, C> Email<'a, C> {
    /// Shorthand for a [`PlainEmail`]
    pub fn plain(
        subject: impl Into<String>,
        body: impl Into<String>,
        options: EmailOptions<'a, C>,
    ) -> Self {
        Self::Plain(PlainEmail::new(subject, body, options))
    }

    /// Shorthand for an [`HtmlEmail`]
    pub fn html(
        html_body: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        options: EmailOptions<'a, C>,
    ) -> Self {
        Self::Html(HtmlEmail::new(html_body, subject, body, options))
    }

    /// The connection the email will be sent through, if one was given
    pub fn connection(&self) -> Option<&'a C> {
        match self {
            Self::Plain(email) => email.connection,
            Self::Html(email) => email.email.connection,
        }
    }

    /// Creates the message to hand to a connection
    pub fn create_message(&self) -> EmailMessage {
        match self {
            Self::Plain(email) => email.create_message(),
            Self::Html(email) => {
                let mut message = email.email.create_message();
                message.attach_alternative(email.html_body.clone(), TEXT_HTML);
                message
            }
        }
    }
}

impl<C: MailConnection> Email<'_, C> {
    /// Create the message and send it.
    ///
    /// Without a connection of its own, the email opens a default one from
    /// `transport`.
    ///
    /// # Returns
    /// The number of messages sent, as reported by the connection.
    pub async fn send<T>(&self, transport: &T) -> Result<usize, MailerError>
    where
        T: MailTransport<Connection = C>,
    {
        let message = self.create_message();

        match self.connection() {
            Some(connection) => connection.send_messages(slice::from_ref(&message)).await,
            None => {
                debug!("no connection given, opening a default one");

                transport
                    .connection(&ConnectionOptions::default())?
                    .send_messages(slice::from_ref(&message))
                    .await
            }
        }
    }
}

impl<'a, C> From<PlainEmail<'a, C>> for Email<'a, C> {
    fn from(email: PlainEmail<'a, C>) -> Self {
        Self::Plain(email)
    }
}

impl<'a, C> From<HtmlEmail<'a, C>> for Email<'a, C> {
    fn from(email: HtmlEmail<'a, C>) -> Self {
        Self::Html(email)
    }
}
