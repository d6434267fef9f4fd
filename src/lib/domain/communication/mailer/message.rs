//! Email message

use std::collections::BTreeMap;

use super::MailerError;

/// Name of the header replies are directed to
pub const REPLY_TO: &str = "Reply-To";

/// MIME type of the HTML alternative
pub const TEXT_HTML: &str = "text/html";

/// Extra email headers, by name
pub type Headers = BTreeMap<String, String>;

/// A file attached to the email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown to the recipient
    pub filename: String,

    /// Raw content
    pub content: Vec<u8>,

    /// MIME type, `application/octet-stream` when unknown
    pub mime_type: Option<String>,
}

impl Attachment {
    /// Creates an attachment with no declared MIME type
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            mime_type: None,
        }
    }

    /// Declares the attachment's MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// An alternative representation of the body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alternative {
    /// The content
    pub content: String,

    /// Its MIME type, e.g. [`TEXT_HTML`]
    pub mime_type: String,
}

/// Email message, as handed to a [`MailConnection`](super::MailConnection)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmailMessage {
    /// The subject of the email
    pub subject: String,

    /// The plain text body of the email
    pub body: String,

    /// The sender of the email, the connection's default sender if unset
    pub from_email: Option<String>,

    /// Recipients
    pub to: Vec<String>,

    /// Carbon-copy recipients
    pub cc: Vec<String>,

    /// Blind carbon-copy recipients
    pub bcc: Vec<String>,

    /// Extra headers
    pub headers: Headers,

    /// Attached files
    pub attachments: Vec<Attachment>,

    /// Alternative representations of the body
    pub alternatives: Vec<Alternative>,
}

impl EmailMessage {
    /// All recipients: `to`, then `cc`, then `bcc`
    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(String::as_str)
    }

    /// Whether the message has anyone to be delivered to
    pub fn has_recipients(&self) -> bool {
        self.recipients().next().is_some()
    }

    /// Attach an alternative representation of the body
    pub fn attach_alternative(&mut self, content: impl Into<String>, mime_type: impl Into<String>) {
        self.alternatives.push(Alternative {
            content: content.into(),
            mime_type: mime_type.into(),
        });
    }

    /// The alternative of the given MIME type, if any
    pub fn alternative(&self, mime_type: &str) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.mime_type == mime_type)
    }

    /// Ensure no header-bound value contains a line break.
    pub fn check_headers(&self) -> Result<(), MailerError> {
        let addresses = [("To", &self.to), ("Cc", &self.cc), ("Bcc", &self.bcc)]
            .into_iter()
            .flat_map(|(name, list)| list.iter().map(move |value| (name, value.as_str())));

        let fields = [("Subject", self.subject.as_str())]
            .into_iter()
            .chain(self.from_email.as_deref().map(|from| ("From", from)))
            .chain(addresses)
            .chain(self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        for (name, value) in fields {
            if value.contains(['\n', '\r']) {
                return Err(MailerError::BadHeader {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Set `reply_to` as the `Reply-To` header.
///
/// A missing `headers` map is created when needed; without `reply_to` the
/// input is returned as is, absent included.
pub fn set_header_reply_to(headers: Option<Headers>, reply_to: Option<&str>) -> Option<Headers> {
    match reply_to {
        Some(reply_to) => {
            let mut headers = headers.unwrap_or_default();
            headers.insert(REPLY_TO.to_string(), reply_to.to_string());
            Some(headers)
        }
        None => headers,
    }
}
