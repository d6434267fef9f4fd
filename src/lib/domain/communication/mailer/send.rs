//! Direct sending

use std::{fmt, slice};

use tracing::debug;

use crate::domain::communication::email_addresses::{validate_addresses, AddressList};

use super::{
    set_header_reply_to, Attachment, ConnectionOptions, EmailMessage, Headers, MailConnection,
    MailTransport, MailerError,
};

/// Arguments of [`send_mail2`]; every field is optional
pub struct SendMail<'a, C> {
    /// The subject of the email
    pub subject: String,

    /// The plain text body of the email
    pub body: String,

    /// The sender, not to be confused with `auth_user`
    pub from_email: Option<String>,

    /// Recipients
    pub to: Option<AddressList>,

    /// Carbon-copy recipients
    pub cc: Option<AddressList>,

    /// Blind carbon-copy recipients
    pub bcc: Option<AddressList>,

    /// Address replies should go to
    pub reply_to: Option<String>,

    /// Log and skip transport failures instead of returning them
    pub fail_silently: bool,

    /// Username for the connection opened when `connection` is unset
    pub auth_user: Option<String>,

    /// Password for the connection opened when `connection` is unset
    pub auth_password: Option<String>,

    /// Connection to reuse
    pub connection: Option<&'a C>,

    /// Attached files
    pub attachments: Vec<Attachment>,

    /// Extra headers
    pub headers: Option<Headers>,
}

impl<C> Default for SendMail<'_, C> {
    fn default() -> Self {
        Self {
            subject: String::new(),
            body: String::new(),
            from_email: None,
            to: None,
            cc: None,
            bcc: None,
            reply_to: None,
            fail_silently: false,
            auth_user: None,
            auth_password: None,
            connection: None,
            attachments: Vec::new(),
            headers: None,
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for SendMail<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendMail")
            .field("subject", &self.subject)
            .field("from_email", &self.from_email)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("bcc", &self.bcc)
            .field("reply_to", &self.reply_to)
            .field("fail_silently", &self.fail_silently)
            .field("auth_user", &self.auth_user)
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

fn validate(field: &'static str, addresses: Option<AddressList>) -> Result<Vec<String>, MailerError> {
    addresses
        .map(|list| validate_addresses(field, &list))
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Send a plain text email, reusing `mail.connection` or opening a new one.
///
/// Addresses are only checked to be text. Any of `""`, `" "`, `"x"` or
/// `"x@x"` **will** be sent; validate them beforehand.
///
/// # Returns
/// The number of messages sent: `0` when there are no recipients.
///
/// # Errors
/// [`MailerError::InvalidAddresses`] before any connection is opened, then
/// whatever the transport reports (unless it was opened with
/// `fail_silently`).
pub async fn send_mail2<T>(
    transport: &T,
    mail: SendMail<'_, T::Connection>,
) -> Result<usize, MailerError>
where
    T: MailTransport,
{
    let to = validate("to", mail.to)?;
    let cc = validate("cc", mail.cc)?;
    let bcc = validate("bcc", mail.bcc)?;

    let opened;
    let connection = match mail.connection {
        Some(connection) => connection,
        None => {
            debug!(auth_user = ?mail.auth_user, fail_silently = mail.fail_silently, "opening connection");

            opened = transport.connection(&ConnectionOptions {
                username: mail.auth_user,
                password: mail.auth_password,
                fail_silently: mail.fail_silently,
            })?;
            &opened
        }
    };

    let headers = set_header_reply_to(mail.headers, mail.reply_to.as_deref());

    let message = EmailMessage {
        subject: mail.subject,
        body: mail.body,
        from_email: mail.from_email,
        to,
        cc,
        bcc,
        headers: headers.unwrap_or_default(),
        attachments: mail.attachments,
        alternatives: Vec::new(),
    };

    connection.send_messages(slice::from_ref(&message)).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::communication::mailer::{
            tests::{MockMailConnection, MockMailTransport},
            REPLY_TO,
        },
        infrastructure::email::memory::MemoryMailer,
    };

    use super::*;

    fn accepting_connection() -> MockMailConnection {
        let mut connection = MockMailConnection::new();
        connection
            .expect_send_messages()
            .returning(|messages| Ok(messages.len()));
        connection
    }

    #[tokio::test]
    async fn test_simplest_call() -> TestResult {
        let mailer = MemoryMailer::new();

        assert_eq!(send_mail2(&mailer, SendMail::default()).await?, 0);
        assert!(mailer.outbox().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_full_call() -> TestResult {
        let mut connection = MockMailConnection::new();
        connection
            .expect_send_messages()
            .times(1)
            .withf(|messages| {
                let message = &messages[0];
                message.subject == "subject"
                    && message.body == "body"
                    && message.from_email.as_deref() == Some("from@example.com")
                    && message.to == vec!["to@example.com"]
                    && message.cc == vec!["cc@example.com"]
                    && message.bcc == vec!["bcc@example.com"]
                    && message.headers[REPLY_TO] == "reply@example.com"
                    && message.headers["X-Tag"] == "news"
                    && message.attachments.len() == 1
                    && message.alternatives.is_empty()
            })
            .returning(|_| Ok(7));

        let mut transport = MockMailTransport::new();
        transport.expect_connection().times(0);

        let sent = send_mail2(
            &transport,
            SendMail {
                subject: "subject".into(),
                body: "body".into(),
                from_email: Some("from@example.com".into()),
                to: Some(vec!["to@example.com"].into()),
                cc: Some(vec!["cc@example.com"].into()),
                bcc: Some(vec!["bcc@example.com"].into()),
                reply_to: Some("reply@example.com".into()),
                fail_silently: true,
                auth_user: Some("user".into()),
                auth_password: Some("password".into()),
                connection: Some(&connection),
                attachments: vec![Attachment::new("a.txt", "a")],
                headers: Some(Headers::from([("X-Tag".to_string(), "news".to_string())])),
            },
        )
        .await?;

        // the connection's count is returned as is
        assert_eq!(sent, 7);

        Ok(())
    }

    #[tokio::test]
    async fn test_connection_is_opened_with_credentials() -> TestResult {
        let mut transport = MockMailTransport::new();
        transport
            .expect_connection()
            .times(1)
            .withf(|options| {
                *options
                    == ConnectionOptions {
                        username: Some("user".into()),
                        password: Some("secret".into()),
                        fail_silently: true,
                    }
            })
            .returning(|_| Ok(accepting_connection()));

        let sent = send_mail2(
            &transport,
            SendMail {
                auth_user: Some("user".into()),
                auth_password: Some("secret".into()),
                fail_silently: true,
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(sent, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_default_connection_options() -> TestResult {
        let mut transport = MockMailTransport::new();
        transport
            .expect_connection()
            .times(1)
            .withf(|options| *options == ConnectionOptions::default())
            .returning(|_| Ok(accepting_connection()));

        send_mail2(&transport, SendMail::default()).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_reply_to() -> TestResult {
        let mailer = MemoryMailer::new();

        send_mail2(
            &mailer,
            SendMail {
                to: Some(vec!["a@a.cl"].into()),
                headers: Some(Headers::from([("X-Tag".to_string(), "news".to_string())])),
                ..Default::default()
            },
        )
        .await?;

        send_mail2(
            &mailer,
            SendMail {
                to: Some(vec!["a@a.cl"].into()),
                reply_to: Some("reply@example.com".into()),
                ..Default::default()
            },
        )
        .await?;

        let outbox = mailer.outbox().messages();
        assert!(!outbox[0].headers.contains_key(REPLY_TO));
        assert_eq!(outbox[0].headers["X-Tag"], "news");
        assert_eq!(
            outbox[1].headers,
            Headers::from([(REPLY_TO.to_string(), "reply@example.com".to_string())])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_real_call() -> TestResult {
        let mailer = MemoryMailer::new();
        let to = vec!["a@a.cl", "x@xx.com"];

        let sent = send_mail2(
            &mailer,
            SendMail {
                subject: "hello!".into(),
                body: "my email body".into(),
                to: Some(to.clone().into()),
                ..Default::default()
            },
        )
        .await?;

        let outbox = mailer.outbox().messages();
        assert_eq!(sent, 1);
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].to, to);
        assert!(outbox[0].body.contains("my email body"));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_addresses() -> TestResult {
        let mailer = MemoryMailer::new();
        let outbox = mailer.outbox();

        let mail = |to: AddressList| SendMail {
            subject: "hello!".into(),
            body: "my email body".into(),
            to: Some(to),
            ..Default::default()
        };

        // empty 'to' list: sends nothing
        assert_eq!(send_mail2(&mailer, mail(AddressList::new())).await?, 0);
        assert_eq!(outbox.len(), 0);

        // malformed addresses ARE sent
        for address in ["", " ", "x", "x@x"] {
            let before = outbox.len();
            send_mail2(&mailer, mail(vec![address].into())).await?;
            assert_eq!(outbox.len(), before + 1);
        }

        // a newline is rejected by the transport
        let result = send_mail2(&mailer, mail(vec!["\n"].into())).await;
        assert!(matches!(result, Err(MailerError::BadHeader { .. })));

        // non-text addresses are rejected before sending
        for address in [json!(null), json!(-15)] {
            let result = send_mail2(&mailer, mail(vec![address].into())).await;
            assert!(matches!(
                result,
                Err(MailerError::InvalidAddresses { field: "to", .. })
            ));
        }

        assert_eq!(outbox.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_validation_happens_before_connecting() {
        let mut transport = MockMailTransport::new();
        transport.expect_connection().times(0);

        let result = send_mail2(
            &transport,
            SendMail {
                to: Some(vec!["a@a.cl"].into()),
                bcc: Some(vec![json!(1)].into()),
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(MailerError::InvalidAddresses { field: "bcc", .. })
        ));
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let mut transport = MockMailTransport::new();
        transport.expect_connection().returning(|_| {
            let mut connection = MockMailConnection::new();
            connection
                .expect_send_messages()
                .returning(|_| Err(MailerError::SendError));
            Ok(connection)
        });

        let result = send_mail2(
            &transport,
            SendMail {
                to: Some(vec!["a@a.cl"].into()),
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(MailerError::SendError)));
    }
}
