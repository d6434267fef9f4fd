//! Sending emails rendered from templates

use tracing::error;

use crate::domain::communication::templates::{RenderError, TemplateContext, TemplateRenderer};

use super::{Email, EmailOptions, MailTransport};

/// Names of the templates an email is rendered from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateNames<'a> {
    /// Subject template; line breaks in its output are dropped
    pub subject: &'a str,

    /// Plain text body template
    pub body: &'a str,

    /// HTML body template, for a multipart HTML email
    pub html_body: Option<&'a str>,
}

impl<'a> TemplateNames<'a> {
    /// Templates for a plain text email
    pub fn plain(subject: &'a str, body: &'a str) -> Self {
        Self {
            subject,
            body,
            html_body: None,
        }
    }

    /// Templates for a multipart HTML email
    pub fn html(subject: &'a str, body: &'a str, html_body: &'a str) -> Self {
        Self {
            subject,
            body,
            html_body: Some(html_body),
        }
    }
}

struct Rendered {
    subject: String,
    body: String,
    html_body: Option<String>,
}

/// Line boundaries dropped from a rendered subject
fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn render<R: TemplateRenderer>(
    renderer: &R,
    context: &TemplateContext,
    templates: &TemplateNames<'_>,
) -> Result<Rendered, RenderError> {
    let subject = renderer
        .render(templates.subject, context)?
        .split(is_line_boundary)
        .collect::<String>();
    let body = renderer.render(templates.body, context)?;
    let html_body = templates
        .html_body
        .map(|name| renderer.render(name, context))
        .transpose()?;

    Ok(Rendered {
        subject,
        body,
        html_body,
    })
}

/// Send an email by rendering the subject and body templates with `context`.
///
/// The email is plain text or multipart HTML depending on whether
/// `templates.html_body` is set. `options` is passed to the email as is
/// (recipients, headers, attachments, connection...); addresses must be
/// validated beforehand.
///
/// Never fails: rendering and sending errors are logged.
///
/// # Returns
/// `true` if at least one message was sent, `false` otherwise.
pub async fn send_templated_mail<T, R>(
    transport: &T,
    renderer: &R,
    context: &TemplateContext,
    templates: &TemplateNames<'_>,
    options: EmailOptions<'_, T::Connection>,
) -> bool
where
    T: MailTransport,
    R: TemplateRenderer,
{
    let rendered = match render(renderer, context, templates) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!(
                error = %e,
                subject_template = templates.subject,
                body_template = templates.body,
                html_body_template = ?templates.html_body,
                ?context,
                "Failed to render body or subject"
            );
            return false;
        }
    };

    let email = match rendered.html_body {
        None => Email::plain(rendered.subject, rendered.body, options),
        Some(html_body) => Email::html(html_body, rendered.subject, rendered.body, options),
    };

    match email.send(transport).await {
        Ok(0) => {
            error!(?email, "No mail was sent");
            false
        }
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, ?email, "send_templated_mail failed");
            false
        }
    }
}
