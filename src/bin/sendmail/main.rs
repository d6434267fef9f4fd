#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Send an email rendered from templates

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use app_utils::{
    domain::communication::{
        email_addresses::normalize_email,
        mailer::{send_templated_mail, EmailOptions, TemplateNames},
        templates::TemplateContext,
    },
    infrastructure::{
        email::smtp::{SmtpConfig, SmtpMailer},
        logging,
        templates::tera::TeraRenderer,
    },
};
use clap::Parser;
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// Directory holding the templates
    #[clap(long, env = "TEMPLATE_DIR", default_value = "templates")]
    pub template_dir: PathBuf,

    /// Subject template name
    #[clap(long)]
    pub subject_template: String,

    /// Plain text body template name
    #[clap(long)]
    pub body_template: String,

    /// HTML body template name, for a multipart HTML email
    #[clap(long)]
    pub html_template: Option<String>,

    /// Template context, as a JSON object
    #[clap(long, default_value = "{}")]
    pub context: String,

    /// Sender, the configured SMTP sender if unset
    #[clap(long)]
    pub from: Option<String>,

    /// Recipients
    #[clap(long, required = true)]
    pub to: Vec<String>,

    /// Carbon-copy recipients
    #[clap(long)]
    pub cc: Vec<String>,

    /// Blind carbon-copy recipients
    #[clap(long)]
    pub bcc: Vec<String>,

    /// Address replies should go to
    #[clap(long)]
    pub reply_to: Option<String>,
}

fn normalized(addresses: &[String]) -> Vec<String> {
    addresses.iter().map(|a| normalize_email(a)).collect()
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    logging::init();

    let args = Args::parse();

    let context: TemplateContext =
        serde_json::from_str(&args.context).context("--context must be a JSON object")?;

    let renderer = TeraRenderer::new(&args.template_dir)
        .with_context(|| format!("failed to load templates from {}", args.template_dir.display()))?;

    let mailer = SmtpMailer::new(args.smtp);

    let templates = TemplateNames {
        subject: &args.subject_template,
        body: &args.body_template,
        html_body: args.html_template.as_deref(),
    };

    let options = EmailOptions {
        from_email: args.from,
        to: normalized(&args.to),
        cc: normalized(&args.cc),
        bcc: normalized(&args.bcc),
        reply_to: args.reply_to,
        ..Default::default()
    };

    if !send_templated_mail(&mailer, &renderer, &context, &templates, options).await {
        bail!("the email was not sent");
    }

    info!(to = ?args.to, "email sent");

    Ok(())
}
