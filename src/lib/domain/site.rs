//! Site configuration and the helpers depending on it

use clap::Parser;

mod context_processors;
mod urls;

pub use context_processors::{track_visit, Visitor, TRACK_VISIT};
pub use urls::{
    build_full_url, build_querystring, get_full_url, with_querystring, AbsoluteUrl, UrlError,
};

/// Site configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct SiteConfig {
    /// Domain the site is served from, e.g. `www.example.com`
    #[clap(long = "site-domain", env = "SITE_DOMAIN", default_value = "localhost")]
    pub domain: String,

    /// Protocol of full URLs, e.g. `https`
    #[clap(long = "site-protocol", env = "SITE_PROTOCOL", default_value = "http")]
    pub protocol: String,

    /// Running in debug mode
    #[clap(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Running under tests
    #[clap(long, env = "TESTING", default_value = "false")]
    pub testing: bool,
}

impl SiteConfig {
    /// Configuration for `domain`, served over plain HTTP
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            protocol: "http".to_string(),
            debug: false,
            testing: false,
        }
    }

    /// Use `protocol` for full URLs
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }
}
