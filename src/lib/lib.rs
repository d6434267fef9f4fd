#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Helper utilities for web applications: email composition and delivery,
//! template-driven messages, URL and hex helpers and a logging filter.

pub mod domain;
pub mod infrastructure;
