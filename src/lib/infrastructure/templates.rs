//! Template engines

pub mod tera;
