//! Concrete implementations of the domain's seams.

pub mod email;
pub mod logging;
pub mod templates;
