//! Mail transports

pub mod memory;
pub mod smtp;
