//! Email addresses module.

mod address_list;
mod email_address;

pub use address_list::{validate_addresses, AddressList};
pub use email_address::{normalize_email, EmailAddress, EmailAddressError};
