//! Loosely-typed address lists

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::communication::mailer::MailerError;

use super::EmailAddress;

/// A list of address-like values, as received from callers or JSON payloads.
///
/// Nothing about the elements is guaranteed until the list has gone through
/// [`validate_addresses`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressList(Vec<Value>);

impl AddressList {
    /// Creates an empty address list
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw values of the list
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Number of values in the list
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no values
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for AddressList {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<Vec<String>> for AddressList {
    fn from(addresses: Vec<String>) -> Self {
        addresses.into_iter().collect()
    }
}

impl From<Vec<&str>> for AddressList {
    fn from(addresses: Vec<&str>) -> Self {
        addresses.into_iter().map(String::from).collect()
    }
}

impl From<Vec<EmailAddress>> for AddressList {
    fn from(addresses: Vec<EmailAddress>) -> Self {
        addresses.into_iter().map(String::from).collect()
    }
}

impl FromIterator<String> for AddressList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().map(Value::String).collect())
    }
}

/// Checks that `addresses` can be joined in a single string and returns them as text.
///
/// Only the element types are checked: `""`, `"x"` or `"x@x"` all pass. The
/// `field` name (e.g. `"to"`) is reported back in the error.
pub fn validate_addresses(
    field: &'static str,
    addresses: &AddressList,
) -> Result<Vec<String>, MailerError> {
    addresses
        .0
        .iter()
        .map(|value| value.as_str().map(str::to_owned))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| MailerError::InvalidAddresses {
            field,
            addresses: Value::Array(addresses.0.clone()).to_string(),
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_text_addresses_are_valid() -> TestResult {
        let addresses = AddressList::from(vec!["a@a.cl", "", " ", "x", "x@x"]);

        let validated = validate_addresses("to", &addresses)?;

        assert_eq!(validated, vec!["a@a.cl", "", " ", "x", "x@x"]);

        Ok(())
    }

    #[test]
    fn test_empty_list_is_valid() -> TestResult {
        assert!(validate_addresses("cc", &AddressList::new())?.is_empty());

        Ok(())
    }

    #[test]
    fn test_non_text_addresses_are_invalid() {
        for value in [json!(null), json!(-15), json!(["a@a.cl"]), json!({"a": 1})] {
            let addresses = AddressList::from(vec![json!("a@a.cl"), value]);

            let result = validate_addresses("bcc", &addresses);

            assert!(matches!(
                result,
                Err(MailerError::InvalidAddresses { field: "bcc", .. })
            ));
        }
    }

    #[test]
    fn test_error_names_the_collection() {
        let addresses = AddressList::from(vec![json!(null)]);

        let err = validate_addresses("to", &addresses).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("`to`"));
        assert!(message.contains("[null]"));
    }

    #[test]
    fn test_from_email_addresses() -> TestResult {
        let addresses = AddressList::from(vec![EmailAddress::new("pedro@perez.cl")?]);

        assert_eq!(addresses.values(), &[json!("pedro@perez.cl")]);

        Ok(())
    }
}
