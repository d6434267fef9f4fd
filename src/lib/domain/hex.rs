//! Hex values, hashes and random keys

use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use thiserror::Error;
use uuid::Uuid;

lazy_static! {
    /// 6 hex digits
    pub static ref HEX_6_RE: Regex = Regex::new(r"^[a-f0-9]{6}$").unwrap();

    /// 32 hex digits, e.g. a version 4 UUID
    pub static ref HEX_32_RE: Regex = Regex::new(r"^[a-f0-9]{32}$").unwrap();

    /// 40 hex digits, e.g. a SHA-1 digest
    pub static ref HEX_40_RE: Regex = Regex::new(r"^[a-f0-9]{40}$").unwrap();
}

/// 40 lower-case hex digits of the SHA-1 digest of `salt` followed by `value`
pub fn hex_sha1(salt: &[u8], value: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(salt);
    hasher.update(value);

    format!("{:x}", hasher.finalize())
}

/// 32 hex digits from a random version 4 UUID
pub fn random_hex_32() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The first 6 digits of [`random_hex_32`]
pub fn random_hex_6() -> String {
    let mut hex = random_hex_32();
    hex.truncate(6);
    hex
}

/// A string that isn't the expected hex key
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected {expected} lower-case hex digits, got {value:?}")]
pub struct HexError {
    /// Number of digits the key should have
    pub expected: usize,

    /// The rejected input
    pub value: String,
}

macro_rules! hex_key {
    ($(#[$meta:meta])* $name:ident, $len:literal, $re:ident, $random:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Number of hex digits
            pub const LEN: usize = $len;

            /// A new random key
            pub fn random() -> Self {
                Self($random())
            }

            /// The key as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::random()
            }
        }

        impl FromStr for $name {
            type Err = HexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if $re.is_match(s) {
                    Ok(Self(s.to_string()))
                } else {
                    Err(HexError {
                        expected: $len,
                        value: s.to_string(),
                    })
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = HexError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

hex_key!(
    /// 32-hex-digit key, practical for hash keys. Random keys come from a
    /// version 4 UUID, so repeats are very unlikely but not impossible:
    /// enforce uniqueness where they are stored.
    Hex32,
    32,
    HEX_32_RE,
    random_hex_32
);

hex_key!(
    /// 6-hex-digit key
    Hex6,
    6,
    HEX_6_RE,
    random_hex_6
);
