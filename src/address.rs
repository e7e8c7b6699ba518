//! Contract address newtype.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A 20-byte account address in its `0x`-prefixed hex form.
///
/// The original casing is kept so that a checksummed input round-trips
/// unchanged into generated files and command lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

/// Why a string is not an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The `0x` prefix is missing.
    #[error("address must start with 0x")]
    MissingPrefix,
    /// Wrong number of hex digits after the prefix.
    #[error("address must have 40 hex digits after 0x, found {0}")]
    BadLength(usize),
    /// A non-hex character appears after the prefix.
    #[error("address contains non-hex character {0:?}")]
    NonHex(char),
}

impl Address {
    /// Returns the address as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares two addresses ignoring checksum casing.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(AddressError::NonHex(bad));
        }
        if hex.len() != 40 {
            return Err(AddressError::BadLength(hex.len()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
