//! Certificate thumbprints

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// Length of a SHA-1 digest rendered as hex
const THUMBPRINT_HEX_LEN: usize = 40;

/// Lowercase hex SHA-1 digest of a certificate's DER encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Thumbprint(String);

impl Thumbprint {
    /// Digest the full DER encoding of a certificate
    pub fn of_der(der: &[u8]) -> Self {
        Self(hex::encode(Sha1::digest(der)))
    }

    /// Hex form of the digest
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error for strings that are not a 40-character hex digest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid thumbprint: {0}")]
pub struct InvalidThumbprint(String);

impl FromStr for Thumbprint {
    type Err = InvalidThumbprint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != THUMBPRINT_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidThumbprint(s.to_string()));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Thumbprint {
    type Error = InvalidThumbprint;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Thumbprint> for String {
    fn from(value: Thumbprint) -> Self {
        value.0
    }
}
