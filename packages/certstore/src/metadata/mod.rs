//! Certificate metadata extraction
//!
//! Parses a DER certificate and derives the identity attributes stored with
//! every record. Extraction is pure: the same bytes always yield the same
//! owner, thumbprint and validity window.

mod owner;
mod thumbprint;

use chrono::{DateTime, Utc};
use thiserror::Error;
use x509_parser::prelude::*;

pub use thumbprint::{InvalidThumbprint, Thumbprint};

/// Errors raised when bytes are not a usable X.509 certificate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    /// No bytes were supplied
    #[error("Certificate is empty")]
    Empty,

    /// DER parsing failed
    #[error("Certificate parse error: {0}")]
    Parse(String),

    /// Bytes remain after the certificate structure
    #[error("Certificate has {count} trailing bytes")]
    TrailingData {
        /// Number of unexpected bytes
        count: usize,
    },

    /// An extension needed for owner derivation is malformed
    #[error("Certificate extension error: {0}")]
    Extension(String),

    /// A validity bound cannot be represented as an instant
    #[error("Certificate {field} is out of range: {timestamp}")]
    InvalidValidity {
        /// Which bound failed
        field: &'static str,
        /// Seconds since the Unix epoch
        timestamp: i64,
    },

    /// Neither alternative names nor the subject DN yield an identity
    #[error("Certificate carries no owner identity")]
    NoOwnerIdentity,
}

/// Result type for extraction
pub type Result<T> = std::result::Result<T, CertificateError>;

/// Identity attributes derived from a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateMetadata {
    owner: String,
    thumbprint: Thumbprint,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl CertificateMetadata {
    /// Derived owner identity
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// SHA-1 thumbprint of the DER encoding
    pub fn thumbprint(&self) -> &Thumbprint {
        &self.thumbprint
    }

    /// Start of the validity window
    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// End of the validity window
    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }
}

/// Parse `der` as a single X.509 certificate and derive its metadata
pub fn extract(der: &[u8]) -> Result<CertificateMetadata> {
    if der.is_empty() {
        return Err(CertificateError::Empty);
    }

    let (rest, cert) =
        X509Certificate::from_der(der).map_err(|e| CertificateError::Parse(e.to_string()))?;
    if !rest.is_empty() {
        return Err(CertificateError::TrailingData { count: rest.len() });
    }

    let owner = owner::derive_owner(&cert)?;
    let validity = cert.validity();

    Ok(CertificateMetadata {
        owner,
        thumbprint: Thumbprint::of_der(der),
        not_before: to_instant("notBefore", validity.not_before.timestamp())?,
        not_after: to_instant("notAfter", validity.not_after.timestamp())?,
    })
}

fn to_instant(field: &'static str, timestamp: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
        .ok_or(CertificateError::InvalidValidity { field, timestamp })
}
