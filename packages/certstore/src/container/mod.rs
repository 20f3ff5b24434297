//! Certificate container codec
//!
//! Raw certificate payloads come in two shapes:
//!
//! - a bare DER certificate, stored exactly as received
//! - an envelope bundling a wrapped private key with the certificate
//!
//! Envelope layout (all lengths are big-endian `u32`):
//!
//! ```text
//! +------------+------------------+------------+------------------+
//! | key length | wrapped key      | cert length| certificate DER  |
//! | 4 bytes    | key length bytes | 4 bytes    | cert length bytes|
//! +------------+------------------+------------+------------------+
//! ```
//!
//! A bare certificate always starts with the DER SEQUENCE tag `0x30` and its
//! length header covers the whole input. Wrapped keys are capped at
//! [`MAX_WRAPPED_KEY_LEN`], so the first byte of an envelope is always `0x00`
//! and the two shapes never collide.

mod codec;

use thiserror::Error;

pub use codec::{decode, encode};

/// Upper bound (exclusive) on the size of a wrapped key blob inside an envelope
pub const MAX_WRAPPED_KEY_LEN: usize = 16 * 1024 * 1024;

/// Errors raised when a raw payload is not a well-framed container
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// No bytes were supplied
    #[error("Container is empty")]
    Empty,

    /// A length field or payload runs past the end of the input
    #[error("Truncated {field}: expected {expected} bytes, {available} available")]
    Truncated {
        /// Envelope field being read
        field: &'static str,
        /// Bytes the field requires
        expected: usize,
        /// Bytes left in the input
        available: usize,
    },

    /// The envelope declares an empty certificate
    #[error("Container holds no certificate")]
    MissingCertificate,

    /// Bytes remain after the certificate payload
    #[error("Container has {count} trailing bytes after the certificate")]
    TrailingBytes {
        /// Number of unexpected bytes
        count: usize,
    },

    /// Wrapped key is at or above [`MAX_WRAPPED_KEY_LEN`]
    #[error("Wrapped key of {len} bytes exceeds the {max} byte limit")]
    WrappedKeyTooLarge {
        /// Declared or supplied key length
        len: usize,
        /// Maximum accepted length
        max: usize,
    },

    /// Certificate bytes are not exactly one DER SEQUENCE
    #[error("Certificate is not a single DER SEQUENCE")]
    NotDerSequence,

    /// Payload is larger than the configured limit
    #[error("Container of {len} bytes exceeds the {max} byte limit")]
    Oversized {
        /// Payload length
        len: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Result type for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;

/// Decoded certificate payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertContainer {
    certificate: Vec<u8>,
    wrapped_key: Option<Vec<u8>>,
}

impl CertContainer {
    /// Container holding only a certificate
    pub fn bare(certificate: impl Into<Vec<u8>>) -> Self {
        Self {
            certificate: certificate.into(),
            wrapped_key: None,
        }
    }

    /// Container holding a certificate and its wrapped key
    pub fn with_wrapped_key(certificate: impl Into<Vec<u8>>, wrapped_key: impl Into<Vec<u8>>) -> Self {
        Self {
            certificate: certificate.into(),
            wrapped_key: Some(wrapped_key.into()),
        }
    }

    /// DER encoding of the certificate
    pub fn certificate(&self) -> &[u8] {
        &self.certificate
    }

    /// Opaque wrapped key bytes, if present
    pub fn wrapped_key(&self) -> Option<&[u8]> {
        self.wrapped_key.as_deref()
    }

    /// Whether a wrapped key travels with the certificate
    pub fn has_wrapped_key(&self) -> bool {
        self.wrapped_key.is_some()
    }

    /// Re-encode into the raw payload form
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(&self.certificate, self.wrapped_key.as_deref())
    }
}
