//! Persistence port for certificate records
//!
//! The service depends only on [`CertificateRepository`]. Any conforming
//! implementation (a database adapter, the in-memory store below, or a
//! fault-injecting test double) can be substituted without changing service
//! logic.

mod memory;

use crate::metadata::Thumbprint;
use crate::model::{CertificateId, CertificateRecord, NewCertificate};
use std::collections::HashSet;
use std::future::Future;
use thiserror::Error;

pub use memory::MemoryCertificateRepository;

/// Repository failures. Every variant is a server-side fault from the
/// service's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Backend cannot be reached
    #[error("Repository unavailable: {reason}")]
    Unavailable {
        /// Reason for unavailability
        reason: String,
    },

    /// A storage constraint rejected the operation
    #[error("Constraint violation: {details}")]
    ConstraintViolation {
        /// Constraint details
        details: String,
    },

    /// Any other backend failure
    #[error("Repository backend error: {operation} failed - {details}")]
    Backend {
        /// The operation that failed
        operation: String,
        /// Detailed error information
        details: String,
    },
}

impl RepositoryError {
    /// Check if a later attempt could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RepositoryError::Unavailable { .. })
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage contract required by the certificate service.
///
/// Implementations must provide read-after-write consistency: an owner lookup
/// issued after a committed insert or delete observes it.
pub trait CertificateRepository: Send + Sync {
    /// Persist a new certificate and assign its id
    fn insert(
        &self,
        certificate: NewCertificate,
    ) -> impl Future<Output = RepositoryResult<CertificateRecord>> + Send;

    /// Remove every record whose id is in `ids` as one atomic unit.
    ///
    /// Ids that are not present are ignored. Returns the number of records
    /// removed. On error no record may have been removed.
    fn delete_by_ids(
        &self,
        ids: &HashSet<CertificateId>,
    ) -> impl Future<Output = RepositoryResult<usize>> + Send;

    /// Remove every record whose owner matches ignoring case, atomically
    fn delete_by_owner_ignore_case(
        &self,
        owner: &str,
    ) -> impl Future<Output = RepositoryResult<usize>> + Send;

    /// Records whose owner equals `owner` ignoring case
    fn find_by_owner_ignore_case(
        &self,
        owner: &str,
    ) -> impl Future<Output = RepositoryResult<Vec<CertificateRecord>>> + Send;

    /// The record with this owner (ignoring case) and thumbprint, if any
    fn find_by_owner_and_thumbprint(
        &self,
        owner: &str,
        thumbprint: &Thumbprint,
    ) -> impl Future<Output = RepositoryResult<Option<CertificateRecord>>> + Send;

    /// Every stored record
    fn find_all(&self) -> impl Future<Output = RepositoryResult<Vec<CertificateRecord>>> + Send;
}
