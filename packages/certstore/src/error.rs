//! Service-level error type

use crate::container::ContainerError;
use crate::metadata::{CertificateError, Thumbprint};
use crate::model::CertificateId;
use crate::repository::RepositoryError;

/// Errors surfaced by the certificate service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Raw payload is not a well-framed container
    #[error("Malformed certificate container: {0}")]
    MalformedContainer(#[from] ContainerError),
    /// Certificate bytes are not a usable X.509 certificate
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(#[from] CertificateError),
    /// A record with the same owner and thumbprint is already stored
    #[error("Certificate already exists: owner={owner}, thumbprint={thumbprint}, id={id}")]
    AlreadyExists {
        /// Owner of the stored record
        owner: String,
        /// Shared thumbprint
        thumbprint: Thumbprint,
        /// Id of the stored record
        id: CertificateId,
    },
    /// The repository failed
    #[error("Persistence error during {operation}: {source}")]
    Persistence {
        /// Repository operation that failed
        operation: &'static str,
        /// Underlying repository error
        #[source]
        source: RepositoryError,
    },
}

impl ServiceError {
    /// Wrap a repository failure for the named port operation
    pub fn persistence(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| ServiceError::Persistence { operation, source }
    }

    /// True when the caller supplied bad input
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, ServiceError::Persistence { .. })
    }

    /// True for repository failures
    pub fn is_persistence(&self) -> bool {
        matches!(self, ServiceError::Persistence { .. })
    }

    /// True when retrying the same request later could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ServiceError::Persistence { source, .. } if source.is_recoverable())
    }
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
