//! # Certstore
//!
//! Certificate repository core. Stores X.509 certificates, optionally bundled
//! with an opaque wrapped private key, and indexes them by the identity
//! derived from the certificate itself.
//!
//! ## Features
//!
//! - **Container codec**: bare DER certificates or a length-framed envelope
//!   carrying a certificate plus a wrapped key
//! - **Metadata extraction**: owner, SHA-1 thumbprint and validity window
//!   derived from the parsed certificate, never supplied by callers
//! - **Repository port**: async persistence contract with an in-memory
//!   adapter that deletes id sets atomically
//! - **Status translation**: domain errors mapped to transport status codes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use certstore::{CertificateService, MemoryCertificateRepository};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = CertificateService::new(Arc::new(MemoryCertificateRepository::new()));
//!
//! let record = service.add_certificate(std::fs::read("gm2552.der")?).await?;
//! let found = service.get_certificates_by_owner("GM2552@securehealthemail.com").await?;
//! assert_eq!(found[0].id(), record.id());
//!
//! service.delete_certificates_by_ids(&[record.id()].into_iter().collect()).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod container;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod model;
pub mod repository;
pub mod service;

// Re-export core types
pub use config::{ConfigError, StoreConfig};
pub use container::{CertContainer, ContainerError};
pub use error::{Result, ServiceError};
pub use metadata::{CertificateError, CertificateMetadata, Thumbprint};
pub use model::{CertificateId, CertificateRecord, EntityStatus, NewCertificate};
pub use repository::{
    CertificateRepository, MemoryCertificateRepository, RepositoryError, RepositoryResult,
};
pub use service::{CertificateService, ServiceMethodError, StatusCode, StatusTranslation};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CertContainer, CertificateId, CertificateRecord, CertificateRepository,
        CertificateService, EntityStatus, MemoryCertificateRepository, Result, ServiceError,
        StatusCode, StatusTranslation, StoreConfig,
    };
}
