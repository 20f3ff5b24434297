//! Certificate service
//!
//! Orchestrates ingestion, lookup and deletion over a [`CertificateRepository`].
//! The service keeps no state of its own between calls; every failure from
//! the codec, the extractor or the repository is returned to the caller as a
//! [`ServiceError`], and nothing is retried here.

mod status;

use crate::config::StoreConfig;
use crate::container::{self, ContainerError};
use crate::error::{Result, ServiceError};
use crate::logging::log_audit_event;
use crate::metadata::{self, Thumbprint};
use crate::model::{CertificateId, CertificateRecord, NewCertificate};
use crate::repository::CertificateRepository;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub use status::{
    lookup_status, respond_collection, ServiceMethodError, StatusCode, StatusTranslation,
};

/// Certificate repository service
#[derive(Debug)]
pub struct CertificateService<R> {
    repository: Arc<R>,
    config: StoreConfig,
}

impl<R> Clone for CertificateService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}

impl<R: CertificateRepository> CertificateService<R> {
    /// Service over `repository` with default configuration
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_config(repository, StoreConfig::default())
    }

    /// Service over `repository` with explicit configuration
    pub fn with_config(repository: Arc<R>, config: StoreConfig) -> Self {
        Self { repository, config }
    }

    /// The injected repository
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Ingest a raw payload: a bare DER certificate or a container envelope.
    ///
    /// Owner, thumbprint and validity are derived from the certificate; the
    /// record is persisted with status `New` and returned with its id.
    pub async fn add_certificate(&self, raw: impl Into<Vec<u8>>) -> Result<CertificateRecord> {
        let data = raw.into();
        debug!(len = data.len(), "adding certificate");

        if data.len() > self.config.max_container_bytes {
            return Err(reject(
                ContainerError::Oversized {
                    len: data.len(),
                    max: self.config.max_container_bytes,
                }
                .into(),
            ));
        }

        let container = container::decode(&data).map_err(|e| reject(e.into()))?;
        let metadata = metadata::extract(container.certificate()).map_err(|e| reject(e.into()))?;

        if self.config.reject_duplicates {
            let existing = self
                .repository
                .find_by_owner_and_thumbprint(metadata.owner(), metadata.thumbprint())
                .await
                .map_err(|e| fault(ServiceError::persistence("find_by_owner_and_thumbprint")(e)))?;

            if let Some(existing) = existing {
                return Err(reject(ServiceError::AlreadyExists {
                    owner: existing.owner().to_string(),
                    thumbprint: existing.thumbprint().clone(),
                    id: existing.id(),
                }));
            }
        }

        let certificate =
            NewCertificate::new(data, container.has_wrapped_key(), metadata, Utc::now());
        let record = self
            .repository
            .insert(certificate)
            .await
            .map_err(|e| fault(ServiceError::persistence("insert")(e)))?;

        info!(
            id = %record.id(),
            owner = %record.owner(),
            thumbprint = %record.thumbprint(),
            private_key = record.has_private_key(),
            "certificate added"
        );
        log_audit_event(
            "CERTIFICATE_ADD",
            &format!("id={} owner={}", record.id(), record.owner()),
            true,
        );
        Ok(record)
    }

    /// Delete every certificate whose id is in `ids` with a single bulk call.
    ///
    /// Unknown ids are ignored. The call either fails as a whole or succeeds
    /// as a whole; an empty set succeeds without touching the repository.
    pub async fn delete_certificates_by_ids(&self, ids: &HashSet<CertificateId>) -> Result<()> {
        if ids.is_empty() {
            debug!("empty id set, nothing to delete");
            return Ok(());
        }

        let removed = self.repository.delete_by_ids(ids).await.map_err(|e| {
            log_audit_event(
                "CERTIFICATE_DELETE",
                &format!("requested={}", ids.len()),
                false,
            );
            fault(ServiceError::persistence("delete_by_ids")(e))
        })?;

        info!(requested = ids.len(), removed, "certificates deleted by id");
        log_audit_event(
            "CERTIFICATE_DELETE",
            &format!("requested={} removed={removed}", ids.len()),
            true,
        );
        Ok(())
    }

    /// Delete every certificate owned by `owner` (ignoring case); returns how
    /// many were removed
    pub async fn delete_certificates_by_owner(&self, owner: &str) -> Result<usize> {
        let removed = self
            .repository
            .delete_by_owner_ignore_case(owner)
            .await
            .map_err(|e| fault(ServiceError::persistence("delete_by_owner_ignore_case")(e)))?;

        info!(owner, removed, "certificates deleted by owner");
        log_audit_event(
            "CERTIFICATE_DELETE",
            &format!("owner={owner} removed={removed}"),
            true,
        );
        Ok(removed)
    }

    /// Certificates whose owner equals `owner` ignoring case.
    ///
    /// No match is an empty vector, not an error.
    pub async fn get_certificates_by_owner(&self, owner: &str) -> Result<Vec<CertificateRecord>> {
        let records = self
            .repository
            .find_by_owner_ignore_case(owner)
            .await
            .map_err(|e| fault(ServiceError::persistence("find_by_owner_ignore_case")(e)))?;

        debug!(owner, found = records.len(), "owner lookup");
        Ok(records)
    }

    /// The certificate with this owner (ignoring case) and thumbprint.
    ///
    /// A thumbprint that is not 40 hex characters cannot match anything and
    /// yields `None`.
    pub async fn get_certificate_by_owner_and_thumbprint(
        &self,
        owner: &str,
        thumbprint: &str,
    ) -> Result<Option<CertificateRecord>> {
        let Ok(thumbprint) = thumbprint.parse::<Thumbprint>() else {
            debug!(owner, thumbprint, "lookup with malformed thumbprint");
            return Ok(None);
        };

        self.repository
            .find_by_owner_and_thumbprint(owner, &thumbprint)
            .await
            .map_err(|e| fault(ServiceError::persistence("find_by_owner_and_thumbprint")(e)))
    }

    /// Every stored certificate
    pub async fn get_all_certificates(&self) -> Result<Vec<CertificateRecord>> {
        self.repository
            .find_all()
            .await
            .map_err(|e| fault(ServiceError::persistence("find_all")(e)))
    }
}

/// Log a client-side rejection and hand the error back
fn reject(error: ServiceError) -> ServiceError {
    warn!(error = %error, "certificate request rejected");
    error
}

/// Log a repository fault and hand the error back
fn fault(error: ServiceError) -> ServiceError {
    error!(
        error = %error,
        recoverable = error.is_recoverable(),
        "certificate repository fault"
    );
    error
}
