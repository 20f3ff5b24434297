//! Shared fixtures and repository doubles for integration tests

#![allow(dead_code)]

use certstore::repository::{
    CertificateRepository, MemoryCertificateRepository, RepositoryError, RepositoryResult,
};
use certstore::{CertificateId, CertificateRecord, NewCertificate, Thumbprint};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Self-signed cert, RFC-822 SAN gm2552@securehealthemail.com
pub const GM2552_DER: &[u8] = include_bytes!("../fixtures/gm2552.der");
/// PKCS#8 private key for gm2552, standing in for a wrapped key blob
pub const GM2552_KEY_DER: &[u8] = include_bytes!("../fixtures/gm2552Key.der");
/// Self-signed cert, RFC-822 SAN umesh@securehealthemail.com
pub const UMESH_DER: &[u8] = include_bytes!("../fixtures/umesh.der");
/// RFC-822 SAN Alice.Smith@Example.COM plus DNS SAN mail.example.com
pub const MIXEDCASE_DER: &[u8] = include_bytes!("../fixtures/mixedcase.der");
/// No SAN, subject emailAddress bob.jones@example.org
pub const EMAILATTR_DER: &[u8] = include_bytes!("../fixtures/emailattr.der");
/// DNS SAN direct.example.org only
pub const DOMAIN_DER: &[u8] = include_bytes!("../fixtures/domain.der");
/// No SAN and no email attribute
pub const DNONLY_DER: &[u8] = include_bytes!("../fixtures/dnonly.der");
/// SANs DNS multi.example.net, email first@example.net, email
/// second@example.net; subject emailAddress subject@example.net
pub const MULTISAN_DER: &[u8] = include_bytes!("../fixtures/multisan.der");
/// DNS SAN host.example.org; subject emailAddress carol@example.org
pub const EMAILDNS_DER: &[u8] = include_bytes!("../fixtures/emaildns.der");

pub const GM2552_OWNER: &str = "gm2552@securehealthemail.com";
pub const GM2552_THUMBPRINT: &str = "f5982e118fff21ef657e474a23bcf4a44b7745c5";
pub const GM2552_NOT_BEFORE: i64 = 1_792_204_120;
pub const GM2552_NOT_AFTER: i64 = 2_107_564_120;

pub const UMESH_OWNER: &str = "umesh@securehealthemail.com";
pub const UMESH_THUMBPRINT: &str = "f12c88725f57a7714dbe146c58b29ef9b830e85b";

/// Envelope carrying the gm2552 certificate and its key
pub fn gm2552_with_wrapped_key() -> Vec<u8> {
    certstore::container::encode(GM2552_DER, Some(GM2552_KEY_DER))
        .expect("fixture certificate is a DER SEQUENCE")
}

/// Repository operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Insert,
    DeleteByIds,
    DeleteByOwner,
    FindByOwner,
    FindByOwnerAndThumbprint,
    FindAll,
}

/// Memory repository that fails selected operations before touching state
#[derive(Debug, Default)]
pub struct FaultyRepository {
    inner: MemoryCertificateRepository,
    failing: Mutex<HashSet<Operation>>,
    bulk_delete_calls: AtomicUsize,
}

impl FaultyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, operation: Operation) {
        self.failing
            .lock()
            .expect("failure set lock poisoned")
            .insert(operation);
    }

    pub fn heal(&self) {
        self.failing
            .lock()
            .expect("failure set lock poisoned")
            .clear();
    }

    pub fn bulk_delete_calls(&self) -> usize {
        self.bulk_delete_calls.load(Ordering::SeqCst)
    }

    fn check(&self, operation: Operation) -> RepositoryResult<()> {
        let failing = self
            .failing
            .lock()
            .expect("failure set lock poisoned")
            .contains(&operation);
        if failing {
            return Err(RepositoryError::Backend {
                operation: format!("{operation:?}"),
                details: "injected fault".to_string(),
            });
        }
        Ok(())
    }
}

impl CertificateRepository for FaultyRepository {
    async fn insert(&self, certificate: NewCertificate) -> RepositoryResult<CertificateRecord> {
        self.check(Operation::Insert)?;
        self.inner.insert(certificate).await
    }

    async fn delete_by_ids(&self, ids: &HashSet<CertificateId>) -> RepositoryResult<usize> {
        self.bulk_delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check(Operation::DeleteByIds)?;
        self.inner.delete_by_ids(ids).await
    }

    async fn delete_by_owner_ignore_case(&self, owner: &str) -> RepositoryResult<usize> {
        self.check(Operation::DeleteByOwner)?;
        self.inner.delete_by_owner_ignore_case(owner).await
    }

    async fn find_by_owner_ignore_case(&self, owner: &str) -> RepositoryResult<Vec<CertificateRecord>> {
        self.check(Operation::FindByOwner)?;
        self.inner.find_by_owner_ignore_case(owner).await
    }

    async fn find_by_owner_and_thumbprint(
        &self,
        owner: &str,
        thumbprint: &Thumbprint,
    ) -> RepositoryResult<Option<CertificateRecord>> {
        self.check(Operation::FindByOwnerAndThumbprint)?;
        self.inner.find_by_owner_and_thumbprint(owner, thumbprint).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<CertificateRecord>> {
        self.check(Operation::FindAll)?;
        self.inner.find_all().await
    }
}
