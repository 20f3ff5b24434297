//! In-memory repository adapter

use super::{CertificateRepository, RepositoryResult};
use crate::metadata::Thumbprint;
use crate::model::{owner_key, CertificateId, CertificateRecord, NewCertificate};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;

/// Repository holding records in process memory.
///
/// Records and the owner index live behind one lock, so inserts and bulk
/// deletes update both under a single write guard and readers never observe
/// a partially applied change. Iteration follows insertion order.
#[derive(Debug, Default)]
pub struct MemoryCertificateRepository {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_seq: u64,
    /// Records keyed by insertion sequence
    records: BTreeMap<u64, CertificateRecord>,
    ids: HashMap<CertificateId, u64>,
    /// Lowercased owner to insertion sequences
    owners: HashMap<String, BTreeSet<u64>>,
}

impl Inner {
    fn insert(&mut self, certificate: NewCertificate) -> CertificateRecord {
        let mut id = CertificateId::generate();
        while self.ids.contains_key(&id) {
            id = CertificateId::generate();
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let record = certificate.into_record(id);
        self.ids.insert(id, seq);
        self.owners
            .entry(owner_key(record.owner()))
            .or_default()
            .insert(seq);
        self.records.insert(seq, record.clone());
        record
    }

    fn remove_seq(&mut self, seq: u64) -> bool {
        let Some(record) = self.records.remove(&seq) else {
            return false;
        };
        self.ids.remove(&record.id());

        let key = owner_key(record.owner());
        if let Some(seqs) = self.owners.get_mut(&key) {
            seqs.remove(&seq);
            if seqs.is_empty() {
                self.owners.remove(&key);
            }
        }
        true
    }

    fn owner_seqs(&self, owner: &str) -> Vec<u64> {
        self.owners
            .get(&owner_key(owner))
            .map(|seqs| seqs.iter().copied().collect())
            .unwrap_or_default()
    }

    fn by_owner(&self, owner: &str) -> impl Iterator<Item = &CertificateRecord> + '_ {
        self.owner_seqs(owner)
            .into_iter()
            .filter_map(move |seq| self.records.get(&seq))
    }
}

impl MemoryCertificateRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Whether the repository holds no records
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

impl CertificateRepository for MemoryCertificateRepository {
    async fn insert(&self, certificate: NewCertificate) -> RepositoryResult<CertificateRecord> {
        let mut inner = self.inner.write().await;
        Ok(inner.insert(certificate))
    }

    async fn delete_by_ids(&self, ids: &HashSet<CertificateId>) -> RepositoryResult<usize> {
        let mut inner = self.inner.write().await;

        let seqs: Vec<u64> = ids
            .iter()
            .filter_map(|id| inner.ids.get(id).copied())
            .collect();
        let removed = seqs
            .into_iter()
            .filter(|seq| inner.remove_seq(*seq))
            .count();

        debug!(requested = ids.len(), removed, "bulk delete applied");
        Ok(removed)
    }

    async fn delete_by_owner_ignore_case(&self, owner: &str) -> RepositoryResult<usize> {
        let mut inner = self.inner.write().await;

        let seqs = inner.owner_seqs(owner);
        let removed = seqs
            .into_iter()
            .filter(|seq| inner.remove_seq(*seq))
            .count();
        Ok(removed)
    }

    async fn find_by_owner_ignore_case(&self, owner: &str) -> RepositoryResult<Vec<CertificateRecord>> {
        let inner = self.inner.read().await;
        let records = inner.by_owner(owner).cloned().collect();
        Ok(records)
    }

    async fn find_by_owner_and_thumbprint(
        &self,
        owner: &str,
        thumbprint: &Thumbprint,
    ) -> RepositoryResult<Option<CertificateRecord>> {
        let inner = self.inner.read().await;
        let found = inner
            .by_owner(owner)
            .find(|record| record.thumbprint() == thumbprint)
            .cloned();
        Ok(found)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<CertificateRecord>> {
        let inner = self.inner.read().await;
        let records = inner.records.values().cloned().collect();
        Ok(records)
    }
}
