//! Stored certificate records

use crate::container::{self, CertContainer, ContainerError};
use crate::metadata::{CertificateMetadata, Thumbprint};
use crate::model::EntityStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier assigned by the persistence layer on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(Uuid);

impl CertificateId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CertificateId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Lowercased owner used as the case-insensitive lookup key
pub fn owner_key(owner: &str) -> String {
    owner.to_lowercase()
}

/// Certificate ready to be persisted, before an id has been assigned.
///
/// Only the service builds these, from metadata it derived itself, so a
/// repository never sees caller-supplied owners or thumbprints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCertificate {
    data: Vec<u8>,
    owner: String,
    thumbprint: Thumbprint,
    status: EntityStatus,
    valid_start_date: DateTime<Utc>,
    valid_end_date: DateTime<Utc>,
    private_key_present: bool,
    create_time: DateTime<Utc>,
}

impl NewCertificate {
    pub(crate) fn new(
        data: Vec<u8>,
        private_key_present: bool,
        metadata: CertificateMetadata,
        create_time: DateTime<Utc>,
    ) -> Self {
        Self {
            data,
            owner: metadata.owner().to_string(),
            thumbprint: metadata.thumbprint().clone(),
            status: EntityStatus::New,
            valid_start_date: metadata.not_before(),
            valid_end_date: metadata.not_after(),
            private_key_present,
            create_time,
        }
    }

    /// Derived owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Derived thumbprint
    pub fn thumbprint(&self) -> &Thumbprint {
        &self.thumbprint
    }

    /// Attach the persistence-assigned id
    pub fn into_record(self, id: CertificateId) -> CertificateRecord {
        CertificateRecord {
            id,
            data: self.data,
            owner: self.owner,
            thumbprint: self.thumbprint,
            status: self.status,
            valid_start_date: self.valid_start_date,
            valid_end_date: self.valid_end_date,
            private_key_present: self.private_key_present,
            create_time: self.create_time,
        }
    }
}

/// Persisted certificate with its derived metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    id: CertificateId,
    data: Vec<u8>,
    owner: String,
    thumbprint: Thumbprint,
    status: EntityStatus,
    valid_start_date: DateTime<Utc>,
    valid_end_date: DateTime<Utc>,
    private_key_present: bool,
    create_time: DateTime<Utc>,
}

impl CertificateRecord {
    /// Persistence-assigned id
    pub fn id(&self) -> CertificateId {
        self.id
    }

    /// Raw payload as received: a bare certificate or an envelope
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Derived owner identity
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Derived SHA-1 thumbprint
    pub fn thumbprint(&self) -> &Thumbprint {
        &self.thumbprint
    }

    /// Lifecycle status
    pub fn status(&self) -> EntityStatus {
        self.status
    }

    /// Certificate not-before
    pub fn valid_start_date(&self) -> DateTime<Utc> {
        self.valid_start_date
    }

    /// Certificate not-after
    pub fn valid_end_date(&self) -> DateTime<Utc> {
        self.valid_end_date
    }

    /// Whether the payload carries a wrapped key
    pub fn has_private_key(&self) -> bool {
        self.private_key_present
    }

    /// When the record was ingested
    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    /// Decode the stored payload back into its container
    pub fn container(&self) -> Result<CertContainer, ContainerError> {
        container::decode(&self.data)
    }

    /// Case-insensitive exact owner comparison
    pub fn owned_by(&self, owner: &str) -> bool {
        owner_key(&self.owner) == owner_key(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata;

    const GM2552_DER: &[u8] = include_bytes!("../../tests/fixtures/gm2552.der");

    fn record() -> CertificateRecord {
        let metadata = metadata::extract(GM2552_DER).unwrap();
        NewCertificate::new(GM2552_DER.to_vec(), false, metadata, Utc::now())
            .into_record(CertificateId::generate())
    }

    #[test]
    fn new_records_start_in_new_status() {
        let record = record();
        assert_eq!(record.status(), EntityStatus::New);
        assert!(!record.has_private_key());
    }

    #[test]
    fn owned_by_ignores_case_only() {
        let record = record();
        assert!(record.owned_by("GM2552@SecureHealthEmail.COM"));
        assert!(!record.owned_by("gm2552"));
        assert!(!record.owned_by(" gm2552@securehealthemail.com"));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let record = record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["owner"], "gm2552@securehealthemail.com");
        assert_eq!(json["status"], "NEW");
        assert_eq!(json["thumbprint"], "f5982e118fff21ef657e474a23bcf4a44b7745c5");
        assert_eq!(json["privateKeyPresent"], false);
        assert!(json.get("validStartDate").is_some());

        let back: CertificateRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn id_parses_from_display() {
        let id = CertificateId::generate();
        assert_eq!(id.to_string().parse::<CertificateId>().unwrap(), id);
        assert!("not-a-uuid".parse::<CertificateId>().is_err());
    }
}
