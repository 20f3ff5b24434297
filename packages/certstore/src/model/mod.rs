//! Certificate record model

mod record;
mod status;

pub use record::{owner_key, CertificateId, CertificateRecord, NewCertificate};
pub use status::EntityStatus;
