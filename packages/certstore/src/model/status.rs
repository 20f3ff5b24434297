//! Record lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a stored certificate.
///
/// Records are created as [`EntityStatus::New`]; moving to the other states is
/// owned by a lifecycle manager outside this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityStatus {
    /// Freshly ingested
    #[default]
    New,
    /// Active for use
    Enabled,
    /// Retained but not in use
    Disabled,
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityStatus::New => "NEW",
            EntityStatus::Enabled => "ENABLED",
            EntityStatus::Disabled => "DISABLED",
        };
        f.write_str(name)
    }
}
