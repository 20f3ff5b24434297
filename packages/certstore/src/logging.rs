//! Audit logging for repository mutations

use chrono::Utc;
use tracing::{info, warn};

/// Logs a repository mutation or rejected request with standardized formatting
///
/// # Parameters
/// * `event_type` - Type of event (e.g., "CERTIFICATE_ADD", "CERTIFICATE_DELETE")
/// * `details` - Additional details about the event; never raw payload bytes
/// * `success` - Whether the operation was successful
pub fn log_audit_event(event_type: &str, details: &str, success: bool) {
    let timestamp = Utc::now().timestamp();
    let status = if success { "SUCCESS" } else { "FAILURE" };

    if success {
        info!(target: "certstore::audit", timestamp, status, event_type, "{}", details);
    } else {
        warn!(target: "certstore::audit", timestamp, status, event_type, "{}", details);
    }
}
