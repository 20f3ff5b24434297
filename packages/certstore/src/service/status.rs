//! Translation of service outcomes into transport status codes

use crate::error::ServiceError;
use std::fmt;

/// Transport-level status reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200
    Ok,
    /// 201
    Created,
    /// 204, used for lookups that matched nothing
    NoContent,
    /// 400
    BadRequest,
    /// 409
    Conflict,
    /// 500
    InternalServerError,
}

impl StatusCode {
    /// Numeric HTTP-style code
    pub const fn as_u16(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::Conflict => 409,
            StatusCode::InternalServerError => 500,
        }
    }

    /// True for 5xx codes
    pub fn is_server_error(self) -> bool {
        self.as_u16() >= 500
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Maps a domain outcome to the status the boundary layer reports
pub trait StatusTranslation {
    /// Status for this outcome
    fn status_code(&self) -> StatusCode;
}

impl StatusTranslation for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MalformedContainer(_) | ServiceError::InvalidCertificate(_) => {
                StatusCode::BadRequest
            }
            ServiceError::AlreadyExists { .. } => StatusCode::Conflict,
            ServiceError::Persistence { .. } => StatusCode::InternalServerError,
        }
    }
}

/// Status for a completed lookup: an empty result is reported as no content
pub fn lookup_status<T>(results: &[T]) -> StatusCode {
    if results.is_empty() {
        StatusCode::NoContent
    } else {
        StatusCode::Ok
    }
}

/// Error as seen across the transport boundary.
///
/// Server faults carry a generic message so backend details stay in the logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ServiceMethodError {
    status: StatusCode,
    message: String,
}

impl ServiceMethodError {
    /// Status code to report
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Numeric status code
    pub fn response_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Caller-facing message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&ServiceError> for ServiceMethodError {
    fn from(error: &ServiceError) -> Self {
        let status = error.status_code();
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            error.to_string()
        };
        Self { status, message }
    }
}

impl From<ServiceError> for ServiceMethodError {
    fn from(error: ServiceError) -> Self {
        Self::from(&error)
    }
}

/// Translate a collection lookup into a boundary response: the records and
/// their status, or the error mapped to its status.
pub fn respond_collection<T>(
    result: crate::error::Result<Vec<T>>,
) -> Result<(StatusCode, Vec<T>), ServiceMethodError> {
    match result {
        Ok(records) => Ok((lookup_status(&records), records)),
        Err(error) => Err(error.into()),
    }
}
