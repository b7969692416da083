use thiserror::Error;

use crate::domain::price::PriceEntryError;
use crate::repository::errors::RepositoryError;

pub mod feature_flags;
pub mod price_batch;
pub mod price_lists;
pub mod projection;

/// Result type returned by the service layer.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures of a batch price update. None of them leaves a partial update behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The price list, or a price referenced by id, does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A price entry breaks a semantic rule.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The transaction or the workflow failed for reasons outside the batch itself.
    #[error("aborted: {0}")]
    ConflictAborted(String),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn aborted(msg: impl Into<String>) -> Self {
        Self::ConflictAborted(msg.into())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound("record not found".to_string()),
            other => Self::ConflictAborted(other.to_string()),
        }
    }
}

impl From<PriceEntryError> for ServiceError {
    fn from(value: PriceEntryError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}
