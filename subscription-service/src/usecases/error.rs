//! Closed error taxonomy returned by every use case.

use crate::services::RepositoryError;
use std::fmt;
use thiserror::Error;

/// Category of a use-case failure. The display text is safe to show clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("empty service name")]
    EmptyServiceName,
    #[error("bad date format, expected DD-MM-YYYY")]
    InvalidDate,
    #[error("empty date")]
    EmptyDate,
    #[error("empty user_id")]
    EmptyUserId,
    #[error("user_id is not a valid UUID")]
    InvalidUserId,
    #[error("id must be positive")]
    InvalidSubscriptionId,
    #[error("limit must be positive or 0")]
    InvalidLimit,
    #[error("offset must be positive or 0")]
    InvalidOffset,
    #[error("subscription not found")]
    SubscriptionNotFound,
    #[error("failed to create subscription")]
    CreateFailed,
    #[error("failed to get subscription")]
    GetFailed,
    #[error("failed to update subscription")]
    UpdateFailed,
    #[error("failed to delete subscription")]
    DeleteFailed,
    #[error("failed to get subscription list")]
    ListFailed,
    #[error("failed to get total sum")]
    SumFailed,
}

impl ErrorKind {
    /// Stable snake_case label, used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EmptyServiceName => "empty_service_name",
            ErrorKind::InvalidDate => "invalid_date",
            ErrorKind::EmptyDate => "empty_date",
            ErrorKind::EmptyUserId => "empty_user_id",
            ErrorKind::InvalidUserId => "invalid_user_id",
            ErrorKind::InvalidSubscriptionId => "invalid_subscription_id",
            ErrorKind::InvalidLimit => "invalid_limit",
            ErrorKind::InvalidOffset => "invalid_offset",
            ErrorKind::SubscriptionNotFound => "subscription_not_found",
            ErrorKind::CreateFailed => "create_failed",
            ErrorKind::GetFailed => "get_failed",
            ErrorKind::UpdateFailed => "update_failed",
            ErrorKind::DeleteFailed => "delete_failed",
            ErrorKind::ListFailed => "list_failed",
            ErrorKind::SumFailed => "sum_failed",
        }
    }

    /// Input was rejected before any storage call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::EmptyServiceName
                | ErrorKind::InvalidDate
                | ErrorKind::EmptyDate
                | ErrorKind::EmptyUserId
                | ErrorKind::InvalidUserId
                | ErrorKind::InvalidSubscriptionId
                | ErrorKind::InvalidLimit
                | ErrorKind::InvalidOffset
        )
    }

    /// Storage failed for a reason other than a missing row.
    pub fn is_failure(&self) -> bool {
        !self.is_validation() && *self != ErrorKind::SubscriptionNotFound
    }
}

/// A public error kind paired with the internal storage cause, if any.
///
/// `Display` renders only the kind; the cause is reachable through
/// `source()` for logging.
#[derive(Debug)]
pub struct UseCaseError {
    kind: ErrorKind,
    cause: Option<RepositoryError>,
}

impl UseCaseError {
    pub fn wrap(kind: ErrorKind, cause: RepositoryError) -> Self {
        Self {
            kind,
            cause: Some(cause),
        }
    }

    /// Map a storage error, keeping `NotFound` distinct from other failures.
    pub fn from_repository(failed: ErrorKind, cause: RepositoryError) -> Self {
        match cause {
            RepositoryError::NotFound => Self::wrap(ErrorKind::SubscriptionNotFound, cause),
            other => Self::wrap(failed, other),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn cause(&self) -> Option<&RepositoryError> {
        self.cause.as_ref()
    }
}

impl From<ErrorKind> for UseCaseError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, cause: None }
    }
}

impl fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for UseCaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_is_public_kind_only() {
        let err = UseCaseError::wrap(
            ErrorKind::CreateFailed,
            RepositoryError::Database(anyhow::anyhow!("password authentication failed")),
        );

        assert_eq!(err.to_string(), "failed to create subscription");
        assert!(err
            .source()
            .unwrap()
            .to_string()
            .contains("password authentication failed"));
    }

    #[test]
    fn test_not_found_is_kept_distinct() {
        let err = UseCaseError::from_repository(ErrorKind::DeleteFailed, RepositoryError::NotFound);
        assert_eq!(err.kind(), ErrorKind::SubscriptionNotFound);

        let err = UseCaseError::from_repository(
            ErrorKind::DeleteFailed,
            RepositoryError::Database(anyhow::anyhow!("timeout")),
        );
        assert_eq!(err.kind(), ErrorKind::DeleteFailed);
    }

    #[test]
    fn test_kind_classification() {
        assert!(ErrorKind::InvalidLimit.is_validation());
        assert!(!ErrorKind::SubscriptionNotFound.is_validation());
        assert!(!ErrorKind::SubscriptionNotFound.is_failure());
        assert!(ErrorKind::SumFailed.is_failure());
        assert!(!ErrorKind::EmptyDate.is_failure());
    }
}
