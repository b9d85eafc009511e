//! Service error types.

use agora_store::StoreError;
use thiserror::Error;

/// Service operation errors.
///
/// `NotFound`, `InsufficientPermissions`, `LikingYourself` and
/// `InvalidIdentifier` are meant to be shown to clients. `Store` and
/// `Internal` are opaque failures of the persistence layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("insufficient permissions: {0}")]
    InsufficientPermissions(String),

    #[error("liking your own content is not allowed")]
    LikingYourself,

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Store(StoreError),

    #[error("{context}: {source}")]
    Internal {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InsufficientPermissions(_) => "insufficient_permissions",
            Self::LikingYourself => "liking_yourself",
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::Store(_) => "store_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// Whether the error describes a problem with the request rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::InsufficientPermissions(_)
                | Self::LikingYourself
                | Self::InvalidIdentifier(_)
        )
    }

    /// Wrap a store error with context.
    pub(crate) fn internal(context: impl Into<String>) -> impl FnOnce(StoreError) -> Self {
        let context = context.into();
        move |source| Self::Internal { context, source }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidIdentifier(name) => Self::InvalidIdentifier(name),
            other => Self::Store(other),
        }
    }
}

impl From<agora_core::Error> for ServiceError {
    fn from(e: agora_core::Error) -> Self {
        StoreError::from(e).into()
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(ServiceError::NotFound("Post 1".to_string()).is_client_error());
        assert!(ServiceError::InsufficientPermissions("x".to_string()).is_client_error());
        assert!(ServiceError::LikingYourself.is_client_error());
        assert!(!ServiceError::Store(StoreError::Internal("x".to_string())).is_client_error());
    }

    #[test]
    fn test_store_not_found_passes_through_as_store_error() {
        let err: ServiceError = StoreError::NotFound("Post 1".to_string()).into();
        assert_eq!(err.code(), "store_error");
        assert_eq!(err.to_string(), "not found: Post 1");
    }

    #[test]
    fn test_invalid_identifier_becomes_validation_error() {
        let err: ServiceError = agora_core::TableIdentifier::new("Post_1").unwrap_err().into();
        assert!(matches!(err, ServiceError::InvalidIdentifier(_)));
        assert_eq!(err.code(), "invalid_identifier");
    }

    #[test]
    fn test_internal_keeps_context_and_source() {
        let err = ServiceError::internal("getting owner of Post 1")(StoreError::Internal(
            "pool closed".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "getting owner of Post 1: internal error: pool closed"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.code(), "internal_error");
    }
}
