//! Error taxonomy shared by the store, the gateway, and the HTTP layer.
//!
//! Only `server` maps these variants onto status codes; everything below it
//! just returns them.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AtlasError>;

#[derive(Debug, Error)]
pub enum AtlasError {
    /// Entity or external resource absent.
    #[error("{0}")]
    NotFound(String),

    /// Deletion blocked by dependent children.
    #[error("{0}")]
    Conflict(String),

    /// Missing or malformed required field.
    #[error("{0}")]
    Validation(String),

    /// A write referenced a parent row that does not exist.
    #[error("{kind} {id} not found")]
    ParentNotFound { kind: &'static str, id: i64 },

    /// A required credential is not configured.
    #[error("{0}")]
    Configuration(String),

    /// The upstream service rejected the configured credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Not enough parameters to carry out the operation.
    #[error("{0}")]
    InvalidInput(String),

    /// Every fallback attempt failed.
    #[error("{0}")]
    Unavailable(String),

    /// Wrapped upstream failure; the message carries the original cause.
    #[error("{0}")]
    Unknown(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl AtlasError {
    /// True for errors caused by the caller's input rather than by the
    /// service or its upstreams.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Conflict(_)
                | Self::Validation(_)
                | Self::ParentNotFound { .. }
                | Self::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_not_found_message() {
        let err = AtlasError::ParentNotFound { kind: "continent", id: 42 };
        assert_eq!(err.to_string(), "continent 42 not found");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_upstream_errors_are_not_client_errors() {
        assert!(!AtlasError::Unavailable("x".into()).is_client_error());
        assert!(!AtlasError::Configuration("x".into()).is_client_error());
        assert!(!AtlasError::Unauthorized("x".into()).is_client_error());
    }
}
