//! Error taxonomy for schema provisioning.
//!
//! Every variant carries the storage engine's own message; `Display` prints
//! it verbatim so the engine diagnostic is what operators see.

use thiserror::Error;

/// Engine error code for a duplicate key.
pub(crate) const DUPLICATE_KEY: i32 = 11000;
/// Engine error code for a principal lacking the required privilege.
pub(crate) const UNAUTHORIZED: i32 = 13;
/// Engine error code for an index that exists with different options.
pub(crate) const INDEX_OPTIONS_CONFLICT: i32 = 85;
/// Engine error code for a collection that does not exist.
pub(crate) const NAMESPACE_NOT_FOUND: i32 = 26;

#[derive(Error, Debug)]
pub enum DbError {
    /// The storage engine could not be reached.
    #[error("{message}")]
    Connection { message: String },

    /// Existing documents already violate the uniqueness being declared,
    /// or a write would duplicate a unique value.
    #[error("{message}")]
    ConstraintViolation { collection: String, message: String },

    /// The executing principal lacks the rights for the operation.
    #[error("{message}")]
    Permission { message: String },

    /// The configured endpoint is not a valid connection string.
    #[error("{message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// Any other failure reported by the storage engine.
    #[error("{message}")]
    Engine { code: Option<i32>, message: String },
}

impl DbError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn constraint_violation(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            collection: collection.into(),
            message: message.into(),
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    pub fn engine(code: Option<i32>, message: impl Into<String>) -> Self {
        Self::Engine {
            code,
            message: message.into(),
        }
    }

    /// Stable label for logs and exit diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            DbError::Connection { .. } => "connection",
            DbError::ConstraintViolation { .. } => "constraint_violation",
            DbError::Permission { .. } => "permission",
            DbError::InvalidEndpoint { .. } => "invalid_endpoint",
            DbError::Engine { .. } => "engine",
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_native_message() {
        let err = DbError::constraint_violation(
            "books",
            "E11000 duplicate key error collection: books.books index: name_1 dup key: { name: \"Dune\" }",
        );
        assert_eq!(
            err.to_string(),
            "E11000 duplicate key error collection: books.books index: name_1 dup key: { name: \"Dune\" }"
        );
        assert_eq!(err.kind(), "constraint_violation");
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            DbError::connection("down").kind(),
            DbError::permission("denied").kind(),
            DbError::engine(Some(INDEX_OPTIONS_CONFLICT), "conflict").kind(),
            DbError::InvalidEndpoint {
                endpoint: "nope".to_string(),
                message: "bad scheme".to_string(),
            }
            .kind(),
        ];
        assert_eq!(
            kinds,
            ["connection", "permission", "engine", "invalid_endpoint"]
        );
    }
}
