//! Store error taxonomy
//!
//! Every remote store operation resolves to one of these variants. Callers
//! branch on the variant, not on transport details: `Unreachable` is the only
//! recoverable case (degraded mode), everything else maps to a client-visible
//! failure at the gateway.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure modes of an entity-store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure reaching the store (connect refused, timeout).
    #[error("store unreachable: {message}")]
    Unreachable { message: String },

    /// The addressed record does not exist.
    #[error("not found: {collection}/{id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    /// Unique-constraint violation on create.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Missing or malformed required field, rejected before the store is
    /// called (the stores themselves validate almost nothing).
    #[error("validation failed for `{field}`: {message}")]
    Validation { field: String, message: String },

    /// Any response the caller has no defined handling for.
    #[error("unexpected store response: {message}")]
    Unexpected { message: String },
}

impl StoreError {
    pub fn unreachable<S: Into<String>>(message: S) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    pub fn not_found(collection: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unexpected<S: Into<String>>(message: S) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Whether this failure is the degraded-mode case rather than an
    /// application-level error.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_is_the_only_recoverable_variant() {
        assert!(StoreError::unreachable("connect refused").is_unreachable());
        assert!(!StoreError::not_found("users", 7).is_unreachable());
        assert!(!StoreError::conflict("duplicate name").is_unreachable());
        assert!(!StoreError::validation("email", "empty").is_unreachable());
        assert!(!StoreError::unexpected("500").is_unreachable());
    }

    #[test]
    fn not_found_names_the_record() {
        let err = StoreError::not_found("departments", 3);
        assert_eq!(err.to_string(), "not found: departments/3");
    }
}
