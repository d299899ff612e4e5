//! Storage error types for the document store abstraction layer.

use std::fmt;

use fahrtenbuch_core::FleetError;

use crate::types::Collection;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested document was not found.
    #[error("Document not found: {collection}/{id}")]
    NotFound {
        /// The collection that was searched.
        collection: Collection,
        /// The ID of the missing document.
        id: String,
    },

    /// Attempted to insert a document whose id is already taken.
    #[error("Document already exists: {collection}/{id}")]
    AlreadyExists {
        /// The collection of the existing document.
        collection: Collection,
        /// The ID of the existing document.
        id: String,
    },

    /// A write would create a second document with the same unique key.
    #[error("Unique index {index} violated in {collection}")]
    UniqueViolation {
        /// The collection holding the index.
        collection: Collection,
        /// Name of the violated index.
        index: &'static str,
    },

    /// The document data is invalid.
    #[error("Invalid document: {message}")]
    InvalidDocument {
        /// Description of why the document is invalid.
        message: String,
    },

    /// A document could not be converted to or from its record type.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(collection: Collection, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            collection,
            id: id.into(),
        }
    }

    /// Creates a new `UniqueViolation` error.
    #[must_use]
    pub fn unique_violation(collection: Collection, index: &'static str) -> Self {
        Self::UniqueViolation { collection, index }
    }

    /// Creates a new `InvalidDocument` error.
    #[must_use]
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a unique index violation.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } | Self::UniqueViolation { .. } => ErrorCategory::Conflict,
            Self::InvalidDocument { .. } | Self::Serialization(_) => ErrorCategory::Validation,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Document not found.
    NotFound,
    /// Conflict (existence or uniqueness).
    Conflict,
    /// Validation error.
    Validation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
        }
    }
}

impl From<StorageError> for FleetError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, category = %err.category(), "storage failure");
        FleetError::storage(err.to_string())
    }
}
