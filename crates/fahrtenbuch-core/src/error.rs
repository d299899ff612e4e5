use std::fmt;

use thiserror::Error;

/// Error kinds surfaced by fleet logbook operations.
///
/// None of these are retried internally. `NotAuthorized` is raised both for
/// missing permissions and for resources that live in another tenant, so its
/// `Display` text never says which; the `code` is for logs only.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("User profile not found")]
    ProfileNotFound,

    #[error("Not authorized")]
    NotAuthorized { code: &'static str },

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("This email has already been invited: {email}")]
    DuplicateInvite { email: String },

    #[error("A user with this email already exists: {email}")]
    DuplicateProfile { email: String },

    #[error("No invitation found for this email: {email}")]
    NoMatchingInvite { email: String },

    #[error("Vehicle {vehicle_id} is already assigned to user {user_id}")]
    AlreadyAssigned { vehicle_id: String, user_id: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

impl FleetError {
    /// Create a new NotAuthorized error with an internal deny code
    pub fn not_authorized(code: &'static str) -> Self {
        Self::NotAuthorized { code }
    }

    /// Create a new NotFound error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a new ValidationFailed error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Create a new DuplicateInvite error
    pub fn duplicate_invite(email: impl Into<String>) -> Self {
        Self::DuplicateInvite {
            email: email.into(),
        }
    }

    /// Create a new DuplicateProfile error
    pub fn duplicate_profile(email: impl Into<String>) -> Self {
        Self::DuplicateProfile {
            email: email.into(),
        }
    }

    /// Create a new NoMatchingInvite error
    pub fn no_matching_invite(email: impl Into<String>) -> Self {
        Self::NoMatchingInvite {
            email: email.into(),
        }
    }

    /// Create a new AlreadyAssigned error
    pub fn already_assigned(vehicle_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::AlreadyAssigned {
            vehicle_id: vehicle_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Create a new Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Semantic kind of this error, independent of any transport.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::ProfileNotFound => ErrorKind::ProfileNotFound,
            Self::NotAuthorized { .. } => ErrorKind::NotAuthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            Self::DuplicateInvite { .. } => ErrorKind::DuplicateInvite,
            Self::DuplicateProfile { .. } => ErrorKind::DuplicateProfile,
            Self::NoMatchingInvite { .. } => ErrorKind::NoMatchingInvite,
            Self::AlreadyAssigned { .. } => ErrorKind::AlreadyAssigned,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Internal deny code of a `NotAuthorized` error.
    pub fn deny_code(&self) -> Option<&'static str> {
        match self {
            Self::NotAuthorized { code } => Some(code),
            _ => None,
        }
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthenticated | Self::ProfileNotFound => ErrorCategory::Authentication,
            Self::NotAuthorized { .. } => ErrorCategory::Authorization,
            Self::NotFound { .. } | Self::NoMatchingInvite { .. } => ErrorCategory::NotFound,
            Self::ValidationFailed { .. } => ErrorCategory::Validation,
            Self::DuplicateInvite { .. }
            | Self::DuplicateProfile { .. }
            | Self::AlreadyAssigned { .. } => ErrorCategory::Conflict,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
        }
    }
}

/// Flat error kind for callers that branch on the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    ProfileNotFound,
    NotAuthorized,
    NotFound,
    ValidationFailed,
    DuplicateInvite,
    DuplicateProfile,
    NoMatchingInvite,
    AlreadyAssigned,
    Storage,
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Authorization,
    NotFound,
    Validation,
    Conflict,
    Infrastructure,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Conflict => write!(f, "conflict"),
            Self::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

/// Result type alias for fleet logbook operations
pub type FleetResult<T> = std::result::Result<T, FleetError>;
