//! Authentication and ownership error types.

/// Kinds of access errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AccessErrorKind {
    /// Missing or invalid credential
    #[display("Unauthorized: {}", _0)]
    Unauthorized(String),
    /// Valid caller, but the record belongs to someone else
    #[display("Forbidden: {}", _0)]
    Forbidden(String),
}

/// Access error with location tracking.
///
/// # Examples
///
/// ```
/// use karigari_error::{AccessError, AccessErrorKind};
///
/// let err = AccessError::forbidden("design belongs to another user");
/// assert!(matches!(err.kind, AccessErrorKind::Forbidden(_)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Access Error: {} at line {} in {}", kind, line, file)]
pub struct AccessError {
    /// The kind of error that occurred
    pub kind: AccessErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AccessError {
    /// Create a new access error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AccessErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an Unauthorized error (missing or invalid credential).
    #[track_caller]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(AccessErrorKind::Unauthorized(message.into()))
    }

    /// Create a Forbidden error (valid caller, wrong owner).
    #[track_caller]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(AccessErrorKind::Forbidden(message.into()))
    }
}
