//! Structured record store error types.

/// Kinds of record store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RecordErrorKind {
    /// Record not found in the collection
    #[display("Record not found: {}", _0)]
    NotFound(String),
    /// Failed to serialize a record for storage
    #[display("Failed to serialize record: {}", _0)]
    Serialize(String),
    /// Failed to deserialize a stored record
    #[display("Failed to deserialize record: {}", _0)]
    Deserialize(String),
    /// Underlying I/O failure
    #[display("Record store I/O failure: {}", _0)]
    Io(String),
}

/// Record store error with location tracking.
///
/// # Examples
///
/// ```
/// use karigari_error::{RecordError, RecordErrorKind};
///
/// let err = RecordError::new(RecordErrorKind::NotFound("designs/42".to_string()));
/// assert!(format!("{}", err).contains("designs/42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Record Error: {} at line {} in {}", kind, line, file)]
pub struct RecordError {
    /// The kind of error that occurred
    pub kind: RecordErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RecordError {
    /// Create a new record error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RecordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
