//! Not-found error types.

/// Error for records that do not exist.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Found: {} at line {} in {}", resource, line, file)]
pub struct NotFoundError {
    /// Description of the missing resource (e.g., "design 5f3a...")
    pub resource: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError naming the missing resource.
    ///
    /// # Examples
    ///
    /// ```
    /// use karigari_error::NotFoundError;
    ///
    /// let err = NotFoundError::new("story 42");
    /// assert!(format!("{}", err).contains("story 42"));
    /// ```
    #[track_caller]
    pub fn new(resource: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            resource: resource.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
