//! Rate limiting error types.

/// Kinds of rate limiting errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RateLimitErrorKind {
    /// Tier configuration is unusable (e.g., zero quota)
    #[display("Invalid tier configuration: {}", _0)]
    InvalidConfig(String),
    /// A daily or budget quota is exhausted
    #[display("Quota exhausted: {}", _0)]
    QuotaExhausted(String),
}

/// Rate limiting error with location tracking.
///
/// # Examples
///
/// ```
/// use karigari_rate_limit::{RateLimitError, RateLimitErrorKind};
///
/// let err = RateLimitError::new(RateLimitErrorKind::QuotaExhausted("rpd".to_string()));
/// assert!(format!("{}", err).contains("rpd"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rate Limit Error: {} at line {} in {}", kind, line, file)]
pub struct RateLimitError {
    /// The kind of error that occurred
    pub kind: RateLimitErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RateLimitError {
    /// Create a new rate limit error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
