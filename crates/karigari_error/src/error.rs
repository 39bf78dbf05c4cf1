//! Top-level error wrapper types.

use crate::{
    AccessError, BackendError, ConfigError, HttpError, JsonError, ModelError, NotFoundError,
    RecordError, StorageError, ValidationError,
};

/// The foundation error enum for the Karigari workspace.
///
/// # Examples
///
/// ```
/// use karigari_error::{KarigariError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: KarigariError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum KarigariErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Generic backend error
    #[from(BackendError)]
    Backend(BackendError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Missing or malformed caller input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Authentication or ownership failure
    #[from(AccessError)]
    Access(AccessError),
    /// Requested record does not exist
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Blob storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Structured record store error
    #[from(RecordError)]
    Record(RecordError),
    /// Generative model service error
    #[from(ModelError)]
    Model(ModelError),
}

/// Karigari error with kind discrimination.
///
/// # Examples
///
/// ```
/// use karigari_error::{KarigariResult, ValidationError};
///
/// fn might_fail() -> KarigariResult<()> {
///     Err(ValidationError::new("Text input is required"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Karigari Error: {}", _0)]
pub struct KarigariError(Box<KarigariErrorKind>);

impl KarigariError {
    /// Create a new error from a kind.
    pub fn new(kind: KarigariErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &KarigariErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to KarigariErrorKind
impl<T> From<T> for KarigariError
where
    T: Into<KarigariErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Karigari operations.
///
/// # Examples
///
/// ```
/// use karigari_error::{KarigariResult, NotFoundError};
///
/// fn load_story() -> KarigariResult<String> {
///     Err(NotFoundError::new("story 42"))?
/// }
/// ```
pub type KarigariResult<T> = std::result::Result<T, KarigariError>;
