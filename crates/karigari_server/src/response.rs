//! The JSON response envelope.

use serde::Serialize;

/// Envelope status discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request succeeded
    Success,
    /// The request failed
    Error,
}

/// The `{status, message?, data?}` envelope every route responds with.
///
/// # Examples
///
/// ```
/// use karigari_server::response::ApiResponse;
///
/// let ok = ApiResponse::success(vec![1, 2, 3]);
/// let json = serde_json::to_value(&ok).unwrap();
/// assert_eq!(json["status"], "success");
/// assert_eq!(json["data"][0], 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Success or error
    pub status: ResponseStatus,
    /// Human-readable message, when there is something to say
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Success with data.
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    /// Success with data and a message.
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Error with a message and no data.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            data: None,
        }
    }
}
