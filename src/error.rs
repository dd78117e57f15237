use thiserror::Error;

// Basic error handling with thiserror
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("JSON parsing failed: {0}")]
    ParseFailed(#[from] serde_json::Error),

    #[error("URL encoding failed: {0}")]
    UrlEncodingFailed(#[from] serde_urlencoded::ser::Error),

    #[error("Not authorized (HTTP 401)")]
    Unauthorized, // A 401 the refresh protocol could not resolve

    #[error("Session terminated: {0}")]
    SessionTerminated(String), // Refresh failed or no refresh token; all local state cleared

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Validation(String), // HTTP 400, e.g. malformed input

    #[error("Conflict: {0}")]
    Conflict(String), // HTTP 409, e.g. already in watch later

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// True for the errors that end the session entirely; the UI layer
    /// reacts by routing to an unauthenticated entry point.
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            ApiError::SessionTerminated(_) | ApiError::Unauthorized
        )
    }

    /// True for connectivity failures where a manual retry may succeed.
    /// These never trigger the refresh protocol.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout | ApiError::RequestFailed(_) | ApiError::Server { .. }
        )
    }
}
