//! Error types for slipok-client.
//!
//! Every verification call either returns a decoded [`crate::VerifyResponse`]
//! or exactly one [`Error`] carrying the HTTP status (when the provider sent
//! one), the endpoint that was called, and the raw response body.

/// Result type for all verification operations in this crate.
///
/// This is a convenience type alias that defaults to using [`Error`] as the error type.
/// Most functions in this crate return this type for consistent error handling.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for slip verification operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The provider answered with a non-2xx status.
    #[error("slip verification request failed ({status}) at {endpoint}")]
    Api {
        /// HTTP status code of the failed response
        status: u16,
        /// Full verification endpoint that was called
        endpoint: String,
        /// Raw response body, if the provider sent one
        body: Option<String>,
    },

    /// The request never produced an HTTP status (connect failure, timeout,
    /// unreadable file body, ...).
    #[error("slip verification request failed (no-status) at {endpoint}")]
    Transport {
        /// Full verification endpoint that was called
        endpoint: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx response whose body did not decode as a verification result.
    #[error("invalid verification response: {message}")]
    InvalidResponse {
        /// Description of what's invalid
        message: String,
        /// Raw response body for debugging, when available
        body: Option<String>,
    },

    /// Configuration errors (bad base URL, proxy descriptor, client build)
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Create an API error for a non-2xx response.
    pub fn api(status: u16, endpoint: impl Into<String>, body: Option<String>) -> Self {
        Self::Api {
            status,
            endpoint: endpoint.into(),
            body,
        }
    }

    /// Create a transport error for a request that produced no status.
    pub fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>, body: Option<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
            body,
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error indicates a temporary failure that might succeed on retry.
    ///
    /// Only HTTP 429 and 5xx responses are retryable. Transport failures
    /// without a status are deliberately not retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api { status, .. } => matches!(*status, 429 | 500..=599),
            Error::Transport { .. }
            | Error::InvalidResponse { .. }
            | Error::Config { .. } => false,
        }
    }

    /// Get the HTTP status code of the failed response, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the verification endpoint this error was raised for.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Error::Api { endpoint, .. } | Error::Transport { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Get the raw response body captured with this error.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Api { body, .. } | Error::InvalidResponse { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Get the error category for metrics/logging.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Api { .. } => "api",
            Error::Transport { .. } => "transport",
            Error::InvalidResponse { .. } => "invalid_response",
            Error::Config { .. } => "config",
        }
    }
}
