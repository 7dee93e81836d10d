//! Error types for the Wharf API client.

use model::{CompatibilityError, ProblemError, QueryError};
use thiserror::Error;

/// Errors that can occur when calling the Wharf API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered 401 Unauthorized.
    ///
    /// `realm` is the raw `WWW-Authenticate` header value, or empty when the
    /// server sent none.
    #[error("unauthorized: realm={realm:?}")]
    Auth {
        /// Authentication challenge reported by the server.
        realm: String,
    },

    /// The server answered with an RFC-7807 problem body.
    #[error(transparent)]
    Problem(#[from] ProblemError),

    /// The server answered non-2xx without a usable problem body.
    #[error("unexpected status code returned: {status} {status_text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        status_text: String,
    },

    /// The version gate blocked the call before it was sent.
    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),

    /// A search record violated one of its field rules.
    #[error("failed constructing query from object: {0}")]
    Query(#[from] QueryError),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Transport(reqwest::Error),

    /// The gRPC channel could not be established.
    #[error("dial grpc: {0}")]
    GrpcTransport(#[from] tonic::transport::Error),

    /// The gRPC call ended with a non-OK status.
    #[error("grpc call failed: {0}")]
    GrpcStatus(#[from] tonic::Status),

    /// The log stream's background call ended unexpectedly.
    #[error("log stream failed: {0}")]
    LogStream(String),

    /// A response body was not valid JSON for the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL is not usable.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The auth header is not of the form `<type> <credentials>`.
    #[error("invalid auth header format, expected 'Bearer abc123'")]
    InvalidAuthHeader,

    /// A local file could not be opened for upload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation exists in the API but is not provided by this client.
    #[error("not implemented yet: {0}")]
    NotImplemented(&'static str),
}

impl ClientError {
    /// Returns `true` if the server is too old for the called endpoint.
    pub fn is_outdated_server(&self) -> bool {
        matches!(
            self,
            Self::Compatibility(CompatibilityError::OutdatedServer { .. })
        )
    }

    /// Returns `true` if the server is too new for this client.
    pub fn is_outdated_client(&self) -> bool {
        matches!(
            self,
            Self::Compatibility(CompatibilityError::OutdatedClient { .. })
        )
    }
}

impl From<reqwest::Error> for ClientError {
    /// Strips the request URL, which may carry credentials in its query.
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
