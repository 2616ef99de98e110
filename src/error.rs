//! Error types for the HTTP endpoints and the push channel.

use thiserror::Error;

/// Errors from a call to one of the server's HTTP endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("Server returned status {0}")]
    Status(u16),

    /// The response body was not the expected JSON shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The server could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// No response within the configured timeout.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}

/// Errors from the websocket push channel. None of these reach the user;
/// they only drive the reconnect loop.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Opening the connection failed.
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The connection broke while reading.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The peer closed the connection.
    #[error("Connection closed by peer")]
    Closed,
}

impl From<tokio_tungstenite::tungstenite::Error> for StreamError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        StreamError::Transport(err.to_string())
    }
}
