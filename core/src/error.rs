//! Error types for the student API client.
//!
//! # Design
//! A non-2xx response is not decoded eagerly: `ApiError::Status` keeps the
//! raw `HttpResponse` so the caller can inspect the status and parse the
//! backend's error body itself. Transport failures reported by the host and
//! (de)serialization failures get their own variants.

use crate::http::{reason_phrase, HttpResponse};
use crate::types::ServerError;

/// Errors produced while building requests or interpreting responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a status outside 200..=299.
    #[error("HTTP {}: {}", .response.status, .response.body)]
    Status { response: HttpResponse },

    /// The host could not complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Failure reported by the host when a request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

impl ApiError {
    /// HTTP status of a rejected response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { response } => Some(response.status),
            _ => None,
        }
    }

    /// Decode the backend's `{message, status, error}` body.
    ///
    /// Returns `None` for non-status errors and for bodies that are not the
    /// expected JSON.
    pub fn server_error(&self) -> Option<ServerError> {
        match self {
            ApiError::Status { response } => serde_json::from_str(&response.body).ok(),
            _ => None,
        }
    }

    /// One-line description for a user-facing notice: the backend's own
    /// message when it sent one, a generic line otherwise.
    pub fn describe(&self) -> String {
        if let Some(server) = self.server_error() {
            return server.to_string();
        }
        match self {
            ApiError::Status { response } => format!(
                "Request failed [{}] [{}]",
                response.status,
                reason_phrase(response.status)
            ),
            other => other.to_string(),
        }
    }

    /// Same as [`describe`](Self::describe) but with the status labelled,
    /// the format used when loading the list fails.
    pub fn describe_with_status_code(&self) -> String {
        match self.server_error() {
            Some(server) => format!(
                "{} [StatusCode:{}] [{}]",
                server.message, server.status, server.error
            ),
            None => self.describe(),
        }
    }
}
