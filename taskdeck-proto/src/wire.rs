//! JSON envelope shapes for the task API.
//!
//! Successful responses wrap their payload as `{"data": ...}` and mutation
//! request bodies wrap theirs as `{"task": ...}`. Error responses carry
//! either `{"message": <string or array>}` or `{"error": <string>}`;
//! [`ErrorBody::normalized_message`] folds both shapes into a single
//! human-readable string.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Message shown when an error response carries no usable text.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Successful response envelope: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The wrapped payload.
    pub data: T,
}

/// Mutation request body: `{"task": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload<T> {
    /// The wrapped draft or patch.
    pub task: T,
}

/// The `message` field of an error body: a single string or an array of
/// validation messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Messages {
    /// One message.
    One(String),
    /// Several messages, joined with `", "` when normalized.
    Many(Vec<String>),
}

/// Error response body.
///
/// Servers are inconsistent about the field they use; both are optional and
/// `message` takes precedence when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Primary error text: a string or an array of strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Messages>,
    /// Alternate error text used by some responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Builds a body with a single `message` string.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(Messages::One(message.into())),
            error: None,
        }
    }

    /// Builds a body with an array of `message` strings.
    #[must_use]
    pub const fn from_messages(messages: Vec<String>) -> Self {
        Self {
            message: Some(Messages::Many(messages)),
            error: None,
        }
    }

    /// Folds the body into one human-readable message.
    ///
    /// `message` wins over `error`; message arrays are joined with `", "`;
    /// a body with neither field yields [`DEFAULT_ERROR_MESSAGE`].
    #[must_use]
    pub fn normalized_message(&self) -> String {
        match (&self.message, &self.error) {
            (Some(Messages::One(message)), _) => message.clone(),
            (Some(Messages::Many(messages)), _) => messages.join(", "),
            (None, Some(error)) => error.clone(),
            (None, None) => DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Errors produced while decoding response bodies.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The body was not a valid `{"data": ...}` envelope.
    #[error("invalid response envelope: {0}")]
    Envelope(String),
}

/// Decodes a successful response body, unwrapping the `data` envelope.
///
/// # Errors
///
/// Returns [`WireError::Envelope`] when the body is not valid JSON or does
/// not match the expected payload shape.
pub fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, WireError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| WireError::Envelope(e.to_string()))
}

/// Decodes an error response body leniently.
///
/// A body that is not valid JSON (or not an object) yields the default
/// empty [`ErrorBody`], which normalizes to [`DEFAULT_ERROR_MESSAGE`].
#[must_use]
pub fn decode_error(body: &str) -> ErrorBody {
    serde_json::from_str(body).unwrap_or_default()
}
