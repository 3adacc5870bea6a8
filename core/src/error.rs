//! Error types for the to-do component.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the task does not exist" from "the server returned an unexpected status."
//! All other non-2xx responses land in `HttpError` with the raw status code
//! and body. Network failures never produce a response and land in
//! `Transport`.

use crate::types::TaskId;

/// Errors returned by `TodoClient`, transports and the `ToDoList` component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404: the requested task does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connect, timeout, I/O).
    #[error("request failed: {0}")]
    Transport(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// An edit or delete named a task that is not in local state.
    #[error("unknown task {0}")]
    UnknownTask(TaskId),
}

/// Errors produced while reading `ClientConfig` from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing config: env var {var} not set")]
    MissingVar { var: String },

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}
