//! Error types for the client crate.

use bugdesk_core::FormField;
use bugdesk_media::MediaError;
use bugdesk_policy::AccessError;
use thiserror::Error;

/// Failures talking to the remote API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credentials were rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The resource already exists (e.g. duplicate username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-success response.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// A success response whose body could not be read.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures of the key/value slot backing the session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid key '{0}'")]
    InvalidKey(String),
}

/// Failures of login/logout.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Failures of a report submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Forbidden(#[from] AccessError),

    /// Required form fields are blank.
    #[error("missing required fields: {}", join_fields(.missing))]
    Validation { missing: Vec<FormField> },

    /// Attachment `index` (zero-based, input order) could not be normalized.
    #[error("attachment {} could not be processed: {source}", .index + 1)]
    Attachment {
        index: usize,
        #[source]
        source: MediaError,
    },

    #[error("failed to create report: {0}")]
    Gateway(#[from] GatewayError),
}

/// Failures of report and user operations after login.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Forbidden(#[from] AccessError),

    #[error("comment message is empty")]
    EmptyComment,

    /// The report is not among the reports visible to this principal.
    #[error("unknown report '{0}'")]
    UnknownReport(String),

    /// A required user field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
