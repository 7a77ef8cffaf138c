//! Error types for tasktrack
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown user, bad credentials, bad index)
//! - 3: Blocked by policy (admin-only command, completed task)
//! - 4: Operation failed (malformed store, missing store, I/O)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the tasktrack CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tasktrack operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} out of range for {len} task(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("User not found: {0}")]
    UnknownUser(String),

    #[error("Incorrect password for {0}")]
    InvalidCredential(String),

    // Policy blocks (exit code 3)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Task is complete and cannot be modified: {0}")]
    TaskCompleted(String),

    // Operation failures (exit code 4)
    #[error("Malformed record in {path} line {line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Store unavailable: {path}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("No report generated yet: {0}")]
    ReportNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::IndexOutOfRange { .. }
            | Error::DuplicateUser(_)
            | Error::UnknownUser(_)
            | Error::InvalidCredential(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::PermissionDenied(_) | Error::TaskCompleted(_) => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::MalformedRecord { .. }
            | Error::StoreUnavailable { .. }
            | Error::ReportNotFound(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::IndexOutOfRange { index, len } => {
                Some(serde_json::json!({ "index": index, "len": len }))
            }
            Error::MalformedRecord { path, line, .. } => Some(serde_json::json!({
                "path": path.display().to_string(),
                "line": line,
            })),
            Error::StoreUnavailable { path, .. } | Error::ReportNotFound(path) => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            _ => None,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::StoreUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for tasktrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
