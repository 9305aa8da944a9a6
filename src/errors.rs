//! Unified error types for the invoice desk.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation problems
//! raised while editing a document are not errors; they travel back to the
//! caller as [`crate::core::editor::SaveOutcome::Rejected`].

use crate::core::{
    access::{Action, Role},
    auth::AuthFailure,
};
use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The underlying store reported an error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure (config file, session blob).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable was missing or not unicode.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// The session blob could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No document with this id exists in the store.
    #[error("Document not found: {id}")]
    DocumentNotFound {
        /// The id that was looked up
        id: String,
    },

    /// The acting role may not perform the action.
    #[error("Permission denied: {role} may not {action}")]
    PermissionDenied {
        /// Role of the acting user
        role: Role,
        /// The action that was refused
        action: Action,
    },

    /// Sign-in was refused.
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthFailure),

    /// A stored row carried a value this crate cannot interpret.
    #[error("Invalid stored value for {field}: {value:?}")]
    InvalidStoredValue {
        /// Column the value came from
        field: &'static str,
        /// The raw value
        value: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
