//! Error types for netible.
//!
//! The reconciliation engine distinguishes three fatal failure classes
//! (validation, fetch, apply). Parse problems inside the facts layer are not
//! errors: a malformed configuration block is skipped and logged, and parsing
//! continues with the remaining blocks.

use thiserror::Error;

/// Result type alias for netible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for netible.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// A desired-state record carries an invalid value (bad CIDR mask, VLAN
    /// id out of range, mutually exclusive attribute groups both populated).
    /// Fatal: aborts the reconciliation before any command is rendered.
    #[error("Invalid desired state: {0}")]
    Validation(String),

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// Fetching the running configuration from the device failed.
    #[error("Failed to fetch running configuration: {0}")]
    Connection(String),

    /// The device rejected a command batch (or connectivity was lost
    /// mid-batch). The engine performs no rollback; the device configuration
    /// is the source of truth and the next run reconciles whatever partial
    /// state resulted.
    #[error("Failed to apply commands: {message}")]
    Apply {
        /// Error message from the transport/device
        message: String,
        /// The command batch that was being applied
        attempted: Vec<String>,
    },
}

impl Error {
    /// Build a validation error from anything displayable.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Build a connection error from a transport message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Error::Connection(msg.into())
    }

    /// Build an apply error carrying the attempted command batch.
    pub fn apply(msg: impl Into<String>, attempted: &[String]) -> Self {
        Error::Apply {
            message: msg.into(),
            attempted: attempted.to_vec(),
        }
    }
}
