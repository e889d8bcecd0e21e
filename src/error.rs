//! Error types for the databroker backend
//!
//! Provides a unified error type for all operations.
//!
//! Backend-mapped failures (a key that does not exist, a busy namespace on
//! the server side, ...) are not errors here: they travel to the application
//! inside a [`Completion`](crate::completion::Completion). This enum covers
//! argument, protocol and corruption faults detected by the core itself.

use thiserror::Error;

use crate::protocol::{Opcode, ReplyKind};

/// Result type alias using BrokerError
pub type Result<T> = std::result::Result<T, BrokerError>;

/// Unified error type for databroker backend operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Name too long: {len} bytes (max {max})")]
    NameTooLong { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Namespace Errors
    // -------------------------------------------------------------------------
    #[error("Namespace '{name}' is corrupted or already released")]
    Corrupted { name: String },

    #[error("Namespace '{name}' is busy ({refcount} holders)")]
    Busy { name: String, refcount: u32 },

    #[error("Namespace '{name}' refcount overflow")]
    RefcountOverflow { name: String },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The backend handed back a reply shape the translator cannot consume.
    /// The request cannot be completed; callers usually abort the surrounding
    /// operation.
    #[error("Unexpected {kind} reply for {opcode} (rc={rc})")]
    UnexpectedReply {
        opcode: Opcode,
        kind: ReplyKind,
        rc: i64,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BrokerError {
    /// Whether this error leaves the surrounding request unrecoverable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BrokerError::UnexpectedReply { .. } | BrokerError::Corrupted { .. }
        )
    }
}
