//! Completion Module
//!
//! Turns finished backend exchanges into application-visible completions.
//!
//! ## Responsibilities
//! - Map raw backend return codes onto the [`Status`] taxonomy
//! - Refine status and value per opcode (byte counts, iterator handles,
//!   namespace sizes)
//! - Keep completions produced by an earlier protocol stage untouched
//!
//! ## Flow
//! ```text
//!   Request ──┐
//!   Reply   ──┼──► Translator ──► baseline(rc) ──► refine(opcode) ──► Completion
//!   rc      ──┘
//! ```

mod request;
mod translator;

pub use request::{AppHandle, Request, StageSpec};
pub use translator::Translator;

use crate::protocol::Status;

/// Outcome delivered to the application for one request
///
/// Created once per request and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Application request this completion answers
    pub app: AppHandle,

    /// Final status
    pub status: Status,

    /// Opcode-dependent return value (bytes, handle, namespace size, or 0)
    pub value: i64,
}

impl Completion {
    /// Create a completion bound to an application handle
    pub fn new(app: AppHandle, status: Status, value: i64) -> Self {
        Self { app, status, value }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
