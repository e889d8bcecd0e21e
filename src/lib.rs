//! # databroker
//!
//! Backend-facing layer of a distributed key-value data broker:
//! - Opcode-aware translation of backend return codes into completions
//! - Reference-counted namespaces with corruption detection
//! - A circular registry of the currently active namespaces
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Request-processing workers                 │
//! │             (request, reply, rc) per finished I/O           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Backend                             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌───────────────────┐
//!   │ Translator  │          │ NamespaceRegistry │
//!   │ (rc→status) │          │     (RwLock)      │
//!   └──────┬──────┘          └─────────┬─────────┘
//!          │                           │
//!          ▼                           ▼
//!   ┌─────────────┐            ┌─────────────┐
//!   │ Completion  │            │  Namespace  │
//!   │             │            │ (atomic rc) │
//!   └─────────────┘            └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod completion;
pub mod namespace;
pub mod backend;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BrokerError, Result};
pub use config::Config;
pub use backend::Backend;
pub use completion::{Completion, Request, Translator};
pub use namespace::{Namespace, NamespaceRegistry};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the databroker backend
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
