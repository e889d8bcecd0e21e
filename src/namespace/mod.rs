//! Namespace Module
//!
//! Named, reference-counted partitions of the key space and the registry
//! tracking the active ones.
//!
//! ## Responsibilities
//! - Reference counting with lock-free attach/detach/destroy
//! - Detect corrupted or released handles before mutating them
//! - Track active namespaces in a circular, unsorted registry
//!
//! ## Lifecycle
//! ```text
//!   create ──► Active(1) ──attach──► Active(n+1)
//!                 │  ▲                   │
//!                 │  └──────detach───────┘
//!                 │
//!   detach(1) / destroy(1) ──► Released (terminal)
//! ```
//!
//! Registry membership does not hold a reference: a namespace may be
//! unregistered while still attached elsewhere, and vice versa.

mod entry;
mod registry;

pub use entry::{Namespace, NamespaceId, RawState};
pub use registry::NamespaceRegistry;
