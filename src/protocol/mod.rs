//! Protocol Module
//!
//! Vocabulary shared between the request pipeline and the backend layer.
//!
//! ## Opcodes
//! - PUT / GET / READ / MOVE / DIRECTORY / REMOVE / ITERATOR: data operations
//! - NSCREATE / NSATTACH / NSDETACH / NSDELETE / NSQUERY: namespace operations
//!
//! ## Backend Return Codes
//! The backend reports each exchange as a signed 64-bit code:
//! ```text
//! ┌──────────────┬─────────────────────────────────────────┐
//! │     0        │ success                                 │
//! │   > 0        │ success with a count                    │
//! │   < 0        │ negated errno (-ENOENT, -EAGAIN, ...)   │
//! └──────────────┴─────────────────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! See [`Status`] for the closed taxonomy handed to applications.

pub mod codes;
mod opcode;
mod reply;
mod status;

pub use opcode::Opcode;
pub use reply::{Reply, ReplyKind};
pub use status::Status;
