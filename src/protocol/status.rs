//! Completion status definitions
//!
//! The closed set of outcomes an application can observe.

use std::fmt;

/// Completion status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    Success = 0x00,
    Unavailable = 0x01,
    Exists = 0x02,
    BackendGeneral = 0x03,
    NoMemory = 0x04,
    Invalid = 0x05,
    InProgress = 0x06,
    OutOfUserBuffer = 0x07,
    NamespaceInvalid = 0x08,
    NamespaceBusy = 0x09,
    NoFile = 0x0A,
    Cancelled = 0x0B,
}

impl Status {
    pub fn is_success(&self) -> bool {
        *self == Status::Success
    }

    /// Human-readable description handed to applications
    pub fn message(&self) -> &'static str {
        match self {
            Status::Success => "Operation successful",
            Status::Unavailable => "Entry not available",
            Status::Exists => "Entry already exists",
            Status::BackendGeneral => "General backend error",
            Status::NoMemory => "Not enough memory",
            Status::Invalid => "Invalid argument or message",
            Status::InProgress => "Operation in progress",
            Status::OutOfUserBuffer => "User buffer too small",
            Status::NamespaceInvalid => "Namespace invalid or does not exist",
            Status::NamespaceBusy => "Namespace still referenced",
            Status::NoFile => "Source entry lost during transfer",
            Status::Cancelled => "Operation cancelled",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
