//! Backend reply values
//!
//! The structured value a backend exchange leaves behind once its raw
//! protocol has been parsed.

use std::fmt;
use std::str::FromStr;

use crate::error::BrokerError;

/// Type tag of a backend reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    Integer,
    Bulk,
    Array,
    Nil,
    Error,
}

impl fmt::Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyKind::Integer => "integer",
            ReplyKind::Bulk => "bulk",
            ReplyKind::Array => "array",
            ReplyKind::Nil => "nil",
            ReplyKind::Error => "error",
        };
        f.write_str(name)
    }
}

impl FromStr for ReplyKind {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(ReplyKind::Integer),
            "bulk" => Ok(ReplyKind::Bulk),
            "array" => Ok(ReplyKind::Array),
            "nil" => Ok(ReplyKind::Nil),
            "error" => Ok(ReplyKind::Error),
            _ => Err(BrokerError::InvalidArgument(format!(
                "unknown reply kind '{}'",
                s
            ))),
        }
    }
}

/// A parsed backend reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Signed 64-bit integer (byte counts, sizes, iterator handles)
    Integer(i64),

    /// Bulk string payload
    Bulk(Vec<u8>),

    /// Array header with its element count
    Array(usize),

    /// Null reply
    Nil,

    /// Error string reported by the backend
    Error(String),
}

impl Reply {
    /// The reply's type tag
    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Integer(_) => ReplyKind::Integer,
            Reply::Bulk(_) => ReplyKind::Bulk,
            Reply::Array(_) => ReplyKind::Array,
            Reply::Nil => ReplyKind::Nil,
            Reply::Error(_) => ReplyKind::Error,
        }
    }

    /// The integer payload, if this is an integer reply
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(value) => Some(*value),
            _ => None,
        }
    }
}
