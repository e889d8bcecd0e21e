//! Opcode definitions
//!
//! The logical operation a request represents.

use std::fmt;
use std::str::FromStr;

use crate::error::BrokerError;

/// Opcodes understood by the completion translator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Put = 0x01,
    Get = 0x02,
    Read = 0x03,
    Move = 0x04,
    Directory = 0x05,
    NsCreate = 0x06,
    NsAttach = 0x07,
    NsDetach = 0x08,
    NsDelete = 0x09,
    NsQuery = 0x0A,
    Iterator = 0x0B,
    Remove = 0x0C,
}

impl Opcode {
    /// All opcodes, in wire order
    pub const ALL: [Opcode; 12] = [
        Opcode::Put,
        Opcode::Get,
        Opcode::Read,
        Opcode::Move,
        Opcode::Directory,
        Opcode::NsCreate,
        Opcode::NsAttach,
        Opcode::NsDetach,
        Opcode::NsDelete,
        Opcode::NsQuery,
        Opcode::Iterator,
        Opcode::Remove,
    ];

    /// Lower-case name used in logs and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Opcode::Put => "put",
            Opcode::Get => "get",
            Opcode::Read => "read",
            Opcode::Move => "move",
            Opcode::Directory => "directory",
            Opcode::NsCreate => "nscreate",
            Opcode::NsAttach => "nsattach",
            Opcode::NsDetach => "nsdetach",
            Opcode::NsDelete => "nsdelete",
            Opcode::NsQuery => "nsquery",
            Opcode::Iterator => "iterator",
            Opcode::Remove => "remove",
        }
    }

    /// Whether the opcode operates on a namespace rather than a key
    pub fn is_namespace_op(&self) -> bool {
        matches!(
            self,
            Opcode::NsCreate
                | Opcode::NsAttach
                | Opcode::NsDetach
                | Opcode::NsDelete
                | Opcode::NsQuery
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Opcode {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == lower)
            .ok_or_else(|| BrokerError::InvalidArgument(format!("unknown opcode '{}'", s)))
    }
}
