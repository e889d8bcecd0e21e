//! Backend return codes
//!
//! Negated errno values as reported by the backend exchange.

/// Exchange completed without error
pub const OK: i64 = 0;

/// Key or namespace does not exist
pub const NO_ENTRY: i64 = -(libc::ENOENT as i64);

/// Key or namespace already exists
pub const EXISTS: i64 = -(libc::EEXIST as i64);

/// Backend protocol violation
pub const PROTOCOL: i64 = -(libc::EPROTO as i64);

/// Backend ran out of memory
pub const NO_MEMORY: i64 = -(libc::ENOMEM as i64);

/// Malformed message
pub const BAD_MESSAGE: i64 = -(libc::EBADMSG as i64);

/// Invalid argument
pub const INVALID: i64 = -(libc::EINVAL as i64);

/// Operation would block / is still in progress
pub const WOULD_BLOCK: i64 = -(libc::EAGAIN as i64);

/// User buffer too small for the value
pub const NO_SPACE: i64 = -(libc::ENOSPC as i64);

/// A transfer could not move the full dump of an entry
pub const NO_DATA: i64 = -(libc::ENODATA as i64);

/// The delete phase of a transfer failed unexpectedly
pub const STALE: i64 = -(libc::ESTALE as i64);

/// Namespace still referenced
pub const BUSY: i64 = -(libc::EBUSY as i64);

/// Some backend stages report busy as a positive code
pub const BUSY_POSITIVE: i64 = libc::EBUSY as i64;

/// Whether `rc` signals a busy namespace in either sign convention
pub fn is_busy(rc: i64) -> bool {
    rc == BUSY || rc == BUSY_POSITIVE
}
