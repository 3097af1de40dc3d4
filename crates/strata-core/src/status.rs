//! Unified status codes.
//!
//! A [`Status`] packs three things into 32 bits: a failure flag in the high
//! bit, the [`StatusOrigin`] subsystem in the next seven bits, and the
//! origin's own code in the low 24 bits. Callers branch on
//! [`Status::is_ok`]; the code itself is opaque and meant for logging.

use std::fmt;

use crate::error::AllocError;

const FAIL_MASK: u32 = 0x8000_0000;
const ORIGIN_MASK: u32 = 0x7f00_0000;
const CODE_MASK: u32 = 0x00ff_ffff;

/// Subsystem a [`Status`] code came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusOrigin {
    /// Codes defined by this runtime.
    Native,
    /// A POSIX `errno` value.
    Errno,
    /// An HTTP status code.
    Http,
    /// An origin this version does not know about.
    Other(u8),
}

impl StatusOrigin {
    fn bits(self) -> u32 {
        let raw = match self {
            Self::Native => 0x00,
            Self::Errno => 0x01,
            Self::Http => 0x02,
            Self::Other(v) => u32::from(v),
        };
        (raw << 24) & ORIGIN_MASK
    }

    fn from_bits(bits: u32) -> Self {
        match (bits & ORIGIN_MASK) >> 24 {
            0x00 => Self::Native,
            0x01 => Self::Errno,
            0x02 => Self::Http,
            v => Self::Other(v as u8),
        }
    }
}

/// A unified success/failure value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub struct Status(u32);

impl Status {
    /// Success.
    pub const OK: Status = Status::native(true, 0);
    /// Unspecified failure.
    pub const FAIL: Status = Status::native(false, 0);
    /// Operation started and will complete later.
    pub const PENDING: Status = Status::native(false, 1);
    /// Out of memory.
    pub const NO_MEM: Status = Status::native(false, 2);
    /// An invariant check failed.
    pub const ASSERT: Status = Status::native(false, 3);
    /// Not yet implemented.
    pub const NYI: Status = Status::native(false, 4);
    /// Target already exists.
    pub const EXISTS: Status = Status::native(false, 5);
    /// Target not found.
    pub const NOT_FOUND: Status = Status::native(false, 6);
    /// Expected a non-empty collection.
    pub const EMPTY: Status = Status::native(false, 7);
    /// Invalid argument.
    pub const ARGUMENT: Status = Status::native(false, 8);
    /// Target is shutting down.
    pub const SHUTDOWN: Status = Status::native(false, 9);
    /// Given value not big enough.
    pub const TOO_SMALL: Status = Status::native(false, 10);
    /// Given value too big.
    pub const TOO_LARGE: Status = Status::native(false, 11);
    /// Failed to parse a string.
    pub const PARSE: Status = Status::native(false, 12);
    /// No more items in a collection.
    pub const NO_MORE: Status = Status::native(false, 13);
    /// Unsupported version number.
    pub const VERSION: Status = Status::native(false, 14);
    /// Retry the operation later.
    pub const LATER: Status = Status::native(false, 15);
    /// Target no longer available.
    pub const EXPIRED: Status = Status::native(false, 16);
    /// Feature not supported.
    pub const SUPPORT: Status = Status::native(false, 17);
    /// I/O access out of bounds.
    pub const OVERRUN: Status = Status::native(false, 18);
    /// Operation in progress.
    pub const ASYNC: Status = Status::native(false, 19);

    const fn native(success: bool, code: u32) -> Self {
        let fail = if success { 0 } else { FAIL_MASK };
        Status(fail | (code & CODE_MASK))
    }

    /// Build a status from its parts. Bits of `code` above 24 are dropped.
    pub fn new(success: bool, origin: StatusOrigin, code: u32) -> Self {
        let fail = if success { 0 } else { FAIL_MASK };
        Status(fail | origin.bits() | (code & CODE_MASK))
    }

    /// Status for a POSIX `errno` value; zero means success.
    pub fn from_errno(errno: u32) -> Self {
        Self::new(errno == 0, StatusOrigin::Errno, errno)
    }

    /// Status for an HTTP response code; any 2xx is success.
    pub fn from_http(code: u32) -> Self {
        Self::new(code / 100 == 2, StatusOrigin::Http, code)
    }

    /// Whether this status reports success.
    pub fn is_ok(self) -> bool {
        self.0 & FAIL_MASK == 0
    }

    /// Whether this status reports failure.
    pub fn is_failed(self) -> bool {
        !self.is_ok()
    }

    /// The subsystem this status came from.
    pub fn origin(self) -> StatusOrigin {
        StatusOrigin::from_bits(self.0)
    }

    /// The origin-specific code.
    pub fn code(self) -> u32 {
        self.0 & CODE_MASK
    }

    /// The packed 32-bit representation.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Status({self}, {:#010x})", self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            write!(f, "ok")
        } else {
            write!(f, "failed({:?}, {})", self.origin(), self.code())
        }
    }
}

impl From<&AllocError> for Status {
    fn from(e: &AllocError) -> Self {
        match e {
            AllocError::OutOfMemory { .. } => Status::NO_MEM,
        }
    }
}

impl<E> From<Result<(), E>> for Status
where
    for<'a> Status: From<&'a E>,
{
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Status::OK,
            Err(e) => Status::from(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AllocTag;

    #[test]
    fn ok_is_zero() {
        assert_eq!(Status::OK.bits(), 0);
        assert!(Status::OK.is_ok());
    }

    #[test]
    fn native_failures_carry_code() {
        assert!(Status::NO_MEM.is_failed());
        assert_eq!(Status::NO_MEM.origin(), StatusOrigin::Native);
        assert_eq!(Status::NO_MEM.code(), 2);
        assert_eq!(Status::ASYNC.code(), 19);
    }

    #[test]
    fn errno_zero_is_success() {
        assert!(Status::from_errno(0).is_ok());
        let s = Status::from_errno(12);
        assert!(s.is_failed());
        assert_eq!(s.origin(), StatusOrigin::Errno);
        assert_eq!(s.code(), 12);
    }

    #[test]
    fn http_2xx_is_success() {
        assert!(Status::from_http(204).is_ok());
        let s = Status::from_http(404);
        assert!(s.is_failed());
        assert_eq!(s.origin(), StatusOrigin::Http);
        assert_eq!(s.code(), 404);
    }

    #[test]
    fn code_is_truncated_to_24_bits() {
        let s = Status::new(false, StatusOrigin::Native, 0x0123_4567);
        assert_eq!(s.code(), 0x23_4567);
        assert_eq!(s.origin(), StatusOrigin::Native);
    }

    #[test]
    fn alloc_error_maps_to_no_mem() {
        let e = AllocError::OutOfMemory {
            requested: 64,
            tag: AllocTag::new(*b"test"),
        };
        assert_eq!(Status::from(&e), Status::NO_MEM);
        assert_eq!(Status::from(Err::<(), _>(e)), Status::NO_MEM);
        assert_eq!(Status::from(Ok::<(), AllocError>(())), Status::OK);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Status::OK.to_string(), "ok");
        assert_eq!(Status::NO_MEM.to_string(), "failed(Native, 2)");
    }
}
