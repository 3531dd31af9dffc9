//! Error taxonomy for unbuffered I/O operations
//!
//! Sync and async entry points share this single vocabulary: failures that
//! surface through a completion channel carry the same kinds as failures
//! returned from a blocking call. End-of-file is *not* represented here — a
//! read that returns `0` bytes reached EOF exactly at its offset, and a short
//! transfer is the designed terminal signal of a completion loop, never an
//! error.

use std::fmt;
use std::io;

/// Result alias for operations in this crate
pub type Result<T> = std::result::Result<T, DirectIoError>;

/// Error kind for unbuffered I/O operations
#[derive(Debug)]
pub enum DirectIoError {
    /// Aligned allocation failed (zero size, bad alignment, or the platform
    /// allocator returned null)
    Allocation {
        /// Requested usable size in bytes
        size: usize,
        /// Requested alignment in bytes
        alignment: usize,
    },
    /// An offset, buffer address, or buffer length violated the alignment
    /// constraint of unbuffered mode. Retrying with the same arguments would
    /// fail identically, so this is never retried locally.
    InvalidOffsetOrAlignment {
        /// Native error code (`EINVAL` for locally detected violations)
        code: i32,
    },
    /// A cancellation request landed before the native call was issued;
    /// nothing was transferred
    Cancelled,
    /// The underlying positional-vectored primitive failed
    Underlying(io::Error),
}

impl DirectIoError {
    /// Locally detected alignment violation, tagged with the code the native
    /// call would have produced
    pub(crate) fn misaligned() -> Self {
        DirectIoError::InvalidOffsetOrAlignment { code: libc::EINVAL }
    }

    /// Check whether this is an alignment violation
    #[inline]
    pub fn is_alignment(&self) -> bool {
        matches!(self, DirectIoError::InvalidOffsetOrAlignment { .. })
    }

    /// Check whether this is a cancellation
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DirectIoError::Cancelled)
    }

    /// The native error code attached to this failure, if any
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            DirectIoError::InvalidOffsetOrAlignment { code } => Some(*code),
            DirectIoError::Underlying(e) => e.raw_os_error(),
            _ => None,
        }
    }
}

impl fmt::Display for DirectIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectIoError::Allocation { size, alignment } => {
                write!(f, "aligned allocation failed (size={size}, alignment={alignment})")
            }
            DirectIoError::InvalidOffsetOrAlignment { code } => {
                write!(f, "offset, address, or length violates unbuffered alignment (code {code})")
            }
            DirectIoError::Cancelled => write!(f, "operation cancelled before submission"),
            DirectIoError::Underlying(e) => write!(f, "underlying I/O failure: {e}"),
        }
    }
}

impl std::error::Error for DirectIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectIoError::Underlying(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DirectIoError {
    /// Classify a native failure. `EINVAL` from an unbuffered handle means
    /// the offset or a buffer violated the alignment contract.
    fn from(value: io::Error) -> Self {
        match value.raw_os_error() {
            Some(code) if code == libc::EINVAL => {
                DirectIoError::InvalidOffsetOrAlignment { code }
            }
            _ => DirectIoError::Underlying(value),
        }
    }
}

impl From<DirectIoError> for io::Error {
    fn from(value: DirectIoError) -> Self {
        match value {
            DirectIoError::Underlying(e) => e,
            DirectIoError::InvalidOffsetOrAlignment { code } => {
                io::Error::from_raw_os_error(code)
            }
            other => io::Error::other(other),
        }
    }
}
