//! oxidirect - unbuffered, sector-aligned positional vectored file I/O
//!
//! This crate provides the low-level building blocks used by storage engines
//! that bypass the OS page cache for predictable latency:
//!
//! - **Aligned buffers**: memory regions whose start address is a multiple of
//!   a required boundary, with pooled reuse
//! - **Vectored positional I/O**: one scatter/gather read or write at an
//!   explicit file offset across an ordered list of buffer views, in blocking
//!   and suspending forms
//! - **Completion loops**: drive repeated calls to transfer an entire logical
//!   payload, terminating precisely at the first short transfer
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use oxidirect::buffer::{AlignedBuffer, BufferList, IoVec};
//! use oxidirect::device::FileDevice;
//! use oxidirect::engine;
//!
//! let dev = FileDevice::open("data.bin", true, false)?;
//! let mut buf = AlignedBuffer::allocate(4096, 4096)?;
//! let mut list = BufferList::new(vec![IoVec::Read(buf.view())]);
//! let n = engine::read(&dev, 0, &mut list)?;
//! ```
//!
//! Short transfers are not errors here: a call that returns fewer bytes than
//! requested signals a boundary (EOF or alignment limit), and any further
//! call at the resulting misaligned offset would fail under unbuffered mode.

#![warn(missing_docs)]

pub mod buffer;
pub mod device;
pub mod engine;
pub mod error;
pub mod transfer;

// Re-exports for convenience
pub use buffer::{AlignedBuffer, BufferList, BufferPool, IoVec};
pub use error::{DirectIoError, Result};
pub use transfer::{TransferOutcome, TransferPhase};

/// Constants used throughout the library
pub mod constants {
    /// Default sector alignment when a device does not report one
    pub const DEFAULT_SECTOR_SIZE: usize = 512;

    /// Common direct-I/O block size on modern storage
    pub const DIRECT_IO_BLOCK: usize = 4096;
}

/// Prelude module for common imports
pub mod prelude {
    pub use crate::buffer::{AlignedBuffer, BufferList, BufferPool, IoVec};
    pub use crate::device::{FileDevice, MemDevice, SyncVectoredDevice, VectoredDevice};
    pub use crate::error::{DirectIoError, Result};
    pub use crate::transfer::{TransferOutcome, TransferPhase};
}
