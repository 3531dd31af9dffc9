//! Aligned buffer management for unbuffered I/O
//!
//! Unbuffered (direct) file access requires every buffer address, buffer
//! length, and file offset to be a multiple of the storage device's sector
//! size. This module provides the aligned allocation primitive, a pool for
//! reusing equally sized buffers, and the tagged buffer views handed to the
//! scatter/gather engine.

mod aligned;
mod pool;
mod view;

pub use aligned::{is_aligned, is_power_of_two, page_size, round_up_to_alignment, AlignedBuffer};
pub use pool::{BufferPool, LeasedBuffer};
pub use view::{BufferList, IoVec};
