//! Positional vectored device abstraction
//!
//! A device is the opaque primitive this crate invokes but never implements:
//! one positional scatter/gather call `(handle, offset, ordered buffers) ->
//! bytes transferred`. Implementations here wrap real files (with optional
//! unbuffered mode), an in-memory store for tests, and io_uring on Linux.

mod file;
mod memory;
mod traits;
#[cfg(all(target_os = "linux", feature = "io_uring"))]
mod uring;

pub use file::FileDevice;
pub use memory::MemDevice;
pub use traits::{SyncVectoredDevice, VectoredDevice};
#[cfg(all(target_os = "linux", feature = "io_uring"))]
pub use uring::UringDevice;
