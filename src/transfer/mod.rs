//! Completion loops for whole-payload transfers
//!
//! A single positional call may move fewer bytes than requested. Under
//! unbuffered access that short transfer is terminal: the advanced offset is
//! no longer sector-aligned, so any further call there would fail. The
//! drivers here advance the offset by each call's count and stop the
//! instant a call comes back short — that early termination is the
//! correctness property of the loop, not an optimization.

mod executor;

use std::fmt;

use executor::BlockingBridge;

use crate::buffer::{BufferList, BufferPool, IoVec};
use crate::device::VectoredDevice;
use crate::engine;
use crate::error::{DirectIoError, Result};

/// Progress of a driven transfer.
///
/// `ShortCircuited` is a terminal *success*: the loop stopped at a boundary
/// (EOF or alignment limit), not at a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferPhase {
    /// No call issued yet
    #[default]
    NotStarted,
    /// At least one call issued, none short so far
    InProgress,
    /// Every requested byte was transferred
    Complete,
    /// A call returned fewer bytes than requested; the loop stopped there
    ShortCircuited,
}

impl TransferPhase {
    /// Check if the transfer has reached a terminal phase
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, TransferPhase::Complete | TransferPhase::ShortCircuited)
    }

    /// Check if the transfer ended at a short-transfer boundary
    #[inline]
    pub const fn is_short_circuited(&self) -> bool {
        matches!(self, TransferPhase::ShortCircuited)
    }

    /// Check if every requested byte was transferred
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, TransferPhase::Complete)
    }

    /// Get the phase as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransferPhase::NotStarted => "NotStarted",
            TransferPhase::InProgress => "InProgress",
            TransferPhase::Complete => "Complete",
            TransferPhase::ShortCircuited => "ShortCircuited",
        }
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a driven transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Total bytes moved across all calls
    pub bytes_transferred: u64,
    /// Terminal phase the loop reached
    pub phase: TransferPhase,
}

/// Read from `offset` until the first short transfer, leasing one pool
/// buffer per call and handing each filled prefix to `sink`.
///
/// The pool's buffer size must be a multiple of the device alignment so
/// every full round leaves the offset aligned. A read loop has no target
/// length, so its successful terminal is always `ShortCircuited` — either
/// an undersized final call or an immediate EOF.
pub async fn drive_read_async(
    dev: &impl VectoredDevice,
    pool: &BufferPool,
    offset: u64,
    mut sink: impl FnMut(&[u8]),
) -> Result<TransferOutcome> {
    let alignment = dev.alignment();
    if pool.buffer_size() == 0 || (alignment > 1 && pool.buffer_size() % alignment != 0) {
        return Err(DirectIoError::misaligned());
    }

    let mut position = offset;
    let mut total = 0u64;

    let phase = loop {
        let mut lease = pool.lease()?;
        let capacity = lease.len();

        let n = {
            let mut list = BufferList::new(vec![IoVec::Read(lease.view())]);
            engine::read_async(dev, position, &mut list).await?
        };

        if n > 0 {
            sink(&lease.as_slice()[..n]);
            total += n as u64;
            position += n as u64;
        }

        if n < capacity {
            // Terminal boundary: the next offset is no longer aligned (or
            // EOF sits exactly here), so no further call may be issued.
            if tracing::enabled!(tracing::Level::DEBUG) {
                tracing::debug!(total, position, short = n, "read loop short-circuited");
            }
            break TransferPhase::ShortCircuited;
        }
    };

    Ok(TransferOutcome {
        bytes_transferred: total,
        phase,
    })
}

/// Write `content` from `offset` in pool-buffer-sized chunks, staging each
/// chunk through an aligned lease, advancing the offset by each call's
/// count.
///
/// `content.len()` and the pool buffer size must both be multiples of the
/// device alignment — padding a final partial sector belongs to an outer
/// layer. A short write stops the loop as `ShortCircuited`; writing every
/// chunk in full ends `Complete`.
pub async fn drive_write_async(
    dev: &impl VectoredDevice,
    pool: &BufferPool,
    offset: u64,
    content: &[u8],
) -> Result<TransferOutcome> {
    let alignment = dev.alignment();
    let chunk_size = pool.buffer_size();
    if chunk_size == 0
        || (alignment > 1 && (chunk_size % alignment != 0 || content.len() % alignment != 0))
    {
        return Err(DirectIoError::misaligned());
    }

    let mut phase = TransferPhase::Complete;
    let mut position = offset;
    let mut total = 0u64;

    for chunk in content.chunks(chunk_size) {
        let mut lease = pool.lease()?;
        lease.view()[..chunk.len()].copy_from_slice(chunk);

        let n = {
            let list = BufferList::new(vec![IoVec::Write(&lease.as_slice()[..chunk.len()])]);
            engine::write_async(dev, position, &list).await?
        };
        total += n as u64;
        position += n as u64;

        if n < chunk.len() {
            if tracing::enabled!(tracing::Level::DEBUG) {
                tracing::debug!(total, position, short = n, "write loop short-circuited");
            }
            phase = TransferPhase::ShortCircuited;
            break;
        }
    }

    Ok(TransferOutcome {
        bytes_transferred: total,
        phase,
    })
}

/// Blocking façade over [`drive_read_async`]: the same loop driven to
/// completion through the executor bridge
pub fn drive_read(
    dev: &impl VectoredDevice,
    pool: &BufferPool,
    offset: u64,
    sink: impl FnMut(&[u8]),
) -> Result<TransferOutcome> {
    BlockingBridge::acquire()?.run(drive_read_async(dev, pool, offset, sink))
}

/// Blocking façade over [`drive_write_async`]
pub fn drive_write(
    dev: &impl VectoredDevice,
    pool: &BufferPool,
    offset: u64,
    content: &[u8],
) -> Result<TransferOutcome> {
    BlockingBridge::acquire()?.run(drive_write_async(dev, pool, offset, content))
}

/// Read everything reachable from `offset` into a vector
pub fn drive_read_to_vec(
    dev: &impl VectoredDevice,
    pool: &BufferPool,
    offset: u64,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    drive_read(dev, pool, offset, |chunk| out.extend_from_slice(chunk))?;
    Ok(out)
}
