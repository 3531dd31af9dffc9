//! Positional vectored read/write engine
//!
//! One scatter/gather call at an explicit file offset. The engine validates
//! the unbuffered-mode alignment contract before touching the device,
//! short-circuits empty buffer lists without invoking the primitive, and
//! classifies native `EINVAL` as an alignment violation. It never retries:
//! an alignment violation would fail identically on retry, and a short
//! transfer is a boundary signal for the completion loop, not a fault.

mod cancel;

pub use cancel::CancelToken;

use crate::buffer::{is_aligned, BufferList};
use crate::device::{SyncVectoredDevice, VectoredDevice};
use crate::error::{DirectIoError, Result};

/// Check offset, every view address, and every view length against the
/// device's alignment constraint. Violations are surfaced immediately with
/// the native code attached and are never retried.
fn ensure_aligned(offset: u64, bufs: &BufferList<'_>, alignment: usize) -> Result<()> {
    if alignment <= 1 {
        return Ok(());
    }
    let aligned = is_aligned(offset as usize, alignment)
        && bufs
            .iter()
            .all(|v| is_aligned(v.addr(), alignment) && is_aligned(v.len(), alignment));
    if !aligned {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(offset, alignment, "rejecting misaligned submission");
        }
        return Err(DirectIoError::misaligned());
    }
    Ok(())
}

/// Issue one scatter read at `offset`, filling the views in list order.
///
/// Returns `Ok(0)` when EOF sits exactly at `offset`, and `Ok(0)` without
/// invoking the device at all for an empty list. The returned count is at
/// most [`BufferList::total_len`]; attribution to individual views follows
/// [`BufferList::attribute`].
pub fn read(dev: &impl SyncVectoredDevice, offset: u64, bufs: &mut BufferList<'_>) -> Result<usize> {
    if bufs.is_empty() {
        return Ok(0);
    }
    ensure_aligned(offset, bufs, dev.alignment())?;
    let mut slices = bufs.read_slices().ok_or_else(DirectIoError::misaligned)?;
    Ok(dev.readv_at(offset, &mut slices)?)
}

/// Issue one gather write at `offset`, consuming the views in list order.
///
/// A full write returns the sum of view lengths; a short count is
/// legitimate only at true end-of-file extension and is reported, never
/// raised as an error.
pub fn write(dev: &impl SyncVectoredDevice, offset: u64, bufs: &BufferList<'_>) -> Result<usize> {
    if bufs.is_empty() {
        return Ok(0);
    }
    ensure_aligned(offset, bufs, dev.alignment())?;
    let slices = bufs.write_slices().ok_or_else(DirectIoError::misaligned)?;
    Ok(dev.writev_at(offset, &slices)?)
}

/// Suspending form of [`read`]; identical contract. The caller suspends at
/// the native-call boundary only — validation and buffer handling never
/// suspend.
pub async fn read_async(
    dev: &impl VectoredDevice,
    offset: u64,
    bufs: &mut BufferList<'_>,
) -> Result<usize> {
    if bufs.is_empty() {
        return Ok(0);
    }
    ensure_aligned(offset, bufs, dev.alignment())?;
    let mut slices = bufs.read_slices().ok_or_else(DirectIoError::misaligned)?;
    Ok(dev.readv(offset, &mut slices).await?)
}

/// Suspending form of [`write`]; identical contract
pub async fn write_async(
    dev: &impl VectoredDevice,
    offset: u64,
    bufs: &BufferList<'_>,
) -> Result<usize> {
    if bufs.is_empty() {
        return Ok(0);
    }
    ensure_aligned(offset, bufs, dev.alignment())?;
    let slices = bufs.write_slices().ok_or_else(DirectIoError::misaligned)?;
    Ok(dev.writev(offset, &slices).await?)
}

/// [`read_async`] with best-effort cancellation.
///
/// Policy: a token observed cancelled before the primitive is issued fails
/// with [`DirectIoError::Cancelled`] and transfers nothing. Once issued,
/// the native call runs to completion and the transferred count is reported
/// even if the token was set mid-flight — partial transfers are never
/// discarded.
pub async fn read_async_cancellable(
    dev: &impl VectoredDevice,
    offset: u64,
    bufs: &mut BufferList<'_>,
    token: &CancelToken,
) -> Result<usize> {
    if token.is_cancelled() {
        return Err(DirectIoError::Cancelled);
    }
    read_async(dev, offset, bufs).await
}

/// [`write_async`] with best-effort cancellation; same policy as
/// [`read_async_cancellable`]
pub async fn write_async_cancellable(
    dev: &impl VectoredDevice,
    offset: u64,
    bufs: &BufferList<'_>,
    token: &CancelToken,
) -> Result<usize> {
    if token.is_cancelled() {
        return Err(DirectIoError::Cancelled);
    }
    write_async(dev, offset, bufs).await
}
