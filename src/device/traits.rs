//! Device traits for positional vectored I/O

use std::future::Future;
use std::io::{self, IoSlice, IoSliceMut};
use std::pin::Pin;

/// Synchronous positional vectored device.
///
/// Every call carries its own explicit file offset; there is no shared
/// implicit cursor, so concurrent operations on disjoint ranges of one
/// handle are safe by construction. A returned count is attributed to the
/// buffers in list order, whether the implementation issues one combined
/// native call or one call per buffer.
pub trait SyncVectoredDevice: Send + Sync + 'static {
    /// Scatter read starting at `offset`, filling `bufs` in order.
    ///
    /// Returns the number of bytes read, at most the sum of buffer lengths;
    /// `0` means EOF was reached exactly at `offset`.
    fn readv_at(&self, offset: u64, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize>;

    /// Gather write starting at `offset`, consuming `bufs` in order.
    fn writev_at(&self, offset: u64, bufs: &[IoSlice<'_>]) -> io::Result<usize>;

    /// Flush any device-side buffering to stable storage
    fn flush(&self) -> io::Result<()>;

    /// Truncate the device to the specified size
    fn truncate(&self, size: u64) -> io::Result<()>;

    /// Current size of the device in bytes
    fn size(&self) -> io::Result<u64>;

    /// Alignment constraint for offsets, buffer addresses, and buffer
    /// lengths under unbuffered access
    fn alignment(&self) -> usize {
        crate::constants::DEFAULT_SECTOR_SIZE
    }
}

/// Asynchronous positional vectored device.
///
/// Identical contract to [`SyncVectoredDevice`]; the caller's execution
/// suspends until the completion signal arrives instead of blocking a
/// worker. Every synchronous device gets this interface through a blanket
/// impl.
pub trait VectoredDevice: Send + Sync + 'static {
    /// Scatter read starting at `offset`; see [`SyncVectoredDevice::readv_at`]
    fn readv<'a, 'b>(
        &'a self,
        offset: u64,
        bufs: &'a mut [IoSliceMut<'b>],
    ) -> Pin<Box<dyn Future<Output = io::Result<usize>> + Send + 'a>>
    where
        'b: 'a;

    /// Gather write starting at `offset`; see [`SyncVectoredDevice::writev_at`]
    fn writev<'a, 'b>(
        &'a self,
        offset: u64,
        bufs: &'a [IoSlice<'b>],
    ) -> Pin<Box<dyn Future<Output = io::Result<usize>> + Send + 'a>>
    where
        'b: 'a;

    /// Flush any device-side buffering to stable storage
    fn flush(&self) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + '_>>;

    /// Truncate the device to the specified size
    fn truncate(&self, size: u64) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + '_>>;

    /// Current size of the device in bytes
    fn size(&self) -> io::Result<u64>;

    /// Alignment constraint for offsets, addresses, and lengths
    fn alignment(&self) -> usize {
        crate::constants::DEFAULT_SECTOR_SIZE
    }
}

impl<T: SyncVectoredDevice> VectoredDevice for T {
    fn readv<'a, 'b>(
        &'a self,
        offset: u64,
        bufs: &'a mut [IoSliceMut<'b>],
    ) -> Pin<Box<dyn Future<Output = io::Result<usize>> + Send + 'a>>
    where
        'b: 'a,
    {
        let result = self.readv_at(offset, bufs);
        Box::pin(async move { result })
    }

    fn writev<'a, 'b>(
        &'a self,
        offset: u64,
        bufs: &'a [IoSlice<'b>],
    ) -> Pin<Box<dyn Future<Output = io::Result<usize>> + Send + 'a>>
    where
        'b: 'a,
    {
        let result = self.writev_at(offset, bufs);
        Box::pin(async move { result })
    }

    fn flush(&self) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + '_>> {
        let result = SyncVectoredDevice::flush(self);
        Box::pin(async move { result })
    }

    fn truncate(&self, size: u64) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + '_>> {
        let result = SyncVectoredDevice::truncate(self, size);
        Box::pin(async move { result })
    }

    fn size(&self) -> io::Result<u64> {
        SyncVectoredDevice::size(self)
    }

    fn alignment(&self) -> usize {
        SyncVectoredDevice::alignment(self)
    }
}
