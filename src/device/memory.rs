//! In-memory device for tests and benchmarks
//!
//! Deterministic: a read always fills as many bytes as remain before the
//! logical end, in list order, and the call counters make it possible to
//! assert exactly when the underlying primitive was invoked.

use std::io::{self, IoSlice, IoSliceMut};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::device::SyncVectoredDevice;

/// In-memory positional vectored device.
///
/// Reads stop at the logical size (EOF); writes extend it. The configured
/// alignment is reported but not enforced here — enforcement is the
/// engine's job, which is exactly what tests exercise.
pub struct MemDevice {
    data: Mutex<Vec<u8>>,
    alignment: usize,
    read_calls: AtomicU64,
    write_calls: AtomicU64,
}

impl MemDevice {
    /// Create an empty device reporting no alignment constraint
    pub fn new() -> Self {
        Self::with_alignment(1)
    }

    /// Create an empty device reporting the given alignment constraint
    pub fn with_alignment(alignment: usize) -> Self {
        Self {
            data: Mutex::new(Vec::new()),
            alignment,
            read_calls: AtomicU64::new(0),
            write_calls: AtomicU64::new(0),
        }
    }

    /// Create a device pre-seeded with content
    pub fn with_content(content: &[u8]) -> Self {
        let dev = Self::new();
        *dev.data.lock() = content.to_vec();
        dev
    }

    /// Number of times the read primitive was invoked
    pub fn read_calls(&self) -> u64 {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Number of times the write primitive was invoked
    pub fn write_calls(&self) -> u64 {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of the device content
    pub fn content(&self) -> Vec<u8> {
        self.data.lock().clone()
    }
}

impl Default for MemDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncVectoredDevice for MemDevice {
    fn readv_at(&self, offset: u64, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);

        let data = self.data.lock();
        let mut pos = offset as usize;
        let mut total = 0usize;

        for buf in bufs.iter_mut() {
            if pos >= data.len() {
                break;
            }
            let take = buf.len().min(data.len() - pos);
            buf[..take].copy_from_slice(&data[pos..pos + take]);
            pos += take;
            total += take;
            if take < buf.len() {
                break;
            }
        }
        Ok(total)
    }

    fn writev_at(&self, offset: u64, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        let mut data = self.data.lock();
        let mut pos = offset as usize;
        let mut total = 0usize;

        for buf in bufs.iter() {
            let end = pos + buf.len();
            if end > data.len() {
                data.resize(end, 0);
            }
            data[pos..end].copy_from_slice(buf);
            pos = end;
            total += buf.len();
        }
        Ok(total)
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    fn truncate(&self, size: u64) -> io::Result<()> {
        self.data.lock().resize(size as usize, 0);
        Ok(())
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.data.lock().len() as u64)
    }

    fn alignment(&self) -> usize {
        self.alignment
    }
}
