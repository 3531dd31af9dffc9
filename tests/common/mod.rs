//! Shared test helpers.
#![allow(dead_code)]

use std::io::{self, IoSlice, IoSliceMut};

use parking_lot::Mutex;

use oxidirect::device::SyncVectoredDevice;

/// Wraps a device and records the byte count returned by every read and
/// write call, so tests can assert on the exact call sequence the
/// completion loop issued.
pub struct RecordingDevice<T: SyncVectoredDevice> {
    inner: T,
    read_returns: Mutex<Vec<usize>>,
    write_returns: Mutex<Vec<usize>>,
}

impl<T: SyncVectoredDevice> RecordingDevice<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            read_returns: Mutex::new(Vec::new()),
            write_returns: Mutex::new(Vec::new()),
        }
    }

    pub fn read_returns(&self) -> Vec<usize> {
        self.read_returns.lock().clone()
    }

    pub fn write_returns(&self) -> Vec<usize> {
        self.write_returns.lock().clone()
    }
}

impl<T: SyncVectoredDevice> SyncVectoredDevice for RecordingDevice<T> {
    fn readv_at(&self, offset: u64, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        let n = self.inner.readv_at(offset, bufs)?;
        self.read_returns.lock().push(n);
        Ok(n)
    }

    fn writev_at(&self, offset: u64, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        let n = self.inner.writev_at(offset, bufs)?;
        self.write_returns.lock().push(n);
        Ok(n)
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.flush()
    }

    fn truncate(&self, size: u64) -> io::Result<()> {
        self.inner.truncate(size)
    }

    fn size(&self) -> io::Result<u64> {
        self.inner.size()
    }

    fn alignment(&self) -> usize {
        self.inner.alignment()
    }
}

/// Deterministic pseudo-random payload for content comparisons.
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| ((i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 32) as u8)
        .collect()
}
