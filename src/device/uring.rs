//! Linux io_uring device (requires `feature = "io_uring"`)

#![cfg(all(target_os = "linux", feature = "io_uring"))]

use std::fs::OpenOptions;
use std::io::{self, IoSlice, IoSliceMut};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use io_uring::{opcode, types, IoUring};
use parking_lot::Mutex;

use crate::constants::DIRECT_IO_BLOCK;
use crate::device::SyncVectoredDevice;

struct RingState {
    ring: IoUring,
    file: std::fs::File,
}

/// io_uring-backed positional vectored device.
///
/// Each call submits a single `Readv`/`Writev` entry at an explicit offset
/// and waits for its completion. Initialization is lazy: the ring and file
/// are created on first use.
pub struct UringDevice {
    path: PathBuf,
    entries: u32,
    direct: bool,
    state: Mutex<Option<RingState>>,
}

impl UringDevice {
    /// Create a device for the given path (lazy initialization)
    pub fn new(path: impl AsRef<Path>, entries: u32, direct: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            entries: entries.max(2),
            direct,
            state: Mutex::new(None),
        }
    }

    /// Check if io_uring is available on this system
    pub fn is_available() -> bool {
        IoUring::new(2).is_ok()
    }

    /// Path (for debugging)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the ring and file; the next call re-initializes
    pub fn shutdown(&self) {
        *self.state.lock() = None;
    }

    fn ensure_initialized(&self) -> io::Result<()> {
        let mut guard = self.state.lock();
        if guard.is_some() {
            return Ok(());
        }

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        if self.direct {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_DIRECT);
        }
        let file = options.open(&self.path)?;

        let ring = IoUring::new(self.entries).map_err(|e| io::Error::other(e.to_string()))?;

        *guard = Some(RingState { ring, file });
        Ok(())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut RingState) -> io::Result<T>) -> io::Result<T> {
        self.ensure_initialized()?;
        let mut guard = self.state.lock();
        let state = guard
            .as_mut()
            .ok_or_else(|| io::Error::other("io_uring device not initialized"))?;
        f(state)
    }

    fn submit_and_wait_one(state: &mut RingState) -> io::Result<i32> {
        state
            .ring
            .submit_and_wait(1)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let mut cq = state.ring.completion();
        let cqe = cq.next().ok_or_else(|| io::Error::other("missing cqe"))?;
        Ok(cqe.result())
    }
}

impl SyncVectoredDevice for UringDevice {
    fn readv_at(&self, offset: u64, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        if bufs.is_empty() {
            return Ok(0);
        }

        self.with_state(|state| {
            let fd = types::Fd(state.file.as_raw_fd());
            // IoSliceMut is layout-compatible with iovec
            let entry = opcode::Readv::new(
                fd,
                bufs.as_mut_ptr() as *const libc::iovec,
                bufs.len() as u32,
            )
            .offset(offset)
            .build()
            .user_data(0);

            unsafe {
                state
                    .ring
                    .submission()
                    .push(&entry)
                    .map_err(|_| io::Error::other("submission queue full"))?;
            }

            let res = Self::submit_and_wait_one(state)?;
            if res < 0 {
                return Err(io::Error::from_raw_os_error(-res));
            }
            Ok(res as usize)
        })
    }

    fn writev_at(&self, offset: u64, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        if bufs.is_empty() {
            return Ok(0);
        }

        self.with_state(|state| {
            let fd = types::Fd(state.file.as_raw_fd());
            let entry = opcode::Writev::new(
                fd,
                bufs.as_ptr() as *const libc::iovec,
                bufs.len() as u32,
            )
            .offset(offset)
            .build()
            .user_data(0);

            unsafe {
                state
                    .ring
                    .submission()
                    .push(&entry)
                    .map_err(|_| io::Error::other("submission queue full"))?;
            }

            let res = Self::submit_and_wait_one(state)?;
            if res < 0 {
                return Err(io::Error::from_raw_os_error(-res));
            }
            Ok(res as usize)
        })
    }

    fn flush(&self) -> io::Result<()> {
        self.with_state(|state| {
            let fd = types::Fd(state.file.as_raw_fd());
            let entry = opcode::Fsync::new(fd).build().user_data(0);

            unsafe {
                state
                    .ring
                    .submission()
                    .push(&entry)
                    .map_err(|_| io::Error::other("submission queue full"))?;
            }

            let res = Self::submit_and_wait_one(state)?;
            if res < 0 {
                return Err(io::Error::from_raw_os_error(-res));
            }
            Ok(())
        })
    }

    fn truncate(&self, size: u64) -> io::Result<()> {
        self.with_state(|state| state.file.set_len(size))
    }

    fn size(&self) -> io::Result<u64> {
        self.with_state(|state| state.file.metadata().map(|m| m.len()))
    }

    fn alignment(&self) -> usize {
        if self.direct {
            DIRECT_IO_BLOCK
        } else {
            1
        }
    }
}
