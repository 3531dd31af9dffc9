//! File-backed positional vectored device
//!
//! On unix each call maps to a single `preadv`/`pwritev` syscall;
//! `IoSliceMut` is guaranteed ABI-compatible with `iovec`, so the slice
//! array is handed to libc directly. On Windows the fallback issues one
//! positional transfer per buffer, stopping at the first short one, which
//! preserves the same list-order attribution.

use std::fs::{File, OpenOptions};
use std::io::{self, IoSlice, IoSliceMut};
use std::path::{Path, PathBuf};

use crate::constants::DIRECT_IO_BLOCK;
use crate::device::SyncVectoredDevice;

/// File-backed device with optional unbuffered (direct) mode.
///
/// In unbuffered mode the file is opened bypassing the OS page cache
/// (`O_DIRECT` on Linux, `F_NOCACHE` on macOS) and reports a 4096-byte
/// alignment; buffered handles report alignment 1.
pub struct FileDevice {
    path: PathBuf,
    file: File,
    alignment: usize,
    direct: bool,
}

impl FileDevice {
    /// Open or create a file at the specified path.
    ///
    /// With `direct` set, the handle bypasses the OS page cache where the
    /// platform supports it, and offsets, addresses, and lengths must be
    /// sector-aligned.
    pub fn open(path: impl AsRef<Path>, create: bool, direct: bool) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(create);
        if direct {
            request_unbuffered_open(&mut options);
        }

        let file = options.open(&path)?;
        if direct {
            bypass_page_cache(&file)?;
        }

        Ok(Self {
            path,
            file,
            alignment: if direct { DIRECT_IO_BLOCK } else { 1 },
            direct,
        })
    }

    /// Override the reported alignment (e.g. a 512-byte-sector device)
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = alignment;
        self
    }

    /// Get the path to the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if unbuffered mode was requested
    pub fn direct(&self) -> bool {
        self.direct
    }
}

#[cfg(target_os = "linux")]
fn request_unbuffered_open(options: &mut OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.custom_flags(libc::O_DIRECT);
}

#[cfg(not(target_os = "linux"))]
fn request_unbuffered_open(_options: &mut OpenOptions) {}

#[cfg(target_os = "macos")]
fn bypass_page_cache(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let rc = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_NOCACHE, 1) };
    if rc == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn bypass_page_cache(_file: &File) -> io::Result<()> {
    Ok(())
}

impl SyncVectoredDevice for FileDevice {
    #[cfg(unix)]
    fn readv_at(&self, offset: u64, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        use std::os::unix::io::AsRawFd;

        if bufs.is_empty() {
            return Ok(0);
        }

        // IoSliceMut is layout-compatible with iovec on unix
        let n = unsafe {
            libc::preadv(
                self.file.as_raw_fd(),
                bufs.as_mut_ptr() as *mut libc::iovec,
                bufs.len() as libc::c_int,
                offset as libc::off_t,
            )
        };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }

    #[cfg(windows)]
    fn readv_at(&self, offset: u64, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
        use std::os::windows::fs::FileExt;

        let mut total = 0usize;
        let mut pos = offset;
        for buf in bufs.iter_mut() {
            let n = self.file.seek_read(buf, pos)?;
            total += n;
            pos += n as u64;
            if n < buf.len() {
                break;
            }
        }
        Ok(total)
    }

    #[cfg(unix)]
    fn writev_at(&self, offset: u64, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        use std::os::unix::io::AsRawFd;

        if bufs.is_empty() {
            return Ok(0);
        }

        let n = unsafe {
            libc::pwritev(
                self.file.as_raw_fd(),
                bufs.as_ptr() as *const libc::iovec,
                bufs.len() as libc::c_int,
                offset as libc::off_t,
            )
        };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }

    #[cfg(windows)]
    fn writev_at(&self, offset: u64, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
        use std::os::windows::fs::FileExt;

        let mut total = 0usize;
        let mut pos = offset;
        for buf in bufs.iter() {
            let n = self.file.seek_write(buf, pos)?;
            total += n;
            pos += n as u64;
            if n < buf.len() {
                break;
            }
        }
        Ok(total)
    }

    fn flush(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn truncate(&self, size: u64) -> io::Result<()> {
        self.file.set_len(size)
    }

    fn size(&self) -> io::Result<u64> {
        self.file.metadata().map(|m| m.len())
    }

    fn alignment(&self) -> usize {
        self.alignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_single_buffer_round_trip() {
        let dir = tempdir().unwrap();
        let dev = FileDevice::open(dir.path().join("single.dat"), true, false).unwrap();

        let data = b"Hello, World!";
        let written = dev.writev_at(0, &[IoSlice::new(data)]).unwrap();
        assert_eq!(written, data.len());

        let mut buf = vec![0u8; data.len()];
        let read = dev.readv_at(0, &mut [IoSliceMut::new(&mut buf)]).unwrap();
        assert_eq!(read, data.len());
        assert_eq!(&buf, data);
    }

    #[test]
    fn test_vectored_round_trip() {
        let dir = tempdir().unwrap();
        let dev = FileDevice::open(dir.path().join("vec.dat"), true, false).unwrap();

        let head = [0xAAu8; 64];
        let body = [0xBBu8; 256];
        let n = dev
            .writev_at(0, &[IoSlice::new(&head), IoSlice::new(&body)])
            .unwrap();
        assert_eq!(n, 320);

        let mut r_head = [0u8; 64];
        let mut r_body = [0u8; 256];
        let n = dev
            .readv_at(
                0,
                &mut [IoSliceMut::new(&mut r_head), IoSliceMut::new(&mut r_body)],
            )
            .unwrap();
        assert_eq!(n, 320);
        assert_eq!(r_head, head);
        assert_eq!(r_body, body);
    }

    #[test]
    fn test_read_past_eof_returns_zero() {
        let dir = tempdir().unwrap();
        let dev = FileDevice::open(dir.path().join("eof.dat"), true, false).unwrap();

        dev.writev_at(0, &[IoSlice::new(&[1u8; 100])]).unwrap();

        let mut buf = [0u8; 32];
        let n = dev.readv_at(100, &mut [IoSliceMut::new(&mut buf)]).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_positional_calls_do_not_share_a_cursor() {
        let dir = tempdir().unwrap();
        let dev = FileDevice::open(dir.path().join("pos.dat"), true, false).unwrap();

        dev.writev_at(0, &[IoSlice::new(b"AAAA____BBBB")]).unwrap();
        dev.writev_at(4, &[IoSlice::new(b"XXXX")]).unwrap();

        let mut buf = [0u8; 12];
        dev.readv_at(0, &mut [IoSliceMut::new(&mut buf)]).unwrap();
        assert_eq!(&buf, b"AAAAXXXXBBBB");
    }

    #[test]
    fn test_size_and_truncate() {
        let dir = tempdir().unwrap();
        let dev = FileDevice::open(dir.path().join("size.dat"), true, false).unwrap();

        dev.writev_at(0, &[IoSlice::new(&[7u8; 4096])]).unwrap();
        assert_eq!(dev.size().unwrap(), 4096);

        dev.truncate(1024).unwrap();
        assert_eq!(dev.size().unwrap(), 1024);
    }

    #[test]
    fn test_buffered_handle_reports_no_constraint() {
        let dir = tempdir().unwrap();
        let dev = FileDevice::open(dir.path().join("align.dat"), true, false).unwrap();
        assert_eq!(dev.alignment(), 1);
        assert_eq!(dev.with_alignment(512).alignment(), 512);
    }
}
