//! Aligned memory allocation

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

use crate::error::{DirectIoError, Result};

/// Check if a value is a power of two
#[inline]
pub const fn is_power_of_two(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// Check if a value is a multiple of the given power-of-two alignment
#[inline]
pub const fn is_aligned(value: usize, alignment: usize) -> bool {
    value & (alignment - 1) == 0
}

/// Round a size up to the next multiple of the alignment
#[inline]
pub const fn round_up_to_alignment(size: usize, alignment: usize) -> usize {
    (size + alignment - 1) & !(alignment - 1)
}

/// Platform page size, the default alignment for [`AlignedBuffer::allocate`]
pub fn page_size() -> usize {
    #[cfg(unix)]
    {
        // Always positive on a working libc
        let sz = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if sz > 0 {
            return sz as usize;
        }
    }
    4096
}

/// An owned memory region whose start address is a multiple of a required
/// alignment.
///
/// The usable view is exactly the requested length. Release is explicit and
/// idempotent via [`AlignedBuffer::dispose`]; `Drop` runs the same release,
/// so the backing allocation is freed exactly once on every exit path.
#[derive(Debug)]
pub struct AlignedBuffer {
    ptr: Option<NonNull<u8>>,
    size: usize,
    alignment: usize,
}

impl AlignedBuffer {
    /// Allocate a zeroed region of exactly `size` usable bytes starting at an
    /// address that is a multiple of `alignment`.
    ///
    /// Fails with [`DirectIoError::Allocation`] when `size` is zero,
    /// `alignment` is not a power of two, or the platform allocator fails.
    pub fn allocate(size: usize, alignment: usize) -> Result<Self> {
        if size == 0 || !is_power_of_two(alignment) {
            return Err(DirectIoError::Allocation { size, alignment });
        }

        let layout = Layout::from_size_align(size, alignment)
            .map_err(|_| DirectIoError::Allocation { size, alignment })?;
        let ptr = NonNull::new(unsafe { alloc_zeroed(layout) })
            .ok_or(DirectIoError::Allocation { size, alignment })?;

        Ok(Self {
            ptr: Some(ptr),
            size,
            alignment,
        })
    }

    /// Allocate with the platform page size as alignment
    pub fn allocate_page_aligned(size: usize) -> Result<Self> {
        Self::allocate(size, page_size())
    }

    /// Mutable view of the usable region
    ///
    /// # Panics
    /// Panics if the buffer has been disposed.
    pub fn view(&mut self) -> &mut [u8] {
        let ptr = self.ptr.expect("buffer already disposed");
        unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), self.size) }
    }

    /// Immutable view of the usable region
    ///
    /// # Panics
    /// Panics if the buffer has been disposed.
    pub fn as_slice(&self) -> &[u8] {
        let ptr = self.ptr.expect("buffer already disposed");
        unsafe { std::slice::from_raw_parts(ptr.as_ptr(), self.size) }
    }

    /// Usable length in bytes
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if the usable length is zero (never true for a live buffer)
    pub fn is_empty(&self) -> bool {
        self.size == 0 || self.ptr.is_none()
    }

    /// The alignment this buffer was allocated with
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Check whether the backing allocation is still live
    pub fn is_disposed(&self) -> bool {
        self.ptr.is_none()
    }

    /// Release the backing allocation. A second call is a no-op, never a
    /// failure.
    pub fn dispose(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            // Layout was validated at allocation time
            let layout = Layout::from_size_align(self.size, self.alignment).unwrap();
            unsafe { dealloc(ptr.as_ptr(), layout) };
        }
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        self.dispose();
    }
}

// Safety: AlignedBuffer owns its memory exclusively
unsafe impl Send for AlignedBuffer {}
unsafe impl Sync for AlignedBuffer {}
