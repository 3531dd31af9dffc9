//! Pool of equally sized aligned buffers
//!
//! Completion loops lease one buffer per round; returning buffers to the
//! pool on drop avoids a fresh aligned allocation for every call.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::buffer::AlignedBuffer;
use crate::error::Result;

struct PoolShared {
    idle: Mutex<Vec<AlignedBuffer>>,
    buffer_size: usize,
    alignment: usize,
    max_idle: usize,
}

impl PoolShared {
    fn give_back(&self, buffer: AlignedBuffer) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(buffer);
        }
        // Over the idle cap the buffer is simply dropped
    }
}

/// A buffer leased from a [`BufferPool`]; returns to the pool on drop.
pub struct LeasedBuffer {
    buffer: Option<AlignedBuffer>,
    pool: Weak<PoolShared>,
}

impl LeasedBuffer {
    /// Mutable view of the leased buffer
    pub fn view(&mut self) -> &mut [u8] {
        self.buffer.as_mut().expect("lease already returned").view()
    }

    /// Immutable view of the leased buffer
    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_ref().expect("lease already returned").as_slice()
    }

    /// Capacity of the leased buffer in bytes
    pub fn len(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.len())
    }

    /// Check if the lease holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for LeasedBuffer {
    fn drop(&mut self) {
        if let (Some(buffer), Some(pool)) = (self.buffer.take(), self.pool.upgrade()) {
            pool.give_back(buffer);
        }
    }
}

/// Pool of sector-aligned buffers of a single size.
///
/// Buffers are pre-allocated up front, leased out exclusively, and retained
/// up to an idle cap when returned. An exhausted pool allocates fresh
/// buffers on demand rather than blocking.
pub struct BufferPool {
    shared: Arc<PoolShared>,
}

impl BufferPool {
    /// Create a pool of `initial` buffers of `buffer_size` bytes each,
    /// aligned to `alignment`, retaining at most `max_idle` idle buffers.
    pub fn new(
        buffer_size: usize,
        alignment: usize,
        initial: usize,
        max_idle: usize,
    ) -> Result<Self> {
        let mut idle = Vec::with_capacity(initial);
        for _ in 0..initial {
            idle.push(AlignedBuffer::allocate(buffer_size, alignment)?);
        }

        Ok(Self {
            shared: Arc::new(PoolShared {
                idle: Mutex::new(idle),
                buffer_size,
                alignment,
                max_idle,
            }),
        })
    }

    /// Lease a buffer, allocating a fresh one if the pool is empty
    pub fn lease(&self) -> Result<LeasedBuffer> {
        let buffer = match self.shared.idle.lock().pop() {
            Some(buf) => buf,
            None => AlignedBuffer::allocate(self.shared.buffer_size, self.shared.alignment)?,
        };

        Ok(LeasedBuffer {
            buffer: Some(buffer),
            pool: Arc::downgrade(&self.shared),
        })
    }

    /// Number of idle buffers currently held
    pub fn idle(&self) -> usize {
        self.shared.idle.lock().len()
    }

    /// Size of each pooled buffer in bytes
    pub fn buffer_size(&self) -> usize {
        self.shared.buffer_size
    }

    /// Alignment of every pooled buffer
    pub fn alignment(&self) -> usize {
        self.shared.alignment
    }
}
