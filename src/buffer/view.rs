//! Direction-tagged buffer views and ordered scatter/gather lists

use std::io::{IoSlice, IoSliceMut};

/// A byte range participating in one scatter/gather operation.
///
/// `Read` views are mutable ranges to be filled from the file; `Write` views
/// are read-only ranges to be transmitted. The tag lets one list type serve
/// both directions while the borrow checker enforces the mutability
/// distinction. A view must be referenced by at most one in-flight operation;
/// for safe callers Rust's borrow rules enforce exactly that.
pub enum IoVec<'a> {
    /// Mutable range, filled by a read
    Read(&'a mut [u8]),
    /// Read-only range, consumed by a write
    Write(&'a [u8]),
}

impl IoVec<'_> {
    /// Length of the underlying range in bytes
    pub fn len(&self) -> usize {
        match self {
            IoVec::Read(b) => b.len(),
            IoVec::Write(b) => b.len(),
        }
    }

    /// Check if the range is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if this is a `Read` view
    pub fn is_read(&self) -> bool {
        matches!(self, IoVec::Read(_))
    }

    /// Start address of the underlying range
    pub fn addr(&self) -> usize {
        match self {
            IoVec::Read(b) => b.as_ptr() as usize,
            IoVec::Write(b) => b.as_ptr() as usize,
        }
    }
}

/// Ordered sequence of buffer views for one scatter/gather operation.
///
/// List order defines the logical contiguous range: view `i` occupies the
/// bytes immediately before view `i + 1`, lowest file offset first.
pub struct BufferList<'a> {
    views: Vec<IoVec<'a>>,
}

impl<'a> BufferList<'a> {
    /// Create a list from views in file-offset order
    pub fn new(views: Vec<IoVec<'a>>) -> Self {
        Self { views }
    }

    /// An empty list; submitting it transfers zero bytes without touching
    /// the underlying primitive
    pub fn empty() -> Self {
        Self { views: Vec::new() }
    }

    /// Number of views in the list
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Check if the list holds no views
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Sum of all view lengths; an operation on this list transfers at most
    /// this many bytes
    pub fn total_len(&self) -> usize {
        self.views.iter().map(IoVec::len).sum()
    }

    /// Iterate over the views in order
    pub fn iter(&self) -> std::slice::Iter<'_, IoVec<'a>> {
        self.views.iter()
    }

    /// Attribute a transferred byte count to the views in list order.
    ///
    /// View `i` absorbs `min(remaining, len_i)` bytes before any spill-over
    /// into view `i + 1`. This holds for reads (bytes filled) and writes
    /// (bytes consumed) alike, independent of whether the device issued one
    /// combined native call or one call per view.
    pub fn attribute(&self, transferred: usize) -> Vec<usize> {
        let mut remaining = transferred;
        self.views
            .iter()
            .map(|v| {
                let take = remaining.min(v.len());
                remaining -= take;
                take
            })
            .collect()
    }

    /// Borrow every view as a mutable I/O slice; `None` if any view is a
    /// `Write` view and the list cannot back a scatter read.
    pub(crate) fn read_slices(&mut self) -> Option<Vec<IoSliceMut<'_>>> {
        self.views
            .iter_mut()
            .map(|v| match v {
                IoVec::Read(b) => Some(IoSliceMut::new(&mut **b)),
                IoVec::Write(_) => None,
            })
            .collect()
    }

    /// Borrow every view as an immutable I/O slice; `None` if any view is a
    /// `Read` view and the list cannot back a gather write.
    pub(crate) fn write_slices(&self) -> Option<Vec<IoSlice<'_>>> {
        self.views
            .iter()
            .map(|v| match v {
                IoVec::Write(b) => Some(IoSlice::new(b)),
                IoVec::Read(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_len() {
        let a = [0u8; 100];
        let b = [0u8; 28];
        let list = BufferList::new(vec![IoVec::Write(&a), IoVec::Write(&b)]);
        assert_eq!(list.total_len(), 128);
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_empty_list() {
        let list = BufferList::empty();
        assert!(list.is_empty());
        assert_eq!(list.total_len(), 0);
        assert!(list.attribute(0).is_empty());
    }

    #[test]
    fn test_attribute_fills_in_order() {
        let a = [0u8; 4096];
        let b = [0u8; 4096];
        let list = BufferList::new(vec![IoVec::Write(&a), IoVec::Write(&b)]);

        // Full transfer
        assert_eq!(list.attribute(8192), vec![4096, 4096]);
        // Spill-over into the second view
        assert_eq!(list.attribute(5000), vec![4096, 904]);
        // Short of the first view
        assert_eq!(list.attribute(1000), vec![1000, 0]);
        // Nothing transferred
        assert_eq!(list.attribute(0), vec![0, 0]);
    }

    #[test]
    fn test_read_slices_reject_write_views() {
        let mut a = [0u8; 16];
        let b = [0u8; 16];
        let mut mixed = BufferList::new(vec![IoVec::Read(&mut a), IoVec::Write(&b)]);
        assert!(mixed.read_slices().is_none());
    }

    #[test]
    fn test_write_slices_reject_read_views() {
        let mut a = [0u8; 16];
        let mixed = BufferList::new(vec![IoVec::Read(&mut a)]);
        assert!(mixed.write_slices().is_none());
    }

    #[test]
    fn test_slice_borrows_cover_all_views() {
        let mut a = [0u8; 8];
        let mut b = [0u8; 24];
        let mut list = BufferList::new(vec![IoVec::Read(&mut a), IoVec::Read(&mut b)]);
        let slices = list.read_slices().unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].len(), 8);
        assert_eq!(slices[1].len(), 24);
    }
}
