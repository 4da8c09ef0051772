use alloc::vec::Vec;

use crate::LinkError;

/// Neighboring stage in a chain of transforms
///
/// A [`BufferedAdapter`] borrows its upstream neighbor to `pull` from
/// in pull mode, and its downstream neighbor to `push` and `flush` to
/// in push mode.  The neighbors are owned by whatever glue code built
/// the chain, never by the adapter.
///
/// A link only needs to implement the direction it supports.  The
/// default `pull` and `push` report [`LinkError::Unsupported`], and
/// the default `flush` has nothing to finalize.
///
/// [`BufferedAdapter`]: crate::BufferedAdapter
pub trait ChainLink {
    /// Pull up to `dest.len()` bytes into the start of `dest`,
    /// returning how many were written.  `Ok(0)` means that the link
    /// is exhausted, and the caller will stop pulling.
    fn pull(&mut self, dest: &mut [u8]) -> Result<usize, LinkError> {
        let _ = dest;
        Err(LinkError::Unsupported("pull"))
    }

    /// Accept all of `data`, or fail.  There is no partial
    /// acceptance.
    fn push(&mut self, data: &[u8]) -> Result<(), LinkError> {
        let _ = data;
        Err(LinkError::Unsupported("push"))
    }

    /// Finalize the link.  Must be safe to call more than once.
    fn flush(&mut self) -> Result<(), LinkError> {
        Ok(())
    }
}

/// Pull-only link serving the contents of a byte slice
///
/// Each `pull` returns at most `chunk` bytes (if a chunk size was
/// set) and at most as many bytes as the caller has room for, then
/// `Ok(0)` once the slice is exhausted.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> SliceSource<'a> {
    /// Serve `data` in pieces as large as the caller requests
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            chunk: usize::MAX,
        }
    }

    /// Serve `data` in pieces of at most `chunk` bytes.  A `chunk` of
    /// zero is treated as one.
    #[inline]
    pub fn chunked(data: &'a [u8], chunk: usize) -> Self {
        Self {
            data,
            chunk: chunk.max(1),
        }
    }

    /// Get the data not yet pulled
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }
}

impl ChainLink for SliceSource<'_> {
    fn pull(&mut self, dest: &mut [u8]) -> Result<usize, LinkError> {
        let len = self.data.len().min(dest.len()).min(self.chunk);
        dest[..len].copy_from_slice(&self.data[..len]);
        self.data = &self.data[len..];
        Ok(len)
    }
}

/// Push-only link collecting everything pushed to it
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    /// All data pushed so far, in order
    pub data: Vec<u8>,
    /// Number of `push` calls received
    pub pushes: usize,
    /// Number of `flush` calls received
    pub flushes: usize,
}

impl VecSink {
    /// Create a new empty sink
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChainLink for VecSink {
    fn push(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.data.extend_from_slice(data);
        self.pushes += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        self.flushes += 1;
        Ok(())
    }
}
