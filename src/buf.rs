use alloc::vec::Vec;

use zeroize::Zeroize;

use crate::AdapterError;

/// Owned scratch buffer for a [`BufferedAdapter`]
///
/// Holds first the accumulated input, and later the processed output
/// while it is being drained.  The internal `Vec` has two segments:
///
/// - Data already consumed, which has been zeroed and is waiting to
///   be discarded
///
/// - Data not yet consumed, as viewed by [`ScratchBuf::data`]
///
/// Bytes are wiped as soon as they are no longer needed: consumed
/// bytes on [`ScratchBuf::consume`], the old contents on
/// [`ScratchBuf::replace`], old allocations when the buffer grows,
/// and everything on [`ScratchBuf::release`] or drop.  The buffer may
/// hold plaintext or key material.
///
/// [`BufferedAdapter`]: crate::BufferedAdapter
pub struct ScratchBuf {
    pub(crate) data: Vec<u8>,
    pub(crate) rd: usize,
}

impl ScratchBuf {
    /// Create a new empty buffer.  Nothing is allocated until data
    /// is appended.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            rd: 0,
        }
    }

    /// Get the unconsumed contents of the buffer
    #[inline(always)]
    pub fn data(&self) -> &[u8] {
        &self.data[self.rd..]
    }

    /// Get the number of unconsumed bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len() - self.rd
    }

    /// Test whether there are no unconsumed bytes
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rd == self.data.len()
    }

    /// Append a slice of data to the end of the buffer.  Fails with
    /// [`AdapterError::Allocation`] if the buffer cannot be grown, in
    /// which case nothing is appended.
    pub fn append(&mut self, data: &[u8]) -> Result<(), AdapterError> {
        if self.is_empty() {
            self.data.clear();
            self.rd = 0;
        }
        if self.data.len() + data.len() > self.data.capacity() {
            self.make_space(data.len())?;
        }
        self.data.extend_from_slice(data);
        Ok(())
    }

    #[inline(never)]
    #[cold]
    fn make_space(&mut self, reserve: usize) -> Result<(), AdapterError> {
        // Consumed bytes are already zero, so dropping them needs no
        // wipe.  The tail left behind by moving data down does.
        if self.rd > 0 {
            let len = self.data.len();
            self.data.copy_within(self.rd..len, 0);
            let keep = len - self.rd;
            self.data[keep..].zeroize();
            self.data.truncate(keep);
            self.rd = 0;
        }

        let need = self.data.len() + reserve;
        if need > self.data.capacity() {
            // Grow into a fresh allocation so that the old one can be
            // wiped before it is freed
            let cap = need.max(self.data.capacity() * 2);
            let mut grown = Vec::new();
            grown.try_reserve_exact(cap)?;
            grown.extend_from_slice(&self.data);
            let mut old = core::mem::replace(&mut self.data, grown);
            old.zeroize();
        }
        Ok(())
    }

    /// Indicate that `len` bytes have been consumed from the start of
    /// the buffer.  The consumed bytes are zeroed immediately and are
    /// no longer visible through [`ScratchBuf::data`].
    ///
    /// # Panics
    ///
    /// Panics if `len` is greater than the number of bytes in the
    /// buffer
    #[inline]
    #[track_caller]
    pub fn consume(&mut self, len: usize) {
        let rd = self.rd + len;
        if rd > self.data.len() {
            panic_consume_overflow();
        }
        self.data[self.rd..rd].zeroize();
        self.rd = rd;
    }

    /// Copy as much data as will fit into `dest`, consume it and
    /// return the number of bytes copied
    #[inline]
    pub fn read_into(&mut self, dest: &mut [u8]) -> usize {
        let len = self.len().min(dest.len());
        dest[..len].copy_from_slice(&self.data[self.rd..self.rd + len]);
        self.consume(len);
        len
    }

    /// Replace the whole contents of the buffer with `data`.  The old
    /// contents are wiped first.
    #[inline]
    pub fn replace(&mut self, data: Vec<u8>) {
        self.data.zeroize();
        self.data = data;
        self.rd = 0;
    }

    /// Wipe the buffer and free its memory
    #[inline]
    pub fn release(&mut self) {
        self.data.zeroize();
        self.data = Vec::new();
        self.rd = 0;
    }
}

impl Default for ScratchBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScratchBuf {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl core::fmt::Debug for ScratchBuf {
    // Contents are never printed
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScratchBuf")
            .field("len", &self.len())
            .field("consumed", &self.rd)
            .finish()
    }
}

#[inline(never)]
#[cold]
#[track_caller]
fn panic_consume_overflow() -> ! {
    panic!("Illegal to consume more ScratchBuf bytes than are available");
}
