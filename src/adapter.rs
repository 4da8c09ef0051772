use crate::{AdapterError, ChainLink, Discard, LinkError, Process, ScratchBuf};

/// Completion state of a [`BufferedAdapter`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Status {
    /// Processing has not yet run, or its output has not yet been
    /// fully delivered
    Pending,
    /// Processing has run and all of its output has been delivered,
    /// either read out in pull mode or pushed downstream in push
    /// mode.  This state is never left.
    Complete,
}

/// What the buffer currently holds
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Phase {
    /// Input written in push mode, not yet processed
    Accumulating,
    /// Processed output waiting to be read in pull mode
    Draining,
}

/// Buffering stage for a single-shot transform
///
/// Sits in a chain of byte-stream stages and turns streaming I/O
/// into exactly one call of a [`Process`] implementation over the
/// complete input.  It can be used in one of two ways:
///
/// - Pull mode: the stage downstream calls [`BufferedAdapter::read`].
/// On the first call, everything available is pulled from the
/// upstream link, processed, and then served back across as many
/// `read` calls as it takes.
///
/// - Push mode: the stage upstream calls [`BufferedAdapter::write`]
/// to hand over input, which is only accumulated.  Then
/// [`BufferedAdapter::flush`] processes it, pushes the whole result
/// to the downstream link in one go, and flushes that link.
///
/// The neighbor links are borrowed, not owned.  A missing upstream
/// link makes `read` a no-op, and a missing downstream link makes
/// `write` and `flush` no-ops.
///
/// Once [`Status::Complete`] is reached all further `read`, `write`
/// and `flush` calls do nothing and succeed.  If an operation fails
/// before that point, the buffered data is wiped and discarded and
/// the adapter is poisoned: further calls fail with
/// [`AdapterError::Poisoned`].  The callback is therefore never run
/// more than once, even if the caller retries.
///
/// An adapter may have both links connected, but one session uses
/// only one mode.  A `read` while written input is waiting for
/// `flush`, or a `write` or `flush` while processed output is waiting
/// to be read, fails with [`AdapterError::Misuse`] and changes
/// nothing.
///
/// ```
/// # use batchbuf::{BufferedAdapter, ProcessError, SliceSource};
/// fn upper(input: &[u8]) -> Result<Vec<u8>, ProcessError> {
///     Ok(input.to_ascii_uppercase())
/// }
/// let mut src = SliceSource::chunked(b"hello world", 3);
/// let mut adapter = BufferedAdapter::new(upper).with_prev(&mut src);
/// let mut out = [0; 8];
/// assert_eq!(8, adapter.read(&mut out)?);
/// assert_eq!(b"HELLO WO", &out);
/// assert_eq!(3, adapter.read(&mut out)?);
/// assert_eq!(b"RLD", &out[..3]);
/// assert_eq!(0, adapter.read(&mut out)?);
/// assert!(adapter.is_done());
/// # Ok::<(), batchbuf::AdapterError>(())
/// ```
pub struct BufferedAdapter<'a, C = Discard> {
    pub(crate) status: Status,
    pub(crate) poisoned: bool,
    pub(crate) buffer: Option<ScratchBuf>,
    pub(crate) phase: Phase,
    pub(crate) prev: Option<&'a mut (dyn ChainLink + 'a)>,
    pub(crate) next: Option<&'a mut (dyn ChainLink + 'a)>,
    pub(crate) callback: C,
    pub(crate) limit: Option<usize>,
}

impl<'a> BufferedAdapter<'a, Discard> {
    /// Create an adapter for a transform that has no processing step
    /// of its own.  It swallows all of its input and produces no
    /// output.
    #[inline]
    pub fn without_callback() -> Self {
        Self::new(Discard)
    }
}

impl<'a, C: Process> BufferedAdapter<'a, C> {
    /// Create a new unconnected adapter that will run `callback` over
    /// the accumulated input
    #[inline]
    pub fn new(callback: C) -> Self {
        Self {
            status: Status::Pending,
            poisoned: false,
            buffer: None,
            phase: Phase::Accumulating,
            prev: None,
            next: None,
            callback,
            limit: None,
        }
    }

    /// Connect the upstream link, for use in pull mode
    #[inline]
    pub fn with_prev(mut self, prev: &'a mut (dyn ChainLink + 'a)) -> Self {
        self.prev = Some(prev);
        self
    }

    /// Connect the downstream link, for use in push mode
    #[inline]
    pub fn with_next(mut self, next: &'a mut (dyn ChainLink + 'a)) -> Self {
        self.next = Some(next);
        self
    }

    /// Limit the number of bytes of input that may be held in the
    /// buffer.  Input beyond this fails with
    /// [`AdapterError::CapacityExceeded`].  This protects against
    /// memory exhaustion from an upstream stage that never ends.
    #[inline]
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Change or remove the upstream link
    #[inline]
    pub fn set_prev(&mut self, prev: Option<&'a mut (dyn ChainLink + 'a)>) {
        self.prev = prev;
    }

    /// Change or remove the downstream link
    #[inline]
    pub fn set_next(&mut self, next: Option<&'a mut (dyn ChainLink + 'a)>) {
        self.next = next;
    }

    /// Get the completion state
    #[inline(always)]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Test whether processing has run and all output was delivered
    #[inline(always)]
    pub fn is_done(&self) -> bool {
        self.status == Status::Complete
    }

    /// Test whether an earlier failure has made the adapter unusable
    #[inline(always)]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Test whether a buffer is currently allocated
    #[inline]
    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    /// Get the number of bytes currently held, either input waiting
    /// to be processed or output waiting to be read
    #[inline]
    pub fn buffered_len(&self) -> usize {
        self.buffer.as_ref().map_or(0, ScratchBuf::len)
    }

    /// Get a reference to the processing callback, e.g. to fetch
    /// state it recorded while processing
    #[inline]
    pub fn callback(&self) -> &C {
        &self.callback
    }

    /// Get a mutable reference to the processing callback
    #[inline]
    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    /// Destroy the adapter and recover the processing callback.  Any
    /// buffered data is wiped.
    #[inline]
    pub fn into_callback(mut self) -> C {
        self.release_buffer();
        self.callback
    }

    /// Tear down the adapter.  Any unprocessed or undelivered data is
    /// wiped and discarded.  The callback is not run, and nothing is
    /// passed on to the neighbors.
    #[inline]
    pub fn destroy(mut self) {
        self.release_buffer();
    }

    /// Test whether a buffer is held and is in the given phase
    #[inline]
    pub(crate) fn holds(&self, phase: Phase) -> bool {
        self.buffer.is_some() && self.phase == phase
    }

    pub(crate) fn release_buffer(&mut self) {
        if let Some(mut buf) = self.buffer.take() {
            buf.release();
        }
    }

    /// Record the failure of an operation.  Before completion this
    /// discards the buffer and poisons the adapter.  After
    /// completion (a failed downstream flush) nothing is rolled back.
    #[cold]
    pub(crate) fn fail(&mut self, err: &AdapterError) {
        if self.status == Status::Complete {
            log::warn!("buffered transform: failed after completion: {}", err);
            return;
        }
        log::warn!(
            "buffered transform: discarding {} buffered bytes after failure: {}",
            self.buffered_len(),
            err
        );
        self.release_buffer();
        self.poisoned = true;
    }
}

/// Check that `adding` more bytes on top of `held` stays within the
/// limit, if there is one
#[inline]
pub(crate) fn check_limit(
    limit: Option<usize>,
    held: usize,
    adding: usize,
) -> Result<(), AdapterError> {
    match limit {
        Some(limit) if held.saturating_add(adding) > limit => {
            Err(AdapterError::CapacityExceeded { limit })
        }
        _ => Ok(()),
    }
}

/// An adapter is itself a link, so adapters can be chained: `pull`
/// is [`BufferedAdapter::read`], `push` is [`BufferedAdapter::write`]
/// and `flush` is [`BufferedAdapter::flush`].
impl<C: Process> ChainLink for BufferedAdapter<'_, C> {
    fn pull(&mut self, dest: &mut [u8]) -> Result<usize, LinkError> {
        Ok(self.read(dest)?)
    }

    fn push(&mut self, data: &[u8]) -> Result<(), LinkError> {
        Ok(self.write(data)?)
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        Ok(BufferedAdapter::flush(self)?)
    }
}

impl<C> core::fmt::Debug for BufferedAdapter<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferedAdapter")
            .field("status", &self.status)
            .field("poisoned", &self.poisoned)
            .field("buffer", &self.buffer)
            .field("phase", &self.phase)
            .field("has_prev", &self.prev.is_some())
            .field("has_next", &self.next.is_some())
            .field("limit", &self.limit)
            .finish()
    }
}
