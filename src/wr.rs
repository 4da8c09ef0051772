use super::adapter::{check_limit, Phase};
use super::{AdapterError, BufferedAdapter, Process, ScratchBuf, Status};

impl<'a, C: Process> BufferedAdapter<'a, C> {
    /// Accept input in push mode.  The data is appended to the
    /// buffer and nothing else happens until
    /// [`BufferedAdapter::flush`].
    ///
    /// This is a successful no-op if `data` is empty, if the adapter
    /// has already completed, or if there is no downstream link to
    /// eventually deliver to.  Fails if the buffer cannot be grown or
    /// the capacity limit would be exceeded, in which case the
    /// buffer is discarded and the adapter is poisoned.  Fails with
    /// [`AdapterError::Misuse`], changing nothing, if processed
    /// output from pull mode is still waiting to be read.
    pub fn write(&mut self, data: &[u8]) -> Result<(), AdapterError> {
        if data.is_empty() || self.status == Status::Complete || self.next.is_none() {
            return Ok(());
        }
        if self.poisoned {
            return Err(AdapterError::Poisoned);
        }
        if self.holds(Phase::Draining) {
            return Err(AdapterError::Misuse("write while pulled output awaits read"));
        }

        let result = self.write_inner(data);
        if let Err(ref e) = result {
            self.fail(e);
        }
        result
    }

    fn write_inner(&mut self, data: &[u8]) -> Result<(), AdapterError> {
        let limit = self.limit;
        if self.buffer.is_none() {
            self.phase = Phase::Accumulating;
        }
        let buf = self.buffer.get_or_insert_with(ScratchBuf::new);
        check_limit(limit, buf.len(), data.len())?;
        buf.append(data)?;
        log::trace!("buffered transform: accepted {} bytes ({} held)", data.len(), buf.len());
        Ok(())
    }

    /// Finish push mode.  The callback is run once over everything
    /// written so far, the whole output is pushed to the downstream
    /// link in a single call, the adapter reaches
    /// [`Status::Complete`] and the buffer is released.  Finally the
    /// downstream link is flushed too.
    ///
    /// This is a successful no-op if the adapter has already
    /// completed, if there is no downstream link, or if nothing has
    /// been written.  If processing or the downstream push fails, the
    /// buffer is discarded and the adapter is poisoned.  If only the
    /// final downstream flush fails, the error is returned but the
    /// adapter stays complete.  While processed output from pull mode
    /// is still waiting to be read, this fails with
    /// [`AdapterError::Misuse`] and changes nothing.
    pub fn flush(&mut self) -> Result<(), AdapterError> {
        if self.status == Status::Complete || self.next.is_none() {
            return Ok(());
        }
        if self.poisoned {
            return Err(AdapterError::Poisoned);
        }
        if self.holds(Phase::Draining) {
            return Err(AdapterError::Misuse("flush while pulled output awaits read"));
        }
        if self.buffer.as_ref().map_or(true, ScratchBuf::is_empty) {
            return Ok(());
        }

        let result = self.flush_inner();
        if let Err(ref e) = result {
            self.fail(e);
        }
        result
    }

    fn flush_inner(&mut self) -> Result<(), AdapterError> {
        let Some(next) = self.next.as_deref_mut() else {
            return Ok(());
        };
        let Some(mut buf) = self.buffer.take() else {
            return Ok(());
        };

        log::debug!("buffered transform: processing {} bytes of input", buf.len());
        let output = self
            .callback
            .process(buf.data())
            .map_err(AdapterError::Processing)?;
        buf.replace(output);

        next.push(buf.data()).map_err(AdapterError::DownstreamWrite)?;
        self.status = Status::Complete;
        log::debug!("buffered transform: push complete, sent {} bytes", buf.len());
        buf.release();

        next.flush().map_err(AdapterError::DownstreamFlush)
    }
}
