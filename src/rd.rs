use zeroize::Zeroize;

use super::adapter::{check_limit, Phase};
use super::{AdapterError, BufferedAdapter, ChainLink, Process, ScratchBuf, Status};

impl<'a, C: Process> BufferedAdapter<'a, C> {
    /// Read processed output into `dest`, returning the number of
    /// bytes written to the start of it.
    ///
    /// The first call pulls everything the upstream link has to
    /// offer, using `dest` as the scratch area for each pull, until
    /// the link reports `Ok(0)`.  The callback is then run once over
    /// all of that input.  The output is served across as many calls
    /// as it takes.  When the last of it has been returned, the
    /// adapter reaches [`Status::Complete`] and the buffer is
    /// released.  Bytes handed out before then are wiped from the
    /// buffer as they go.
    ///
    /// The following returns are possible:
    ///
    /// - `Ok(len)` with `len > 0`: Some output was read
    /// - `Ok(0)` with [`BufferedAdapter::is_done`] true: All output
    /// has been delivered
    /// - `Ok(0)` otherwise: `dest` was empty, or there is no upstream
    /// link so there is nothing to read
    /// - `Err(AdapterError::Misuse(_))`: Input written in push mode
    /// is waiting for [`BufferedAdapter::flush`].  Nothing is changed.
    /// - `Err(e)`: Pulling, processing or allocating failed.  The
    /// buffer is discarded and the adapter is poisoned.
    ///
    /// This call blocks for as long as the upstream link blocks.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize, AdapterError> {
        if dest.is_empty() || self.status == Status::Complete || self.prev.is_none() {
            return Ok(0);
        }
        if self.poisoned {
            return Err(AdapterError::Poisoned);
        }
        if self.holds(Phase::Accumulating) {
            return Err(AdapterError::Misuse("read while written input awaits flush"));
        }

        let result = self.read_inner(dest);
        if let Err(ref e) = result {
            self.fail(e);
        }
        result
    }

    fn read_inner(&mut self, dest: &mut [u8]) -> Result<usize, AdapterError> {
        let Some(prev) = self.prev.as_deref_mut() else {
            return Ok(0);
        };
        if self.buffer.is_none() {
            let buf = gather(prev, &mut self.callback, dest, self.limit)?;
            self.buffer = Some(buf);
            self.phase = Phase::Draining;
        }
        let Some(buf) = self.buffer.as_mut() else {
            return Ok(0);
        };

        if buf.len() > dest.len() {
            return Ok(buf.read_into(dest));
        }

        let len = buf.read_into(dest);
        self.status = Status::Complete;
        self.release_buffer();
        log::debug!("buffered transform: pull complete, final read of {} bytes", len);
        Ok(len)
    }
}

/// Pull everything from `prev` and run the callback over it.  `chunk`
/// is used as the landing area for each pull, and is wiped afterwards.
/// On failure the partly filled buffer is dropped, which wipes it.
fn gather<L, C>(
    prev: &mut L,
    callback: &mut C,
    chunk: &mut [u8],
    limit: Option<usize>,
) -> Result<ScratchBuf, AdapterError>
where
    L: ChainLink + ?Sized,
    C: Process,
{
    let mut buf = ScratchBuf::new();
    let pulled = pull_all(prev, chunk, &mut buf, limit);
    chunk.zeroize();
    pulled?;

    log::debug!("buffered transform: processing {} bytes of input", buf.len());
    let output = callback
        .process(buf.data())
        .map_err(AdapterError::Processing)?;
    log::debug!("buffered transform: produced {} bytes of output", output.len());
    buf.replace(output);
    Ok(buf)
}

fn pull_all<L: ChainLink + ?Sized>(
    prev: &mut L,
    chunk: &mut [u8],
    buf: &mut ScratchBuf,
    limit: Option<usize>,
) -> Result<(), AdapterError> {
    loop {
        let len = prev.pull(chunk).map_err(AdapterError::UpstreamRead)?;
        if len == 0 {
            return Ok(());
        }
        if len > chunk.len() {
            return Err(AdapterError::Misuse(
                "upstream link reported more bytes than requested",
            ));
        }
        check_limit(limit, buf.len(), len)?;
        buf.append(&chunk[..len])?;
        log::trace!("buffered transform: pulled {} bytes ({} held)", len, buf.len());
    }
}
