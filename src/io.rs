use std::io::{Error, ErrorKind, Read, Write};

use super::{BufferedAdapter, ChainLink, LinkError, Process};

/// Pull-only link reading from a `Read` implementation
///
/// Calls are retried on `ErrorKind::Interrupted`, but all other
/// errors are passed back as [`LinkError::Io`].  EOF on the reader
/// (`Ok(0)`) is the end of the upstream data.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Wrap a reader
    #[inline]
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Get a reference to the reader
    #[inline]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap the reader
    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ChainLink for IoSource<R> {
    fn pull(&mut self, dest: &mut [u8]) -> Result<usize, LinkError> {
        loop {
            match self.inner.read(dest) {
                Err(ref e) if e.kind() == ErrorKind::Interrupted => (),
                Err(e) => return Err(e.into()),
                Ok(len) => return Ok(len),
            }
        }
    }
}

/// Push-only link writing to a `Write` implementation
///
/// Each push is written out in full with `write_all`, and a link
/// flush becomes a `flush` call on the writer, retried on
/// `ErrorKind::Interrupted`.
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    /// Wrap a writer
    #[inline]
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Get a reference to the writer
    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the writer
    #[inline]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ChainLink for IoSink<W> {
    fn push(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.inner.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LinkError> {
        loop {
            match self.inner.flush() {
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
                Ok(()) => return Ok(()),
            }
        }
    }
}

impl<C: Process> Read for BufferedAdapter<'_, C> {
    /// Pull-mode read.  `Ok(0)` is returned once all output has been
    /// delivered, or if there is no upstream link.  Adapter failures
    /// are wrapped as `ErrorKind::Other`.
    fn read(&mut self, dest: &mut [u8]) -> Result<usize, Error> {
        BufferedAdapter::read(self, dest).map_err(Error::other)
    }
}

impl<C: Process> Write for BufferedAdapter<'_, C> {
    /// Push-mode write.  All data is always accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Error> {
        BufferedAdapter::write(self, data).map_err(Error::other)?;
        Ok(data.len())
    }

    /// Runs the adapter's flush, i.e. processes the accumulated input
    /// and sends it downstream
    fn flush(&mut self) -> Result<(), Error> {
        BufferedAdapter::flush(self).map_err(Error::other)
    }
}
