use alloc::vec::Vec;

use crate::ProcessError;

/// Single-shot whole-input transform
///
/// This is the part supplied by a concrete transform kind, for
/// example a whole-message digest or a public-key operation.  A
/// [`BufferedAdapter`] calls [`Process::process`] at most once in its
/// lifetime, with all of the input it accumulated, and then passes
/// on whatever is returned.
///
/// Any `FnMut(&[u8]) -> Result<Vec<u8>, ProcessError>` implements
/// this trait, so a plain function or closure may be used:
///
/// ```
/// # use batchbuf::{BufferedAdapter, ProcessError};
/// fn reverse(input: &[u8]) -> Result<Vec<u8>, ProcessError> {
///     Ok(input.iter().rev().copied().collect())
/// }
/// let adapter = BufferedAdapter::new(reverse);
/// # let _ = adapter;
/// ```
///
/// [`BufferedAdapter`]: crate::BufferedAdapter
pub trait Process {
    /// Transform the complete accumulated input into the complete
    /// output.  The input slice is wiped by the caller once this
    /// returns, so an implementation must copy anything it wants to
    /// keep.
    fn process(&mut self, input: &[u8]) -> Result<Vec<u8>, ProcessError>;
}

impl<F> Process for F
where
    F: FnMut(&[u8]) -> Result<Vec<u8>, ProcessError>,
{
    #[inline]
    fn process(&mut self, input: &[u8]) -> Result<Vec<u8>, ProcessError> {
        self(input)
    }
}

/// Transform that consumes its input and produces nothing
///
/// Used by [`BufferedAdapter::without_callback`]: a transform with no
/// processing step of its own swallows its input and outputs zero
/// bytes.
///
/// [`BufferedAdapter::without_callback`]: crate::BufferedAdapter::without_callback
#[derive(Copy, Clone, Debug, Default)]
pub struct Discard;

impl Process for Discard {
    #[inline]
    fn process(&mut self, _input: &[u8]) -> Result<Vec<u8>, ProcessError> {
        Ok(Vec::new())
    }
}
