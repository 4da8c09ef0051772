//! Buffering adapter for single-shot transforms in a byte-stream chain
//!
//! Some transforms in a chain of byte-stream stages can't work
//! incrementally.  A whole-message digest, a public-key operation or
//! a signature canonicalization step needs the complete input before
//! it can produce anything.  [`BufferedAdapter`] lets such a
//! transform take part in a streaming chain anyway.  It accumulates
//! all the bytes that flow through it, runs the transform's
//! [`Process`] implementation exactly once over them, and then
//! passes the result on to its neighbor.
//!
//! The transform itself only has to provide a function from the
//! complete input to the complete output.  Everything to do with
//! streaming, flow control and completion is handled here.
//!
//!
//! # Pull mode and push mode
//!
//! The neighbors of the adapter are [`ChainLink`] references, which
//! are borrowed from the glue code that built the chain.  The adapter
//! never owns them.  Which of them is used depends on the direction
//! data is moving:
//!
//! - In pull mode, the stage downstream calls
//! [`BufferedAdapter::read`].  On the first call, the adapter pulls
//! from its upstream link until that link reports it is exhausted,
//! processes all of that in one go, and then serves the output back
//! to the caller across as many `read` calls as it takes.  A final
//! `Ok(0)` together with [`BufferedAdapter::is_done`] signals the end.
//!
//! - In push mode, the stage upstream calls
//! [`BufferedAdapter::write`] as many times as it likes.  Nothing is
//! processed until [`BufferedAdapter::flush`], which runs the
//! transform, pushes the whole output to the downstream link in a
//! single call, and then flushes that link so that stages further
//! down also finalize.
//!
//! Both links may be connected, but a single adapter only ever runs
//! in one of the modes.  Calling `read` while written input is waiting
//! for `flush`, or `write` or `flush` while pulled output is waiting
//! to be read, fails with [`AdapterError::Misuse`] and leaves the
//! adapter untouched.
//!
//! Missing links are not errors.  With no upstream link `read` has
//! nothing to read and returns `Ok(0)`, and with no downstream link
//! `write` and `flush` have nowhere to deliver to and do nothing.
//!
//! Since [`BufferedAdapter`] is itself a [`ChainLink`], adapters may
//! be chained to each other directly.  [`SliceSource`] and
//! [`VecSink`] are simple links for the ends of a chain, and with the
//! "std" feature `IoSource` and `IoSink` connect a chain to `Read`
//! and `Write` implementations.
//!
//!
//! # Completion and failure
//!
//! The adapter has two states, [`Status::Pending`] and
//! [`Status::Complete`].  It becomes complete when the last of the
//! output has been read out (pull mode) or pushed downstream (push
//! mode).  From then on `read`, `write` and `flush` succeed without
//! doing anything.  The processing callback runs at most once in the
//! lifetime of an adapter.
//!
//! Any failure is reported straight back to the caller and nothing is
//! retried.  The chain that owns the adapter is expected to treat an
//! error as fatal and unwind.  To make sure stale partial data can
//! never be processed, on failure the adapter wipes and discards its
//! buffer and refuses further work with [`AdapterError::Poisoned`].
//! The one exception is a failure of the final downstream flush: by
//! then the adapter has already completed, so it stays complete.
//!
//!
//! # Data hygiene
//!
//! The buffered data may be plaintext or key material, so it is wiped
//! as soon as it has served its purpose.  Output handed out by a
//! partial `read` is zeroed in the buffer immediately, the
//! accumulated input is zeroed once the transform has produced its
//! output, and the whole buffer is zeroed when it is released, when
//! the adapter is destroyed or dropped, and when it has to be moved to
//! a larger allocation.  The caller's `read` buffer is also used as
//! the landing area for upstream pulls, and it is zeroed before the
//! output is copied into it.  See [`ScratchBuf`].
//!
//!
//! # Capacity limit
//!
//! By construction the adapter holds the entire input in memory.  If
//! the upstream stage could produce an unbounded amount of data, set
//! a limit with [`BufferedAdapter::with_capacity_limit`].  Input
//! beyond that fails with [`AdapterError::CapacityExceeded`].
//!
//!
//! # Concurrency
//!
//! All calls are ordinary blocking calls.  There is no internal
//! locking, and `&mut self` on every operation means the borrow
//! checker already rules out concurrent use of one adapter.  Calls
//! block for as long as the neighbor links block.  Timeouts and
//! cancellation are the business of the links.
//!
//!
//! # `no_std` support
//!
//! The "std" feature is enabled by default.  Without it the crate is
//! `no_std`, but it always requires `alloc` since the buffer has to
//! grow to hold the whole input.  In your **Cargo.toml** add
//! `batchbuf = { version = "...", default-features = false }`.
//!
//!
//! # Logging
//!
//! Progress and failures are logged through the `log` facade, at
//! `trace` for each chunk, `debug` for processing and completion, and
//! `warn` when data is discarded after a failure.  Buffer contents are
//! never logged.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
pub use error::{AdapterError, LinkError, ProcessError};

mod buf;
pub use buf::ScratchBuf;

mod link;
pub use link::{ChainLink, SliceSource, VecSink};

mod process;
pub use process::{Discard, Process};

mod adapter;
pub use adapter::{BufferedAdapter, Status};

mod rd;

mod wr;

#[cfg(feature = "std")]
mod io;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub use io::{IoSink, IoSource};
