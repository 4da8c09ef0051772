use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

/// Failure of a [`BufferedAdapter`](crate::BufferedAdapter)
/// operation
///
/// None of these are retried internally.  The chain that owns the
/// adapter should treat any of them as fatal for the whole chain.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A neighbor broke the [`ChainLink`](crate::ChainLink)
    /// contract, for example by reporting more bytes from `pull` than
    /// it was given room for
    #[error("chain misuse: {0}")]
    Misuse(&'static str),

    /// The upstream link failed while input was being gathered
    #[error("upstream read failed")]
    UpstreamRead(#[source] LinkError),

    /// The processing callback failed
    #[error("processing failed")]
    Processing(#[source] ProcessError),

    /// The downstream link refused the processed output
    #[error("downstream write failed")]
    DownstreamWrite(#[source] LinkError),

    /// The downstream link failed to flush.  The adapter itself has
    /// already completed when this is returned.
    #[error("downstream flush failed")]
    DownstreamFlush(#[source] LinkError),

    /// The scratch buffer could not be grown
    #[error("failed to allocate buffer space")]
    Allocation,

    /// Holding the data would exceed the configured capacity limit
    #[error("buffered data would exceed the capacity limit of {limit} bytes")]
    CapacityExceeded { limit: usize },

    /// An earlier operation on this adapter failed and its buffered
    /// data was discarded
    #[error("adapter is unusable after an earlier failure")]
    Poisoned,
}

impl From<alloc::collections::TryReserveError> for AdapterError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        AdapterError::Allocation
    }
}

/// Failure reported by a [`ChainLink`](crate::ChainLink)
#[derive(Debug, Error)]
pub enum LinkError {
    /// The link does not offer this direction of flow
    #[error("link does not support {0}")]
    Unsupported(&'static str),

    /// A nested buffered stage failed
    #[error("buffered stage failed")]
    Stage(#[source] Box<AdapterError>),

    /// Underlying I/O failed
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Any other failure, described by the link
    #[error("{0}")]
    Other(String),
}

impl From<AdapterError> for LinkError {
    fn from(e: AdapterError) -> Self {
        LinkError::Stage(Box::new(e))
    }
}

/// Failure reported by a [`Process`](crate::Process) implementation
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The accumulated input is not acceptable to this transform
    #[error("input rejected: {0}")]
    Rejected(&'static str),

    /// The transform failed for some other reason
    #[error("{0}")]
    Failed(String),
}
