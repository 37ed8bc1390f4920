//! Error type shared by every native operation.

use std::io;
use thiserror::Error;

/// Failure of a native call.
///
/// The native error code is never translated: [`Error::Native`] carries the
/// thread's last-error value exactly as the OS reported it, reachable through
/// [`io::Error::raw_os_error`].
#[derive(Debug, Error)]
pub enum Error {
    /// A call that sets the thread's last error returned failure.
    #[error("{call} failed: {source}")]
    Native {
        call: &'static str,
        #[source]
        source: io::Error,
    },

    /// A call that reports failure without setting a last error.
    #[error("{call} reported failure")]
    QueryFailed { call: &'static str },

    /// A process could not be opened by id.
    #[error("cannot open process {pid}: {source}")]
    OpenProcess {
        pid: u32,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// The raw OS error code, when the failure carries one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Native { source, .. } | Self::OpenProcess { source, .. } => source.raw_os_error(),
            Self::QueryFailed { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
