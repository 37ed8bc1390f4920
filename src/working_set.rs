//! Working-set control.
//!
//! The working set is the part of a process's memory that the OS keeps
//! resident in RAM. These operations read and adjust its lower and upper
//! bounds. Values are exchanged in bytes, unvalidated: the OS decides which
//! combinations it accepts and may clamp what it stores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum and maximum working-set size, in bytes.
///
/// No relation between the two is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkingSetLimits {
    pub minimum: usize,
    pub maximum: usize,
}

impl WorkingSetLimits {
    /// Asks the OS to page out as much of the process as it can.
    pub const TRIM: Self = Self {
        minimum: usize::MAX,
        maximum: usize::MAX,
    };

    pub const fn new(minimum: usize, maximum: usize) -> Self {
        Self { minimum, maximum }
    }
}

/// Quota flags of `SetProcessWorkingSetSizeEx`.
///
/// Opaque: the bits are platform-defined and handed to the OS untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaFlags(u32);

impl QuotaFlags {
    pub const EMPTY: Self = Self(0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for QuotaFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Working-set state of a process as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSet {
    #[serde(flatten)]
    pub limits: WorkingSetLimits,
    pub flags: QuotaFlags,
}

#[cfg(windows)]
pub use native::*;

#[cfg(windows)]
mod native {
    use super::*;
    use crate::error::{Error, Result};
    use crate::winapi_utils::{get_process_working_set_size, set_process_working_set_size};
    use windows::Win32::Foundation::HANDLE;

    /// Sets the working-set limits of `process`.
    ///
    /// `process` is borrowed: it must stay open for the duration of the call
    /// and needs `PROCESS_SET_QUOTA` access. Failures carry the OS error code
    /// verbatim and are never retried.
    ///
    /// # Example
    /// ```no_run
    /// use memtools::winapi_utils::current_process;
    /// use memtools::working_set::{set_working_set_limits, QuotaFlags, WorkingSetLimits};
    ///
    /// let limits = WorkingSetLimits::new(1 << 20, 64 << 20);
    /// set_working_set_limits(current_process(), limits, QuotaFlags::EMPTY)?;
    /// # Ok::<(), memtools::Error>(())
    /// ```
    pub fn set_working_set_limits(
        process: HANDLE,
        limits: WorkingSetLimits,
        flags: QuotaFlags,
    ) -> Result<()> {
        set_process_working_set_size(process, limits.minimum, limits.maximum, flags.bits())
            .map_err(|source| {
                tracing::warn!(
                    minimum = limits.minimum,
                    maximum = limits.maximum,
                    %flags,
                    error = %source,
                    "SetProcessWorkingSetSizeEx failed"
                );
                Error::Native {
                    call: "SetProcessWorkingSetSizeEx",
                    source,
                }
            })?;

        tracing::debug!(
            minimum = limits.minimum,
            maximum = limits.maximum,
            %flags,
            "Working set limits applied"
        );
        Ok(())
    }

    /// Reads the working-set limits and quota flags of `process`.
    ///
    /// `process` needs `PROCESS_QUERY_INFORMATION` or
    /// `PROCESS_QUERY_LIMITED_INFORMATION` access.
    pub fn get_working_set_limits(process: HANDLE) -> Result<WorkingSet> {
        let (minimum, maximum, flags) =
            get_process_working_set_size(process).map_err(|source| Error::Native {
                call: "GetProcessWorkingSetSizeEx",
                source,
            })?;

        Ok(WorkingSet {
            limits: WorkingSetLimits { minimum, maximum },
            flags: QuotaFlags(flags),
        })
    }

    /// Removes as many pages as possible from the working set of `process`.
    pub fn trim_working_set(process: HANDLE) -> Result<()> {
        set_working_set_limits(process, WorkingSetLimits::TRIM, QuotaFlags::EMPTY)
    }
}
