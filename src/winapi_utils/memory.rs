//! Working-set size bindings.
//!
//! Provides safe wrappers around `SetProcessWorkingSetSizeEx` and
//! `GetProcessWorkingSetSizeEx`. Sizes are exchanged in bytes and the quota
//! flags are handed to the OS without interpretation.

use super::to_io_error;
use std::io;
use windows::Win32::Foundation::HANDLE;
use windows::Win32::System::Memory::{
    GetProcessWorkingSetSizeEx, SetProcessWorkingSetSizeEx, SETPROCESSWORKINGSETSIZEEX_FLAGS,
};

/// Sets the minimum and maximum working-set size of a process.
///
/// On failure the OS error code is returned unchanged, reachable through
/// [`io::Error::raw_os_error`].
///
/// # Arguments
/// * `process` - Handle with `PROCESS_SET_QUOTA` access
/// * `minimum` - Minimum working-set size in bytes
/// * `maximum` - Maximum working-set size in bytes
/// * `flags` - Raw `QUOTA_LIMITS_*` bits
///
/// # Example
/// ```no_run
/// use memtools::winapi_utils::{current_process, set_process_working_set_size};
///
/// // usize::MAX for both sizes pages out as much as possible
/// set_process_working_set_size(current_process(), usize::MAX, usize::MAX, 0)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn set_process_working_set_size(
    process: HANDLE,
    minimum: usize,
    maximum: usize,
    flags: u32,
) -> io::Result<()> {
    let result = unsafe {
        SetProcessWorkingSetSizeEx(
            process,
            minimum,
            maximum,
            SETPROCESSWORKINGSETSIZEEX_FLAGS(flags),
        )
    };
    result.map_err(to_io_error)
}

/// Reads the working-set limits and quota flags of a process.
///
/// # Arguments
/// * `process` - Handle with `PROCESS_QUERY_INFORMATION` or
///   `PROCESS_QUERY_LIMITED_INFORMATION` access
///
/// # Returns
/// A tuple of `(minimum, maximum, flags)`.
///
/// # Example
/// ```no_run
/// use memtools::winapi_utils::{current_process, get_process_working_set_size};
///
/// let (min, max, flags) = get_process_working_set_size(current_process())?;
/// println!("{}..{} bytes, flags {:#x}", min, max, flags);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn get_process_working_set_size(process: HANDLE) -> io::Result<(usize, usize, u32)> {
    let mut minimum: usize = 0;
    let mut maximum: usize = 0;
    let mut flags: u32 = 0;

    let ok = unsafe {
        GetProcessWorkingSetSizeEx(process, &mut minimum, &mut maximum, &mut flags)
    };
    if ok.as_bool() {
        Ok((minimum, maximum, flags))
    } else {
        // Read right away, before anything else can overwrite it.
        Err(io::Error::last_os_error())
    }
}
