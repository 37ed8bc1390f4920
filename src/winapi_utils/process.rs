//! Process handle wrappers.

use super::to_io_error;
use crate::error::{Error, Result};
use std::io;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Threading::{
    GetCurrentProcess, OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_SET_QUOTA,
};

/// RAII wrapper for a process handle opened by id.
///
/// Opened with the rights the working-set calls need
/// (`PROCESS_QUERY_INFORMATION | PROCESS_SET_QUOTA`) and closed when dropped.
#[derive(Debug)]
pub struct ProcessHandle {
    handle: HANDLE,
    pid: u32,
}

impl ProcessHandle {
    /// Opens a process for working-set queries and changes.
    ///
    /// Fails with [`Error::OpenProcess`] when access is denied or the process
    /// has exited.
    ///
    /// # Arguments
    /// * `pid` - Process ID
    ///
    /// # Example
    /// ```no_run
    /// use memtools::winapi_utils::ProcessHandle;
    /// use memtools::working_set::get_working_set_limits;
    ///
    /// let handle = ProcessHandle::open(std::process::id())?;
    /// let ws = get_working_set_limits(handle.as_raw())?;
    /// println!("max {} bytes", ws.limits.maximum);
    /// # Ok::<(), memtools::Error>(())
    /// ```
    pub fn open(pid: u32) -> Result<Self> {
        let handle = unsafe {
            OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_SET_QUOTA, false, pid)
        };

        match handle {
            Ok(h) if !h.is_invalid() => {
                tracing::debug!(pid, "Process opened");
                Ok(Self { handle: h, pid })
            }
            Ok(_) => Err(Error::OpenProcess {
                pid,
                source: io::Error::last_os_error(),
            }),
            Err(e) => Err(Error::OpenProcess {
                pid,
                source: to_io_error(e),
            }),
        }
    }

    /// Returns the raw handle. It stays valid for as long as `self` lives.
    pub fn as_raw(&self) -> HANDLE {
        self.handle
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.handle) } {
            tracing::warn!(pid = self.pid, error = ?e, "Failed to close process handle");
        }
    }
}

/// Pseudo handle for the calling process.
///
/// Needs no closing and carries full access rights to the current process.
pub fn current_process() -> HANDLE {
    unsafe { GetCurrentProcess() }
}
