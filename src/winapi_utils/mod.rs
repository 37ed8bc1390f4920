//! Safe wrappers around the Windows API calls this crate needs.
//!
//! This is the only module that touches raw handles, raw structures and
//! `unsafe`. Callers above it see plain integers, `Option`s and `io::Result`s.

pub mod input;
pub mod memory;
pub mod process;
pub mod window;

pub use input::*;
pub use memory::*;
pub use process::*;
pub use window::*;

use std::io;

/// Converts a `windows` crate error into an `io::Error` carrying the
/// original Win32 code.
///
/// Win32 failures arrive wrapped as `HRESULT_FROM_WIN32` (`0x8007xxxx`);
/// the low word is the code `GetLastError` returned.
pub(crate) fn to_io_error(error: windows::core::Error) -> io::Error {
    let hresult = error.code().0 as u32;
    if hresult & 0xFFFF_0000 == 0x8007_0000 {
        io::Error::from_raw_os_error((hresult & 0xFFFF) as i32)
    } else {
        io::Error::from_raw_os_error(hresult as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows::core::HRESULT;
    use windows::Win32::Foundation::E_FAIL;

    #[test]
    fn test_win32_code_is_unwrapped() {
        // HRESULT_FROM_WIN32(ERROR_ACCESS_DENIED)
        let error = windows::core::Error::from(HRESULT(0x8007_0005_u32 as i32));
        assert_eq!(to_io_error(error).raw_os_error(), Some(5));
    }

    #[test]
    fn test_other_hresult_is_kept() {
        let error = windows::core::Error::from(E_FAIL);
        assert_eq!(to_io_error(error).raw_os_error(), Some(E_FAIL.0));
    }
}
