//! Last-input and tick-count bindings.

use std::mem::size_of;
use windows::Win32::System::SystemInformation::GetTickCount64;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};

/// Gets the tick count of the last system-wide keyboard or mouse event.
///
/// `LASTINPUTINFO` is an extensible structure: `cbSize` must hold the size
/// of the structure before the call or the OS rejects it.
///
/// Returns `None` when the call fails. `GetLastInputInfo` does not set a
/// last error, so there is nothing more to report.
///
/// # Example
/// ```no_run
/// use memtools::winapi_utils::{get_last_input_tick, get_tick_count};
///
/// if let Some(last) = get_last_input_tick() {
///     let idle_ms = (get_tick_count() as u32).wrapping_sub(last);
///     println!("idle for {}ms", idle_ms);
/// }
/// ```
pub fn get_last_input_tick() -> Option<u32> {
    let mut info = LASTINPUTINFO {
        cbSize: size_of::<LASTINPUTINFO>() as u32,
        dwTime: 0,
    };

    let ok = unsafe { GetLastInputInfo(&mut info) };
    ok.as_bool().then_some(info.dwTime)
}

/// Milliseconds since boot, from the 64-bit counter that does not wrap.
#[inline]
pub fn get_tick_count() -> u64 {
    unsafe { GetTickCount64() }
}
