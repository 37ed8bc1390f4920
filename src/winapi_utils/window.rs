//! Foreground window bindings.

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
};

/// Gets the window that currently has keyboard focus.
///
/// Returns `None` when no window has focus (desktop, lock screen, or a
/// window in the middle of losing activation).
///
/// # Example
/// ```no_run
/// use memtools::winapi_utils::get_foreground_window;
///
/// match get_foreground_window() {
///     Some(hwnd) => println!("focused: {:?}", hwnd),
///     None => println!("nothing has focus"),
/// }
/// ```
pub fn get_foreground_window() -> Option<HWND> {
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.0.is_null() {
        None
    } else {
        Some(hwnd)
    }
}

/// Gets the ids of the thread and process that created a window.
///
/// # Arguments
/// * `hwnd` - Handle to the window
///
/// # Returns
/// A tuple of `(thread_id, process_id)`, both 0 if the window is invalid.
///
/// # Example
/// ```no_run
/// use memtools::winapi_utils::{get_foreground_window, get_window_thread_process_id};
///
/// if let Some(hwnd) = get_foreground_window() {
///     let (_, pid) = get_window_thread_process_id(hwnd);
///     println!("foreground process: {}", pid);
/// }
/// ```
pub fn get_window_thread_process_id(hwnd: HWND) -> (u32, u32) {
    let mut process_id: u32 = 0;
    let thread_id = unsafe { GetWindowThreadProcessId(hwnd, Some(&mut process_id)) };
    (thread_id, process_id)
}

/// Gets the title of a window, or an empty string if it has none.
///
/// Used by the `foreground` command to label the window it reports.
/// Invalid UTF-16 in the title is replaced rather than rejected.
pub fn get_window_text(hwnd: HWND) -> String {
    // Length excludes the terminating NUL
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }

    let mut buffer: Vec<u16> = vec![0; (len + 1) as usize];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buffer) };
    if copied <= 0 {
        return String::new();
    }

    String::from_utf16_lossy(&buffer[..copied as usize])
}
