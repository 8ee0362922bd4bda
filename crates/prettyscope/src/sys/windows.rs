use std::ptr::from_mut;

use windows_sys::Win32::Foundation::INVALID_HANDLE_VALUE;
use windows_sys::Win32::System::Console::{self, CONSOLE_MODE as ConsoleMode};

use crate::Stream;

/// Determine whether the given standard stream is a console.
///
/// Streams other than standard output and standard error are never
/// considered consoles.
pub(crate) fn is_terminal(stream: Stream) -> bool {
    let which = match stream {
        Stream::Stdout => Console::STD_OUTPUT_HANDLE,
        Stream::Stderr => Console::STD_ERROR_HANDLE,
        Stream::Other(_) => return false,
    };

    // SAFETY: GetStdHandle() merely looks up the process's standard handle.
    let handle = unsafe { Console::GetStdHandle(which) };
    if handle.is_null() || handle == INVALID_HANDLE_VALUE {
        return false;
    }

    let mut mode: ConsoleMode = 0;
    // SAFETY: The handle is valid and mode points to a live local.
    unsafe { Console::GetConsoleMode(handle, from_mut(&mut mode)) != 0 }
}
