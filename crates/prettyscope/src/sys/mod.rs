//! Platform-specific terminal detection.
//!
//! Platforms without a suitable probe report no terminals, which disables
//! mirroring.

#[cfg(target_family = "unix")]
mod unix;
#[cfg(target_family = "windows")]
mod windows;

#[cfg(target_family = "unix")]
pub(crate) use self::unix::is_terminal;
#[cfg(target_family = "windows")]
pub(crate) use self::windows::is_terminal;

/// Determine whether the given standard stream is a terminal.
#[cfg(not(any(target_family = "unix", target_family = "windows")))]
pub(crate) fn is_terminal(_: crate::Stream) -> bool {
    false
}
