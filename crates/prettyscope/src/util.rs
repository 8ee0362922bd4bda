//! Utility module with an in-memory stream.

use std::cell::RefCell;
use std::io::{Result, Write};
use std::rc::Rc;

/// A shared, in-memory stream.
///
/// All clones of a capture write to the same buffer. That makes it possible
/// to hand one clone to a [`Registry`](crate::Registry) while keeping
/// another one around for inspecting the output.
///
/// # Example
///
/// ```
/// # use std::io::Write;
/// # use prettyscope::util::Capture;
/// let capture = Capture::new();
/// let mut writer = capture.clone();
/// write!(writer, "Hello!")?;
/// assert_eq!(capture.contents(), "Hello!");
/// assert_eq!(capture.take(), "Hello!");
/// assert_eq!(capture.contents(), "");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Capture {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl Capture {
    /// Create a new, empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the captured output so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }

    /// Get the captured output so far and clear the buffer.
    pub fn take(&self) -> String {
        let bytes = core::mem::take(&mut *self.buffer.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Determine whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
