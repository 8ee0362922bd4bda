//! Helper module with this crate's error type.
//!
//! Styling itself cannot fail. Escape sequences need to be written to their
//! streams, however, and that can fail just like any other I/O. Hence all
//! fallible operations return [`std::io::Result`], passing on the writer's
//! errors unchanged. The errors originating with this crate are the use of a
//! [`Stream`] that the registry never issued and a stream's writer calling
//! back into its own registry. Both seamlessly convert to I/O errors as well.

use crate::Stream;

/// A styling error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A stream that was not added to the registry it is being used with.
    #[error("{0} was not added to this registry")]
    UnknownStream(Stream),
    /// A stream's writer that writes through its own registry.
    #[error("registry is busy writing; a stream's writer must not use its own registry")]
    Reentrant,
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        let kind = match value {
            Error::UnknownStream(_) => std::io::ErrorKind::NotFound,
            Error::Reentrant => std::io::ErrorKind::Other,
        };
        Self::new(kind, value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_into_io_error() {
        let error: std::io::Error = Error::UnknownStream(Stream::Stdout).into();
        assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
        assert_eq!(format!("{}", error), "standard output was not added to this registry");
        assert!(error
            .get_ref()
            .and_then(|e| e.downcast_ref::<Error>())
            .is_some_and(|e| *e == Error::UnknownStream(Stream::Stdout)));

        let error: std::io::Error = Error::Reentrant.into();
        assert_eq!(error.kind(), std::io::ErrorKind::Other);
    }
}
