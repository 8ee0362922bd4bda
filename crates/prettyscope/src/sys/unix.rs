use crate::Stream;

/// Determine whether the given standard stream is a terminal.
///
/// Streams other than standard output and standard error are never
/// considered terminals.
pub(crate) fn is_terminal(stream: Stream) -> bool {
    let fd = match stream {
        Stream::Stdout => libc::STDOUT_FILENO,
        Stream::Stderr => libc::STDERR_FILENO,
        Stream::Other(_) => return false,
    };

    // SAFETY: isatty() only inspects the file descriptor and fails cleanly
    // for closed descriptors.
    unsafe { libc::isatty(fd) == 1 }
}
