use std::io;

use http::StatusCode;

/// An extension trait to decide whether a probe attempt ran into server-side
/// throttling and is worth repeating after a pause.
///
/// Some origins fail closed under load: instead of answering with 429 they
/// time out or reset the connection. Both shapes are classified here, based
/// on the error structure rather than on platform error messages.
pub(crate) trait RetryExt {
    fn is_throttling(&self) -> bool;
}

impl RetryExt for StatusCode {
    fn is_throttling(&self) -> bool {
        *self == StatusCode::TOO_MANY_REQUESTS
    }
}

impl RetryExt for reqwest::Error {
    fn is_throttling(&self) -> bool {
        if self.is_timeout() {
            return true;
        }
        match source_io_error(self) {
            Some(io_error) => is_transient_io(io_error),
            None => false,
        }
    }
}

/// Classifies an `io::Error` into transient (throttle-like) or not
fn is_transient_io(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted | io::ErrorKind::TimedOut
    )
}

/// Walks the source chain of `err` looking for an underlying `io::Error`
fn source_io_error(err: &dyn std::error::Error) -> Option<&io::Error> {
    let mut source = err.source();

    while let Some(err) = source {
        if let Some(io_error) = err.downcast_ref::<io::Error>() {
            return Some(io_error);
        }

        source = err.source();
    }
    None
}
