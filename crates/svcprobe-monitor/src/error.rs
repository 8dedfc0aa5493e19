//! Error types for probe attempts.

use std::io;
use std::time::Duration;

/// Result type alias for transport and handshake operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single probe attempt.
///
/// These never escape [`Monitor::poll`](crate::Monitor::poll); the attempt
/// loop folds them into a [`ServiceStatus`](crate::ServiceStatus).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connect, read or write did not finish before the deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The target actively refused the connection.
    #[error("connection refused")]
    ConnectionRefused,

    /// No route to the target. Retrying will not help.
    #[error("host unreachable: {0}")]
    HostUnreachable(String),

    /// The peer closed the connection where a reply was expected.
    #[error("connection closed by peer")]
    EndOfStream,

    /// Malformed or truncated reply.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Any other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Host name not usable for TLS server name indication.
    #[error("invalid server name: {0}")]
    InvalidServerName(String),
}

impl Error {
    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Classifies a low-level connect error.
    #[must_use]
    pub fn from_connect(err: io::Error, host: &str) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                Self::HostUnreachable(host.to_string())
            }
            _ => Self::Io(err),
        }
    }

    /// Returns true if this failure ends the probe without further attempts.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::HostUnreachable(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn connect_errors_are_classified() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert!(matches!(
            Error::from_connect(refused, "10.0.0.1"),
            Error::ConnectionRefused
        ));

        let unreachable = io::Error::from(io::ErrorKind::HostUnreachable);
        let err = Error::from_connect(unreachable, "10.0.0.1");
        assert!(matches!(err, Error::HostUnreachable(ref h) if h == "10.0.0.1"));
        assert!(err.is_fatal());

        let network = io::Error::from(io::ErrorKind::NetworkUnreachable);
        assert!(Error::from_connect(network, "10.0.0.1").is_fatal());

        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert!(matches!(Error::from_connect(reset, "h"), Error::Io(_)));
    }

    #[test]
    fn display() {
        assert_eq!(Error::ConnectionRefused.to_string(), "connection refused");
        assert_eq!(
            Error::protocol("bad code").to_string(),
            "protocol error: bad code"
        );
        assert_eq!(
            Error::Timeout(Duration::from_millis(1500)).to_string(),
            "timed out after 1.5s"
        );
    }
}
