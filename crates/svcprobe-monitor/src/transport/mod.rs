//! Connection management and line transport.

mod line;
mod stream;

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};

pub use line::LineTransport;
pub use stream::{ProbeStream, TcpConnector};

use crate::error::Result;

/// Where to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Negotiate TLS right after connecting.
    pub tls: bool,
}

impl Endpoint {
    /// Creates a plain TCP endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: false,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Opens one connection per probe attempt.
///
/// Implementations classify failures as [`Error::Timeout`],
/// [`Error::ConnectionRefused`], [`Error::HostUnreachable`] or
/// [`Error::Io`].
///
/// [`Error::Timeout`]: crate::Error::Timeout
/// [`Error::ConnectionRefused`]: crate::Error::ConnectionRefused
/// [`Error::HostUnreachable`]: crate::Error::HostUnreachable
/// [`Error::Io`]: crate::Error::Io
pub trait Connector: Send + Sync {
    /// Connected stream type.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Connects to `endpoint`, giving up after `timeout`.
    fn connect(
        &self,
        endpoint: &Endpoint,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Stream>> + Send;
}
