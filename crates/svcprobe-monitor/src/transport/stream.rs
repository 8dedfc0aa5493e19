//! Connection streams and the production connector.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::{
    TlsConnector,
    rustls::{ClientConfig, RootCertStore},
};
use tracing::debug;

use super::{Connector, Endpoint};
use crate::error::{Error, Result};

/// Probe connection (TCP or TLS).
#[derive(Debug)]
pub enum ProbeStream {
    /// Plain TCP connection.
    Tcp(TcpStream),
    /// TLS-encrypted connection.
    Tls(Box<tokio_rustls::client::TlsStream<TcpStream>>),
}

impl AsyncRead for ProbeStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_read(cx, buf),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for ProbeStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_write(cx, buf),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_flush(cx),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(s) => Pin::new(s).poll_shutdown(cx),
            Self::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Connects over TCP, with implicit TLS when the endpoint asks for it.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector;

impl TcpConnector {
    /// Creates a connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn open(endpoint: &Endpoint) -> Result<ProbeStream> {
        let tcp = TcpStream::connect((endpoint.host.as_str(), endpoint.port))
            .await
            .map_err(|e| Error::from_connect(e, &endpoint.host))?;
        debug!(host = %endpoint.host, port = endpoint.port, "tcp connected");

        if !endpoint.tls {
            return Ok(ProbeStream::Tcp(tcp));
        }

        let server_name = ServerName::try_from(endpoint.host.clone())
            .map_err(|_| Error::InvalidServerName(endpoint.host.clone()))?;
        let tls = create_tls_connector().connect(server_name, tcp).await?;
        Ok(ProbeStream::Tls(Box::new(tls)))
    }
}

impl Connector for TcpConnector {
    type Stream = ProbeStream;

    async fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<ProbeStream> {
        tokio::time::timeout(timeout, Self::open(endpoint))
            .await
            .map_err(|_| Error::Timeout(timeout))?
    }
}

/// Creates a TLS connector with the Mozilla root certificates.
fn create_tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"220 ready\r\n").await.unwrap();
        });

        let endpoint = Endpoint::new("127.0.0.1", port);
        let mut stream = TcpConnector::new()
            .connect(&endpoint, Duration::from_secs(2))
            .await
            .unwrap();
        assert!(matches!(stream, ProbeStream::Tcp(_)));

        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"220 ready\r\n");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_classified() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = Endpoint::new("127.0.0.1", port);
        let err = TcpConnector::new()
            .connect(&endpoint, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConnectionRefused));
    }
}
