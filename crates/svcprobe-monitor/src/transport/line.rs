//! Line-oriented I/O with a per-call deadline.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{Error, Result};

/// Default buffer size for reading.
const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Maximum line length to prevent memory exhaustion.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Line reader and command writer over one connection.
///
/// Every read and write is bounded by the same deadline. Total attempt
/// duration is bounded by the caller.
#[derive(Debug)]
pub struct LineTransport<S> {
    reader: BufReader<S>,
    deadline: Duration,
}

impl<S> LineTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a connected stream.
    pub fn new(stream: S, deadline: Duration) -> Self {
        Self {
            reader: BufReader::with_capacity(DEFAULT_BUFFER_SIZE, stream),
            deadline,
        }
    }

    /// Reads the next line, without its CR/LF terminator.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected, since
    /// banners are free text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if no complete line arrives before the
    /// deadline, [`Error::EndOfStream`] if the peer closed the connection,
    /// and [`Error::Protocol`] if the line exceeds the length limit.
    pub async fn read_line(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        // content plus CRLF
        let limit = (MAX_LINE_LENGTH + 2) as u64;
        let read = tokio::time::timeout(
            self.deadline,
            (&mut self.reader).take(limit).read_until(b'\n', &mut buf),
        )
        .await
        .map_err(|_| Error::Timeout(self.deadline))??;

        if read == 0 {
            return Err(Error::EndOfStream);
        }

        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        if buf.len() > MAX_LINE_LENGTH {
            return Err(Error::protocol("line too long"));
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Writes a command followed by CRLF.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the write does not complete before the
    /// deadline, or the underlying I/O error.
    pub async fn write_command(&mut self, command: &str) -> Result<()> {
        let mut data = Vec::with_capacity(command.len() + 2);
        data.extend_from_slice(command.as_bytes());
        data.extend_from_slice(b"\r\n");

        let stream = self.reader.get_mut();
        tokio::time::timeout(self.deadline, async {
            stream.write_all(&data).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| Error::Timeout(self.deadline))??;
        Ok(())
    }

    /// Shuts down the write side of the connection.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error or [`Error::Timeout`].
    pub async fn close(&mut self) -> Result<()> {
        tokio::time::timeout(self.deadline, self.reader.get_mut().shutdown())
            .await
            .map_err(|_| Error::Timeout(self.deadline))??;
        Ok(())
    }
}
