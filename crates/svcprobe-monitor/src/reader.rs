//! Multi-line reply reader.
//!
//! A reply whose code is followed by `-` continues until a line that starts
//! with the same code followed by a space:
//!
//! ```text
//! 220-Welcome to the archive
//!  anything at all, even 221 or 220-
//! 220 ready
//! ```
//!
//! Lines in between are discarded without being parsed.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::trace;

use crate::error::{Error, Result};
use crate::parser::parse_reply_line;
use crate::transport::LineTransport;
use crate::types::ReplyLine;

/// Reads one complete reply and returns its effective (last) line.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the first line is malformed or the
/// connection closes before a multi-line reply is terminated. Transport
/// errors such as [`Error::Timeout`] are passed through.
pub async fn read_reply<S>(transport: &mut LineTransport<S>) -> Result<ReplyLine>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let first = parse_reply_line(&transport.read_line().await?)?;
    complete_reply(transport, first).await
}

/// Consumes the rest of a reply whose first line is already parsed.
///
/// Returns `first` as is when it is not a continuation line.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the connection closes before the reply is
/// terminated. Transport errors are passed through.
pub async fn complete_reply<S>(
    transport: &mut LineTransport<S>,
    first: ReplyLine,
) -> Result<ReplyLine>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if !first.continuation {
        return Ok(first);
    }

    let code = first.code;
    let mut skipped = 0usize;
    loop {
        let line = match transport.read_line().await {
            Ok(line) => line,
            Err(Error::EndOfStream) => {
                return Err(Error::protocol(format!(
                    "connection closed inside multi-line {code} reply"
                )));
            }
            Err(e) => return Err(e),
        };

        if ReplyLine::terminates(code, &line) {
            trace!(%code, skipped, "multi-line reply complete");
            return Ok(ReplyLine {
                raw: line,
                code,
                continuation: false,
            });
        }
        skipped += 1;
    }
}
