//! Reply line parser.

use crate::error::{Error, Result};
use crate::types::{ReplyCode, ReplyLine};

/// Parses one reply line.
///
/// Replies start with a three-digit code followed by a separator:
/// - Final: `220 Service ready`
/// - Continuation: `220-Welcome`
/// - Bare code: `220`
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the line has no leading three-digit code
/// or an unknown separator.
pub fn parse_reply_line(line: &str) -> Result<ReplyLine> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(Error::protocol(format!("invalid reply code in {line:?}")));
    }

    let code = bytes[..3]
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));

    let continuation = match bytes.get(3) {
        None | Some(b' ') => false,
        Some(b'-') => true,
        Some(_) => {
            return Err(Error::protocol(format!("invalid reply separator in {line:?}")));
        }
    };

    Ok(ReplyLine {
        raw: line.to_string(),
        code: ReplyCode::new(code),
        continuation,
    })
}
