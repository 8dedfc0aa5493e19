//! SMTP (RFC 5321) handshake.

use super::ProtocolSpec;
use crate::types::CodeRange;

/// SMTP: `220` greeting, then `QUIT` answered with `221`.
///
/// No login step; credentials in the parameters are ignored.
pub const SMTP: ProtocolSpec = ProtocolSpec {
    name: "smtp",
    default_port: 25,
    greeting: CodeRange::COMPLETION,
    auth: None,
    terminate_command: "QUIT",
    termination_success: CodeRange::COMPLETION,
    benign: &[],
};
