//! FTP (RFC 959) handshake.

use super::{AuthSteps, BenignReply, ProtocolSpec, Step};
use crate::types::CodeRange;

/// Reply of some servers to `QUIT` sent before a successful login.
const NOT_LOGGED_IN: &str = "User not logged in. Please login with USER and PASS first";

/// Reply of some servers to `QUIT` on a session they already dropped.
const SESSION_DISCONNECTED: &str = "425 Session is disconnected.";

/// FTP: banner, optional `USER`/`PASS`, then `QUIT`.
pub const FTP: ProtocolSpec = ProtocolSpec {
    name: "ftp",
    default_port: 21,
    greeting: CodeRange::COMPLETION,
    auth: Some(AuthSteps {
        user_command: "USER",
        proceed: CodeRange::PROCEED,
        password_command: "PASS",
        success: CodeRange::COMPLETION,
    }),
    terminate_command: "QUIT",
    termination_success: CodeRange::COMPLETION,
    benign: &[
        BenignReply {
            step: Step::Termination,
            code: 530,
            fragment: NOT_LOGGED_IN,
        },
        BenignReply {
            step: Step::Termination,
            code: 425,
            fragment: SESSION_DISCONNECTED,
        },
    ],
};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parser::parse_reply_line;

    #[test]
    fn not_logged_in_on_quit_is_benign() {
        let line = parse_reply_line(
            "530 QUIT : User not logged in. Please login with USER and PASS first.",
        )
        .unwrap();
        assert!(FTP.is_benign(Step::Termination, &line));
    }

    #[test]
    fn session_disconnected_on_quit_is_benign() {
        let line = parse_reply_line("425 Session is disconnected.").unwrap();
        assert!(FTP.is_benign(Step::Termination, &line));
    }

    #[test]
    fn carve_outs_only_apply_to_termination() {
        let line = parse_reply_line(
            "530 User not logged in. Please login with USER and PASS first",
        )
        .unwrap();
        assert!(!FTP.is_benign(Step::Banner, &line));
        assert!(!FTP.is_benign(Step::User, &line));
        assert!(!FTP.is_benign(Step::Password, &line));
    }

    #[test]
    fn other_530_text_is_not_benign() {
        let line = parse_reply_line("530 Login incorrect.").unwrap();
        assert!(!FTP.is_benign(Step::Termination, &line));
    }

    #[test]
    fn fragment_is_case_sensitive() {
        let line = parse_reply_line("425 session is disconnected.").unwrap();
        assert!(!FTP.is_benign(Step::Termination, &line));
    }
}
