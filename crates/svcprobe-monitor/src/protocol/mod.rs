//! Protocol definitions for handshake monitors.
//!
//! Each monitored protocol is a [`ProtocolSpec`]: reply-code ranges for each
//! handshake step, the command words to send, and a table of replies that
//! prove the service is alive even though their code signals an error.
//! Adding a protocol means adding a table, not touching the state machine.

mod ftp;
mod smtp;

pub use ftp::FTP;
pub use smtp::SMTP;

use crate::types::{CodeRange, ReplyLine};

/// Handshake step a reply answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Greeting sent by the server right after connect.
    Banner,
    /// Reply to the user name command.
    User,
    /// Reply to the password command.
    Password,
    /// Reply to the disconnect command.
    Termination,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Banner => "banner",
            Self::User => "user",
            Self::Password => "password",
            Self::Termination => "termination",
        };
        f.write_str(name)
    }
}

/// Login exchange of a protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSteps {
    /// Command word followed by the user id (e.g., `USER`).
    pub user_command: &'static str,
    /// Codes that let the login continue with the password.
    pub proceed: CodeRange,
    /// Command word followed by the password (e.g., `PASS`).
    pub password_command: &'static str,
    /// Codes that mean the login succeeded.
    pub success: CodeRange,
}

/// A nominally failing reply that still proves the service is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenignReply {
    /// Step the carve-out applies to.
    pub step: Step,
    /// Exact reply code.
    pub code: u16,
    /// Text that must appear in the reply line.
    pub fragment: &'static str,
}

impl BenignReply {
    /// Returns true if `line`, received at `step`, matches this entry.
    #[must_use]
    pub fn matches(&self, step: Step, line: &ReplyLine) -> bool {
        self.step == step && line.code.as_u16() == self.code && line.raw.contains(self.fragment)
    }
}

/// Description of a line-oriented handshake protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolSpec {
    /// Protocol name used in logs.
    pub name: &'static str,
    /// Port used when the parameters do not name one.
    pub default_port: u16,
    /// Codes accepted in the banner.
    pub greeting: CodeRange,
    /// Login exchange, if the protocol has one.
    pub auth: Option<AuthSteps>,
    /// Command that ends the session (e.g., `QUIT`).
    pub terminate_command: &'static str,
    /// Codes accepted in reply to the termination command.
    pub termination_success: CodeRange,
    /// Carve-outs: error replies that still count as available.
    pub benign: &'static [BenignReply],
}

impl ProtocolSpec {
    /// Returns true if `line` at `step` is listed as a benign error.
    #[must_use]
    pub fn is_benign(&self, step: Step, line: &ReplyLine) -> bool {
        self.benign.iter().any(|entry| entry.matches(step, line))
    }
}
