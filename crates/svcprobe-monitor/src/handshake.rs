//! Handshake state machine.
//!
//! ```text
//! AwaitingBanner ──► AwaitingAuthChallenge ──► AwaitingAuthResult ─┐
//!       │                    │ (login failed)                      │
//!       │                    ▼                                     │
//!       └──────────► AwaitingTerminationReply ◄────────────────────┘
//!                            │
//!                            ▼
//!                     Done(Available | Rejected)
//! ```
//!
//! [`Handshake::advance`] is a pure function from the current state and the
//! reply just read to the next state and the command to send. [`run`] drives
//! it over a [`LineTransport`].

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;
use crate::params::Credentials;
use crate::protocol::{ProtocolSpec, Step};
use crate::parser::parse_reply_line;
use crate::reader::{complete_reply, read_reply};
use crate::transport::LineTransport;
use crate::types::{ReplyCode, ReplyLine};

/// Position of one attempt in the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Waiting for the server greeting.
    AwaitingBanner,
    /// User command sent.
    AwaitingAuthChallenge,
    /// Password command sent.
    AwaitingAuthResult,
    /// Termination command sent.
    AwaitingTerminationReply,
    /// Finished.
    Done(Verdict),
}

impl HandshakeState {
    /// Monotonic position; every transition strictly increases it.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::AwaitingBanner => 0,
            Self::AwaitingAuthChallenge => 1,
            Self::AwaitingAuthResult => 2,
            Self::AwaitingTerminationReply => 3,
            Self::Done(_) => 4,
        }
    }

    /// Step whose reply this state waits for.
    #[must_use]
    pub const fn step(&self) -> Option<Step> {
        match self {
            Self::AwaitingBanner => Some(Step::Banner),
            Self::AwaitingAuthChallenge => Some(Step::User),
            Self::AwaitingAuthResult => Some(Step::Password),
            Self::AwaitingTerminationReply => Some(Step::Termination),
            Self::Done(_) => None,
        }
    }
}

/// Outcome of a completed handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Validated by a success code or a benign carve-out.
    Available,
    /// The server answered, but with an unacceptable or unreadable code.
    Rejected {
        /// Step that failed.
        step: Step,
        /// Code received; `None` for a banner without a reply code.
        code: Option<ReplyCode>,
    },
}

/// Outcome of the optional login exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Login {
    /// No credentials, or the protocol has no login step.
    #[default]
    NotAttempted,
    /// Password accepted.
    Succeeded,
    /// User or password rejected with `code`.
    Failed {
        /// Code received.
        code: ReplyCode,
    },
}

/// Command to send to the server.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// Send the user id.
    User(String),
    /// Send the password.
    Password(String),
    /// End the session.
    Terminate,
}

impl Command {
    /// Renders the command line (without CRLF) for `protocol`.
    #[must_use]
    pub fn render(&self, protocol: &ProtocolSpec) -> String {
        match (self, protocol.auth) {
            (Self::User(name), Some(auth)) => format!("{} {name}", auth.user_command),
            (Self::Password(pass), Some(auth)) => format!("{} {pass}", auth.password_command),
            _ => protocol.terminate_command.to_string(),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(name) => f.debug_tuple("User").field(name).finish(),
            Self::Password(_) => f.debug_tuple("Password").field(&"<redacted>").finish(),
            Self::Terminate => f.write_str("Terminate"),
        }
    }
}

/// Result of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State to move to.
    pub next: HandshakeState,
    /// Command to send before reading the next reply.
    pub send: Option<Command>,
    /// Login outcome decided by this reply, if any.
    pub login: Option<Login>,
}

impl Transition {
    const fn finish(verdict: Verdict) -> Self {
        Self {
            next: HandshakeState::Done(verdict),
            send: None,
            login: None,
        }
    }

    const fn terminate(login: Option<Login>) -> Self {
        Self {
            next: HandshakeState::AwaitingTerminationReply,
            send: Some(Command::Terminate),
            login,
        }
    }
}

/// Handshake rules for one protocol and one set of credentials.
#[derive(Debug, Clone, Copy)]
pub struct Handshake<'a> {
    protocol: &'a ProtocolSpec,
    credentials: Option<&'a Credentials>,
}

impl<'a> Handshake<'a> {
    /// Creates the rules. Credentials are ignored if the protocol has no login.
    #[must_use]
    pub const fn new(protocol: &'a ProtocolSpec, credentials: Option<&'a Credentials>) -> Self {
        Self {
            protocol,
            credentials,
        }
    }

    /// Computes the transition for `reply` received in `state`.
    ///
    /// A `Done` state is terminal and returned unchanged.
    #[must_use]
    pub fn advance(&self, state: HandshakeState, reply: &ReplyLine) -> Transition {
        let code = reply.code;
        match state {
            HandshakeState::AwaitingBanner => {
                if !self.protocol.greeting.contains(code) {
                    return Transition::finish(Verdict::Rejected {
                        step: Step::Banner,
                        code: Some(code),
                    });
                }
                match (self.protocol.auth, self.credentials) {
                    (Some(_), Some(creds)) => Transition {
                        next: HandshakeState::AwaitingAuthChallenge,
                        send: Some(Command::User(creds.username.clone())),
                        login: None,
                    },
                    _ => Transition::terminate(None),
                }
            }
            HandshakeState::AwaitingAuthChallenge => {
                match (self.protocol.auth, self.credentials) {
                    (Some(auth), Some(creds)) if auth.proceed.contains(code) => Transition {
                        next: HandshakeState::AwaitingAuthResult,
                        send: Some(Command::Password(creds.password.clone())),
                        login: None,
                    },
                    _ => Transition::terminate(Some(Login::Failed { code })),
                }
            }
            HandshakeState::AwaitingAuthResult => {
                let accepted = self
                    .protocol
                    .auth
                    .is_some_and(|auth| auth.success.contains(code));
                let login = if accepted {
                    Login::Succeeded
                } else {
                    Login::Failed { code }
                };
                Transition::terminate(Some(login))
            }
            HandshakeState::AwaitingTerminationReply => {
                if self.protocol.termination_success.contains(code)
                    || self.protocol.is_benign(Step::Termination, reply)
                {
                    Transition::finish(Verdict::Available)
                } else {
                    Transition::finish(Verdict::Rejected {
                        step: Step::Termination,
                        code: Some(code),
                    })
                }
            }
            HandshakeState::Done(_) => Transition {
                next: state,
                send: None,
                login: None,
            },
        }
    }
}

/// What one handshake run established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandshakeReport {
    /// Final verdict.
    pub verdict: Verdict,
    /// Login outcome.
    pub login: Login,
    /// Time from `started` to the arrival of the first banner line.
    pub banner_latency: Duration,
}

/// Runs the handshake over `transport`.
///
/// `started` is the instant the connect began; banner latency is measured
/// from it.
///
/// # Errors
///
/// Returns transport and parse errors. A reply with an unacceptable code is
/// not an error but a [`Verdict::Rejected`], and so is a banner that does not
/// start with a reply code (some other service answering on the port).
pub async fn run<S>(
    transport: &mut LineTransport<S>,
    handshake: Handshake<'_>,
    started: Instant,
) -> Result<HandshakeReport>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let banner = transport.read_line().await?;
    let banner_latency = started.elapsed();
    let first = match parse_reply_line(&banner) {
        Ok(first) => first,
        Err(err) => {
            debug!(protocol = handshake.protocol.name, error = %err, "unrecognized banner");
            return Ok(HandshakeReport {
                verdict: Verdict::Rejected {
                    step: Step::Banner,
                    code: None,
                },
                login: Login::NotAttempted,
                banner_latency,
            });
        }
    };
    let mut reply = complete_reply(transport, first).await?;

    let mut state = HandshakeState::AwaitingBanner;
    let mut login = Login::NotAttempted;
    loop {
        let transition = handshake.advance(state, &reply);
        debug!(
            protocol = handshake.protocol.name,
            step = ?state.step(),
            code = %reply.code,
            text = reply.text(),
            next = ?transition.next,
            "handshake reply"
        );
        debug_assert!(transition.next.rank() > state.rank());

        if let Some(outcome) = transition.login {
            if let Login::Failed { code } = outcome {
                debug!(protocol = handshake.protocol.name, %code, "login failed");
            }
            login = outcome;
        }
        state = transition.next;

        if let HandshakeState::Done(verdict) = state {
            return Ok(HandshakeReport {
                verdict,
                login,
                banner_latency,
            });
        }
        if let Some(command) = transition.send {
            transport
                .write_command(&command.render(handshake.protocol))
                .await?;
        }
        reply = read_reply(transport).await?;
    }
}
