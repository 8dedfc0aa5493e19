//! Attempt loop: retries, deadlines and the last-known status.

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::handshake::{self, Handshake, HandshakeReport, Verdict};
use crate::params::ProbeParameters;
use crate::protocol::ProtocolSpec;
use crate::transport::{Connector, Endpoint, LineTransport};
use crate::types::ServiceStatus;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Spend one more attempt from the budget.
    Retry,
    /// Stop probing; more attempts cannot succeed.
    Abort,
}

/// Classifies an attempt failure.
#[must_use]
pub const fn retry_decision(err: &Error) -> RetryDecision {
    if err.is_fatal() {
        RetryDecision::Abort
    } else {
        RetryDecision::Retry
    }
}

/// Result of a whole probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// Final status.
    pub status: ServiceStatus,
    /// Number of connection attempts made.
    pub attempts: u32,
}

/// How one attempt ended.
#[derive(Debug)]
enum Outcome {
    /// Handshake completed.
    Completed(HandshakeReport),
    /// Connected, then failed before the handshake completed.
    Broken(Error),
    /// Could not connect.
    NotConnected(Error),
}

/// Runs up to `retry + 1` attempts against the target.
///
/// Stops at the first available result or at a fatal error. Never fails: the
/// worst case is [`ServiceStatus::Unavailable`].
pub async fn run_probe<C: Connector>(
    connector: &C,
    protocol: &ProtocolSpec,
    params: &ProbeParameters,
) -> ProbeReport {
    let endpoint = Endpoint {
        host: params.host.clone(),
        port: params.port_or(protocol.default_port),
        tls: params.tls,
    };
    let handshake = Handshake::new(protocol, params.credentials.as_ref());
    debug!(
        protocol = protocol.name,
        %endpoint,
        timeout = ?params.deadline(),
        retry = params.retry,
        "polling"
    );

    let mut status = ServiceStatus::Unavailable;
    let mut attempts: u32 = 0;
    for _ in 0..=params.retry {
        attempts = attempts.saturating_add(1);
        let error = match attempt(connector, &endpoint, handshake, params).await {
            Outcome::Completed(report) => match report.verdict {
                Verdict::Available => {
                    status = ServiceStatus::Available {
                        latency: report.banner_latency,
                    };
                    break;
                }
                Verdict::Rejected { step, code } => {
                    debug!(%endpoint, attempt = attempts, %step, ?code, "handshake rejected");
                    status = ServiceStatus::Unavailable;
                    continue;
                }
            },
            Outcome::Broken(err) => {
                status = ServiceStatus::Unresponsive;
                err
            }
            Outcome::NotConnected(err) => err,
        };

        match (&error, retry_decision(&error)) {
            (_, RetryDecision::Abort) => {
                warn!(%endpoint, attempt = attempts, error = %error, "giving up");
                break;
            }
            (Error::Protocol(_), RetryDecision::Retry) => {
                info!(%endpoint, attempt = attempts, error = %error, "invalid reply");
            }
            (_, RetryDecision::Retry) => {
                debug!(%endpoint, attempt = attempts, error = %error, "attempt failed");
            }
        }
    }

    ProbeReport { status, attempts }
}

/// One connect-handshake-close cycle. The connection is dropped on return.
async fn attempt<C: Connector>(
    connector: &C,
    endpoint: &Endpoint,
    handshake: Handshake<'_>,
    params: &ProbeParameters,
) -> Outcome {
    let started = Instant::now();
    let stream = match connector.connect(endpoint, params.deadline()).await {
        Ok(stream) => stream,
        Err(err) => return Outcome::NotConnected(err),
    };
    debug!(%endpoint, "connected");

    let mut transport = LineTransport::new(stream, params.deadline());
    let result: Result<HandshakeReport> = handshake::run(&mut transport, handshake, started).await;
    if let Err(err) = transport.close().await {
        debug!(%endpoint, error = %err, "error closing connection");
    }

    match result {
        Ok(report) => Outcome::Completed(report),
        Err(err) => Outcome::Broken(err),
    }
}
