//! Monitor facade.

use tracing::debug;

use crate::attempt::{ProbeReport, run_probe};
use crate::params::ProbeParameters;
use crate::protocol::{FTP, ProtocolSpec, SMTP};
use crate::report::{Recorder, report};
use crate::transport::{Connector, TcpConnector};
use crate::types::ServiceStatus;

/// A protocol monitor bound to a connector.
///
/// Holds no mutable state; one instance can poll many targets concurrently.
#[derive(Debug, Clone)]
pub struct Monitor<C = TcpConnector> {
    protocol: ProtocolSpec,
    connector: C,
}

impl Monitor {
    /// Creates a monitor for `protocol` over TCP.
    #[must_use]
    pub const fn new(protocol: ProtocolSpec) -> Self {
        Self {
            protocol,
            connector: TcpConnector::new(),
        }
    }

    /// FTP monitor.
    #[must_use]
    pub const fn ftp() -> Self {
        Self::new(FTP)
    }

    /// SMTP monitor.
    #[must_use]
    pub const fn smtp() -> Self {
        Self::new(SMTP)
    }
}

impl<C: Connector> Monitor<C> {
    /// Creates a monitor with a custom connector.
    pub const fn with_connector(protocol: ProtocolSpec, connector: C) -> Self {
        Self {
            protocol,
            connector,
        }
    }

    /// Returns the protocol definition.
    pub const fn protocol(&self) -> &ProtocolSpec {
        &self.protocol
    }

    /// Probes the target without recording latency.
    pub async fn probe(&self, params: &ProbeParameters) -> ProbeReport {
        run_probe(&self.connector, &self.protocol, params).await
    }

    /// Probes the target and forwards the latency of an available service to
    /// `recorder`.
    pub async fn poll(
        &self,
        params: &ProbeParameters,
        recorder: Option<&dyn Recorder>,
    ) -> ServiceStatus {
        let probe = self.probe(params).await;
        debug!(
            protocol = self.protocol.name,
            host = %params.host,
            status = %probe.status,
            attempts = probe.attempts,
            "poll complete"
        );
        report(probe.status, params, recorder)
    }
}
