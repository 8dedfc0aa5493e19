//! Probe result types.

use std::time::Duration;

use serde::Serialize;

/// Availability of a monitored service.
///
/// Only `Available` carries a latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ServiceStatus {
    /// The handshake validated.
    Available {
        /// Time from the start of the connect to the first banner line.
        #[serde(rename = "latency_ms", serialize_with = "as_millis")]
        latency: Duration,
    },
    /// Connected, but the handshake never validated.
    Unresponsive,
    /// Could not connect, or the service rejected the handshake.
    Unavailable,
}

impl ServiceStatus {
    /// Returns true if the service is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Returns the measured latency, only for available services.
    #[must_use]
    pub const fn latency(&self) -> Option<Duration> {
        match self {
            Self::Available { latency } => Some(*latency),
            Self::Unresponsive | Self::Unavailable => None,
        }
    }

    /// Returns the measured latency in whole milliseconds.
    #[must_use]
    pub fn latency_ms(&self) -> Option<u64> {
        self.latency()
            .map(|l| u64::try_from(l.as_millis()).unwrap_or(u64::MAX))
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available { .. } => write!(f, "available"),
            Self::Unresponsive => write!(f, "unresponsive"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature fixed by serde
fn as_millis<S: serde::Serializer>(latency: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(latency.as_millis()).unwrap_or(u64::MAX))
}
