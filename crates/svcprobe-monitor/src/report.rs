//! Latency recording.
//!
//! The recorder is an external sink shared by every probe running at the
//! same time, so implementations must be safe for concurrent use. A failing
//! recorder never changes the status a probe reports.

use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info};

use crate::params::ProbeParameters;
use crate::types::ServiceStatus;

/// Failure to store a latency sample.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// The sample could not be written.
    #[error("failed to write latency sample to {location}: {source}")]
    WriteFailed {
        /// Recorder location.
        location: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// One latency measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencySample {
    /// Recorder location (`rrd-repository`).
    pub location: String,
    /// Probed host.
    pub target: String,
    /// Data series name (`ds-name`).
    pub series: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Sink for latency samples.
pub trait Recorder: Send + Sync {
    /// Stores one sample.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] if the sample could not be stored.
    fn record(&self, sample: &LatencySample) -> Result<(), RecorderError>;
}

/// Recorder that keeps samples in memory.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    samples: Mutex<Vec<LatencySample>>,
}

impl MemoryRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the stored samples.
    #[must_use]
    pub fn samples(&self) -> Vec<LatencySample> {
        self.samples
            .lock()
            .map(|samples| samples.clone())
            .unwrap_or_default()
    }
}

impl Recorder for MemoryRecorder {
    fn record(&self, sample: &LatencySample) -> Result<(), RecorderError> {
        self.samples
            .lock()
            .map_err(|e| RecorderError::WriteFailed {
                location: sample.location.clone(),
                source: e.to_string().into(),
            })?
            .push(sample.clone());
        Ok(())
    }
}

/// Forwards the latency of an available service to `recorder` and returns
/// `status` unchanged.
///
/// Nothing is recorded unless the status is available, the parameters name a
/// recorder location, and a recorder is supplied.
pub fn report(
    status: ServiceStatus,
    params: &ProbeParameters,
    recorder: Option<&dyn Recorder>,
) -> ServiceStatus {
    let Some(latency_ms) = status.latency_ms() else {
        return status;
    };
    let Some(location) = params.recorder_location.as_deref() else {
        info!(
            host = %params.host,
            "recorder location not specified in parameters, latency data will not be stored"
        );
        return status;
    };
    let Some(recorder) = recorder else {
        return status;
    };

    let sample = LatencySample {
        location: location.to_string(),
        target: params.host.clone(),
        series: params.series.clone(),
        latency_ms,
    };
    if let Err(err) = recorder.record(&sample) {
        debug!(error = %err, "there was a problem storing the latency sample");
    }
    status
}
