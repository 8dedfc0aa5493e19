//! JSON-lines latency recorder.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use svcprobe_monitor::{LatencySample, Recorder, RecorderError};

/// Appends one JSON object per sample to the file named by the sample's
/// location.
///
/// `record` does blocking file I/O; async callers run it on the blocking pool.
#[derive(Debug, Default)]
pub struct JsonlRecorder {
    write_lock: Mutex<()>,
}

#[derive(Serialize)]
struct Entry<'a> {
    timestamp: DateTime<Utc>,
    target: &'a str,
    series: &'a str,
    latency_ms: u64,
}

impl JsonlRecorder {
    /// Creates a recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn append(path: &Path, sample: &LatencySample) -> Result<(), RecorderError> {
        let failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            RecorderError::WriteFailed {
                location: sample.location.clone(),
                source,
            }
        };
        let entry = Entry {
            timestamp: Utc::now(),
            target: &sample.target,
            series: &sample.series,
            latency_ms: sample.latency_ms,
        };
        let mut line = serde_json::to_string(&entry).map_err(|e| failed(e.into()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| failed(e.into()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| failed(e.into()))
    }
}

impl Recorder for JsonlRecorder {
    fn record(&self, sample: &LatencySample) -> Result<(), RecorderError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| RecorderError::WriteFailed {
                location: sample.location.clone(),
                source: e.to_string().into(),
            })?;
        Self::append(Path::new(&sample.location), sample)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample(location: &Path, target: &str, latency_ms: u64) -> LatencySample {
        LatencySample {
            location: location.display().to_string(),
            target: target.into(),
            series: "response-time".into(),
            latency_ms,
        }
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn appends_one_line_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency.jsonl");
        let recorder = JsonlRecorder::new();

        recorder.record(&sample(&path, "ftp1", 12)).unwrap();
        recorder.record(&sample(&path, "ftp2", 40)).unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["target"], "ftp1");
        assert_eq!(lines[0]["series"], "response-time");
        assert_eq!(lines[0]["latency_ms"], 12);
        assert_eq!(lines[1]["target"], "ftp2");
        assert!(lines[1]["timestamp"].is_string());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("latency.jsonl");

        let err = JsonlRecorder::new()
            .record(&sample(&path, "ftp1", 1))
            .unwrap_err();
        let RecorderError::WriteFailed { source, .. } = err;
        let io_err = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency.jsonl");
        let recorder = Arc::new(JsonlRecorder::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let recorder = Arc::clone(&recorder);
                let path = path.clone();
                std::thread::spawn(move || {
                    recorder.record(&sample(&path, "ftp", i)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(read_lines(&path).len(), 16);
    }
}
