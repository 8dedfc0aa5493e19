//! # svcprobe-monitor
//!
//! Availability and latency monitors for line-oriented network services.
//!
//! A monitor connects to a target, walks a short protocol handshake
//! (banner, optional login, disconnect) and reports whether the service is
//! available, connected but unresponsive, or unavailable.
//!
//! ## Quick Start
//!
//! ```ignore
//! use svcprobe_monitor::{Monitor, MemoryRecorder, ProbeParameters};
//!
//! #[tokio::main]
//! async fn main() {
//!     let params = ProbeParameters::builder("ftp.example.com")
//!         .retry(2)
//!         .recorder("/var/lib/latency")
//!         .build();
//!
//!     let recorder = MemoryRecorder::new();
//!     let status = Monitor::ftp().poll(&params, Some(&recorder)).await;
//!     println!("{status} {:?}", status.latency());
//! }
//! ```
//!
//! ## Handshake
//!
//! ```text
//! connect ─► banner (2xx) ─► [USER ─► PASS] ─► QUIT ─► 2xx or benign error
//! ```
//!
//! Failures are retried up to the `retry` budget, except an unreachable
//! host, which ends the probe at once.
//!
//! ## Modules
//!
//! - [`attempt`]: retry loop and failure classification
//! - [`handshake`]: handshake state machine
//! - [`params`]: probe parameters
//! - [`parser`]: reply line parser
//! - [`protocol`]: protocol tables (FTP, SMTP)
//! - [`reader`]: multi-line reply reader
//! - [`report`]: latency recorder sink
//! - [`transport`]: connections and line I/O
//! - [`types`]: reply codes and service status

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod attempt;
mod error;
pub mod handshake;
mod monitor;
pub mod params;
pub mod parser;
pub mod protocol;
pub mod reader;
pub mod report;
pub mod transport;
pub mod types;

pub use attempt::{ProbeReport, RetryDecision, retry_decision};
pub use error::{Error, Result};
pub use monitor::Monitor;
pub use params::{Credentials, ParameterError, ProbeParameters};
pub use protocol::{FTP, ProtocolSpec, SMTP};
pub use report::{LatencySample, MemoryRecorder, Recorder, RecorderError};
pub use transport::{Connector, Endpoint, TcpConnector};
pub use types::{ReplyCode, ServiceStatus};
