//! `svcprobe` - availability and latency checks for network services
//!
//! Runs a protocol handshake against each host concurrently and prints the
//! resulting status. Latency of available hosts is appended to the JSON-lines
//! file named by the `rrd-repository` parameter.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod args;
mod recorder;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use svcprobe_monitor::report::report;
use svcprobe_monitor::{Monitor, ProbeParameters, ServiceStatus};
use tokio::task::JoinSet;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::Args;
use recorder::JsonlRecorder;

/// Status of one probed host.
#[derive(Debug, Serialize)]
struct HostResult {
    host: String,
    #[serde(flatten)]
    status: ServiceStatus,
}

impl std::fmt::Display for HostResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status.latency_ms() {
            Some(ms) => write!(f, "{} {} {ms}ms", self.host, self.status),
            None => write!(f, "{} {}", self.host, self.status),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "svcprobe=info,svcprobe_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let protocol = args.protocol.spec();
    let map = args.param_map();

    // Validate once before spawning any probe.
    ProbeParameters::from_map("", &map).context("invalid probe parameter")?;

    info!(protocol = protocol.name, hosts = args.hosts.len(), "starting probes");

    let monitor = Arc::new(Monitor::new(protocol));
    let recorder = Arc::new(JsonlRecorder::new());
    let mut probes = JoinSet::new();

    for (index, host) in args.hosts.iter().enumerate() {
        let params = ProbeParameters::from_map(host.as_str(), &map)
            .with_context(|| format!("invalid probe parameter for {host}"))?;
        let monitor = Arc::clone(&monitor);
        let recorder = Arc::clone(&recorder);
        probes.spawn(async move {
            let probe = monitor.probe(&params).await;
            debug!(host = %params.host, attempts = probe.attempts, "probe complete");

            // file appends stay off the async workers
            let host = params.host.clone();
            let status = tokio::task::spawn_blocking(move || {
                report(probe.status, &params, Some(&*recorder))
            })
            .await?;
            anyhow::Ok((index, HostResult { host, status }))
        });
    }

    let mut results = Vec::with_capacity(args.hosts.len());
    while let Some(joined) = probes.join_next().await {
        results.push(joined.context("probe task failed")??);
    }
    results.sort_by_key(|(index, _)| *index);

    let mut all_available = true;
    for (_, result) in &results {
        all_available &= result.status.is_available();
        if args.json {
            println!("{}", serde_json::to_string(result)?);
        } else {
            println!("{result}");
        }
    }
    debug!(all_available, "probes complete");

    Ok(if all_available {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
