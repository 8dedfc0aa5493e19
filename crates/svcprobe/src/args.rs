//! Command-line arguments.

use std::collections::HashMap;

use clap::{Parser, ValueEnum};
use svcprobe_monitor::{FTP, ProtocolSpec, SMTP};

/// Check FTP or SMTP services for availability and latency.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Protocol handshake to run
    #[arg(short, long, value_enum, default_value_t = Protocol::Ftp)]
    pub protocol: Protocol,

    /// Probe parameter as key=value (retry, port, timeout, userid, password,
    /// rrd-repository, ds-name, tls); may be repeated
    #[arg(short = 'o', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Print one JSON object per host
    #[arg(long)]
    pub json: bool,

    /// Hosts to probe
    #[arg(required = true, value_name = "HOST")]
    pub hosts: Vec<String>,
}

impl Args {
    /// Collects `--param` pairs into a map. Later pairs win.
    pub fn param_map(&self) -> HashMap<String, String> {
        self.params.iter().cloned().collect()
    }
}

/// Supported protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    /// File Transfer Protocol
    Ftp,
    /// Simple Mail Transfer Protocol
    Smtp,
}

impl Protocol {
    /// Returns the handshake table for this protocol.
    pub const fn spec(self) -> ProtocolSpec {
        match self {
            Self::Ftp => FTP,
            Self::Smtp => SMTP,
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in {raw:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_params_and_hosts() {
        let args = Args::try_parse_from([
            "svcprobe",
            "-o",
            "retry=2",
            "--param",
            "userid=monitor",
            "ftp1.example.com",
            "ftp2.example.com",
        ])
        .unwrap();

        assert_eq!(args.protocol, Protocol::Ftp);
        assert!(!args.json);
        assert_eq!(args.hosts, vec!["ftp1.example.com", "ftp2.example.com"]);

        let map = args.param_map();
        assert_eq!(map.get("retry").map(String::as_str), Some("2"));
        assert_eq!(map.get("userid").map(String::as_str), Some("monitor"));
    }

    #[test]
    fn smtp_protocol() {
        let args = Args::try_parse_from(["svcprobe", "--protocol", "smtp", "--json", "mx"]).unwrap();
        assert_eq!(args.protocol.spec().name, "smtp");
        assert!(args.json);
    }

    #[test]
    fn value_may_contain_equals() {
        assert_eq!(
            parse_key_value("password=a=b").unwrap(),
            ("password".into(), "a=b".into())
        );
    }

    #[test]
    fn rejects_malformed_param() {
        assert!(parse_key_value("retry").is_err());
        assert!(parse_key_value("=3").is_err());
        assert!(Args::try_parse_from(["svcprobe", "-o", "retry", "host"]).is_err());
    }

    #[test]
    fn requires_a_host() {
        assert!(Args::try_parse_from(["svcprobe"]).is_err());
    }
}
