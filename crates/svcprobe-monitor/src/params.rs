//! Probe parameters.
//!
//! Monitors receive their settings as a flat key/value map:
//!
//! | key              | meaning                                  | default          |
//! |------------------|------------------------------------------|------------------|
//! | `retry`          | extra attempts after the first           | `0`              |
//! | `port`           | TCP port                                 | protocol default |
//! | `timeout`        | per-read deadline, milliseconds, not 0   | `3000`           |
//! | `userid`         | login user                               | none             |
//! | `password`       | login password                           | none             |
//! | `rrd-repository` | recorder location for latency samples    | none             |
//! | `ds-name`        | data series name                         | `response-time`  |
//! | `tls`            | negotiate TLS right after connecting     | `false`          |

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::str::FromStr;
use std::time::Duration;

/// Default number of extra attempts.
pub const DEFAULT_RETRY: u32 = 0;

/// Default per-read deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Default data series name for latency samples.
pub const DEFAULT_SERIES: &str = "response-time";

/// Invalid parameter value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for parameter `{key}`")]
pub struct ParameterError {
    /// Parameter name.
    pub key: String,
    /// Rejected value.
    pub value: String,
}

/// Login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User id.
    pub username: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Returns credentials only if both parts are non-empty.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Settings for one probe. Immutable while the probe runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeParameters {
    /// Target host name or address.
    pub host: String,
    /// Target port; `None` means the protocol default.
    pub port: Option<u16>,
    /// Connect timeout and per-read/write deadline. Zero falls back to
    /// [`DEFAULT_TIMEOUT`].
    pub timeout: Duration,
    /// Extra attempts after the first.
    pub retry: u32,
    /// Login credentials.
    pub credentials: Option<Credentials>,
    /// Recorder location; latency is not stored without one.
    pub recorder_location: Option<String>,
    /// Data series name for latency samples.
    pub series: String,
    /// Negotiate TLS right after connecting.
    pub tls: bool,
}

impl ProbeParameters {
    /// Creates parameters with all defaults.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            timeout: DEFAULT_TIMEOUT,
            retry: DEFAULT_RETRY,
            credentials: None,
            recorder_location: None,
            series: DEFAULT_SERIES.to_string(),
            tls: false,
        }
    }

    /// Creates a parameter builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ProbeParametersBuilder {
        ProbeParametersBuilder {
            params: Self::new(host),
        }
    }

    /// Reads parameters from a key/value map. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if a numeric or boolean value does not parse,
    /// or if `timeout` is 0.
    pub fn from_map(
        host: impl Into<String>,
        map: &HashMap<String, String>,
    ) -> Result<Self, ParameterError> {
        let mut params = Self::new(host);

        if let Some(retry) = parse_key::<u32>(map, "retry")? {
            params.retry = retry;
        }
        params.port = parse_key::<u16>(map, "port")?;
        if let Some(ms) = parse_key::<NonZeroU64>(map, "timeout")? {
            params.timeout = Duration::from_millis(ms.get());
        }
        if let Some(tls) = parse_key::<bool>(map, "tls")? {
            params.tls = tls;
        }

        let userid = map.get("userid").map_or("", String::as_str);
        let password = map.get("password").map_or("", String::as_str);
        params.credentials = Credentials::new(userid, password);

        params.recorder_location = map.get("rrd-repository").cloned();
        if let Some(series) = map.get("ds-name") {
            params.series.clone_from(series);
        }

        Ok(params)
    }

    /// Returns the deadline applied to the connect and to every read and write.
    #[must_use]
    pub const fn deadline(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Returns the port to connect to.
    #[must_use]
    pub fn port_or(&self, default_port: u16) -> u16 {
        self.port.unwrap_or(default_port)
    }
}

fn parse_key<T: FromStr>(
    map: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ParameterError> {
    map.get(key)
        .map(|value| {
            value.trim().parse().map_err(|_| ParameterError {
                key: key.to_string(),
                value: value.clone(),
            })
        })
        .transpose()
}

/// Builder for [`ProbeParameters`].
#[derive(Debug, Clone)]
pub struct ProbeParametersBuilder {
    params: ProbeParameters,
}

impl ProbeParametersBuilder {
    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.params.port = Some(port);
        self
    }

    /// Sets the per-read deadline. A zero deadline keeps the default.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.params.timeout = timeout;
        }
        self
    }

    /// Sets the number of extra attempts.
    #[must_use]
    pub const fn retry(mut self, retry: u32) -> Self {
        self.params.retry = retry;
        self
    }

    /// Sets login credentials; empty values disable the login step.
    #[must_use]
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.params.credentials = Credentials::new(username, password);
        self
    }

    /// Sets the recorder location.
    #[must_use]
    pub fn recorder(mut self, location: impl Into<String>) -> Self {
        self.params.recorder_location = Some(location.into());
        self
    }

    /// Sets the data series name.
    #[must_use]
    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.params.series = series.into();
        self
    }

    /// Enables implicit TLS.
    #[must_use]
    pub const fn tls(mut self, tls: bool) -> Self {
        self.params.tls = tls;
        self
    }

    /// Builds the parameters.
    #[must_use]
    pub fn build(self) -> ProbeParameters {
        self.params
    }
}
