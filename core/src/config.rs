//! Client configuration: endpoint identity plus transport settings.
//!
//! Values come either from code (`ClientConfig::new` and the `with_*`
//! setters) or from `CADDY_ADMIN_*` environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AdminError, AdminResult};

/// Caddy's documented admin port.
pub const DEFAULT_ADMIN_PORT: u16 = 2019;

const DEFAULT_HOST: &str = "localhost";

/// URL scheme of the admin endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(AdminError::config(format!("unknown protocol: {other}"))),
        }
    }
}

/// Where the admin API lives. Fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    protocol: Protocol,
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(protocol: Protocol, host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol,
            host: host.into(),
            port,
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `protocol://host:port/`, always with a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}/", self.protocol, self.host, self.port)
    }
}

/// Settings recognized when constructing a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub protocol: Protocol,
    /// Sent verbatim as the `Origin` header when set.
    #[serde(default)]
    pub origin: Option<String>,
    /// Global per-request timeout handed to the transport.
    #[serde(default, with = "duration_secs")]
    pub timeout: Option<Duration>,
}

fn default_port() -> u16 {
    DEFAULT_ADMIN_PORT
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_ADMIN_PORT,
            protocol: Protocol::default(),
            origin: None,
            timeout: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read configuration from the environment.
    ///
    /// - `CADDY_ADMIN_HOST` (default `localhost`)
    /// - `CADDY_ADMIN_PORT` (default `2019`)
    /// - `CADDY_ADMIN_PROTOCOL`: `http` or `https` (default `http`)
    /// - `CADDY_ADMIN_ORIGIN`: optional `Origin` header
    /// - `CADDY_ADMIN_TIMEOUT_SECS`: optional request timeout
    pub fn from_env() -> AdminResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AdminResult<Self> {
        let host = lookup("CADDY_ADMIN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let mut config = Self::new(host);

        if let Some(port) = lookup("CADDY_ADMIN_PORT") {
            config.port = port
                .parse()
                .map_err(|_| AdminError::config(format!("invalid CADDY_ADMIN_PORT: {port}")))?;
        }
        if let Some(protocol) = lookup("CADDY_ADMIN_PROTOCOL") {
            config.protocol = protocol.parse()?;
        }
        config.origin = lookup("CADDY_ADMIN_ORIGIN").filter(|o| !o.is_empty());
        if let Some(secs) = lookup("CADDY_ADMIN_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| AdminError::config(format!("invalid CADDY_ADMIN_TIMEOUT_SECS: {secs}")))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AdminResult<()> {
        if self.host.trim().is_empty() {
            return Err(AdminError::config("host must not be empty"));
        }
        if self.port == 0 {
            return Err(AdminError::config("port must not be zero"));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.protocol, self.host.clone(), self.port)
    }
}
