//! Blocking facade over `CaddyClient` and a `Transport`.
//!
//! Every method issues exactly one request and returns as soon as the
//! response (or a transport failure) arrives. Nothing is retried.

use crate::client::{CaddyClient, ConfigResponse, ReadMode};
use crate::config::ClientConfig;
use crate::error::AdminResult;
use crate::http::HttpRequest;
use crate::location::Location;
use crate::payload::ConfigInput;
use crate::transport::{Transport, UreqTransport};

/// Handle to a Caddy admin endpoint.
///
/// ```no_run
/// use caddy_core::{Caddy, Location};
/// use serde_json::json;
///
/// let caddy = Caddy::new("localhost")?;
/// caddy.add(json!("test.example.com"), &Location::id("host").with_path("host/0"))?;
/// # Ok::<(), caddy_core::AdminError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Caddy<T = UreqTransport> {
    client: CaddyClient,
    transport: T,
}

impl Caddy<UreqTransport> {
    /// Plain HTTP on the default admin port, no `Origin` header.
    pub fn new(host: impl Into<String>) -> AdminResult<Self> {
        Self::with_config(ClientConfig::new(host))
    }

    pub fn with_config(config: ClientConfig) -> AdminResult<Self> {
        config.validate()?;
        let transport = UreqTransport::new(config.timeout);
        Ok(Self::with_transport(CaddyClient::from_config(&config), transport))
    }

    pub fn from_env() -> AdminResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }
}

impl<T: Transport> Caddy<T> {
    pub fn with_transport(client: CaddyClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CaddyClient {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> AdminResult<Vec<u8>> {
        let response = self.transport.execute(&request)?;
        self.client.parse_raw(response)
    }

    /// Read the configuration at `location`.
    pub fn config(&self, location: &Location, mode: ReadMode) -> AdminResult<ConfigResponse> {
        let response = self.transport.execute(&self.client.build_config(location))?;
        self.client.parse_config(response, mode)
    }

    /// Replace the entire configuration.
    pub fn load(&self, config: impl Into<ConfigInput>) -> AdminResult<Vec<u8>> {
        self.send(self.client.build_load(config)?)
    }

    /// Insert into an array or create a new key at `location`.
    pub fn add(&self, config: impl Into<ConfigInput>, location: &Location) -> AdminResult<Vec<u8>> {
        self.send(self.client.build_add(config, location)?)
    }

    /// Replace the existing value at `location`.
    pub fn update(&self, config: impl Into<ConfigInput>, location: &Location) -> AdminResult<Vec<u8>> {
        self.send(self.client.build_update(config, location)?)
    }

    pub fn delete(&self, location: &Location) -> AdminResult<Vec<u8>> {
        self.send(self.client.build_delete(location))
    }

    /// Gracefully shut down the remote process. Use `delete` on the root
    /// location to unload the configuration without exiting.
    pub fn stop(&self) -> AdminResult<Vec<u8>> {
        self.send(self.client.build_stop())
    }
}
