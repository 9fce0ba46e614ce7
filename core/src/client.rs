//! Stateless request builder and response parser for the Caddy admin API.
//!
//! # Design
//! `CaddyClient` holds only the endpoint and the optional `Origin` value and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the `HttpResponse`. `Caddy` (see `caddy`) glues the two
//! halves to a `Transport`.

use serde_json::Value;
use tracing::warn;

use crate::config::{ClientConfig, Endpoint};
use crate::error::AdminResult;
use crate::http::{check_status, Headers, HttpMethod, HttpRequest, HttpResponse};
use crate::location::{resolve, Location};
use crate::payload::{normalize, ConfigInput};

/// How a read should treat the response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Parse as JSON, falling back to raw bytes if the body is not JSON.
    #[default]
    Decode,
    /// Return the body untouched.
    Raw,
}

/// Outcome of a configuration read.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResponse {
    /// The body parsed as JSON.
    Json(Value),
    /// Decoding was requested but the body was not JSON.
    Fallback(Vec<u8>),
    /// Raw mode was requested.
    Raw(Vec<u8>),
}

impl ConfigResponse {
    pub fn json(&self) -> Option<&Value> {
        match self {
            ConfigResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ConfigResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ConfigResponse::Fallback(_))
    }

    /// Response bytes; decoded JSON is re-serialized.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ConfigResponse::Json(value) => value.to_string().into_bytes(),
            ConfigResponse::Fallback(bytes) | ConfigResponse::Raw(bytes) => bytes,
        }
    }
}

/// Synchronous, stateless client for the Caddy admin API.
#[derive(Debug, Clone)]
pub struct CaddyClient {
    endpoint: Endpoint,
    base_url: String,
    origin: Option<String>,
}

impl CaddyClient {
    pub fn new(endpoint: Endpoint, origin: Option<String>) -> Self {
        let base_url = endpoint.base_url();
        Self {
            endpoint,
            base_url,
            origin,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.endpoint(), config.origin.clone())
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for `location` on this endpoint.
    pub fn url_for(&self, location: &Location) -> String {
        resolve(&self.base_url, location)
    }

    fn request(&self, method: HttpMethod, location: &Location, body: Option<Vec<u8>>) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url_for(location),
            headers: Headers::new(self.origin.as_deref()).into_vec(),
            body,
        }
    }

    fn request_with_config(
        &self,
        method: HttpMethod,
        location: &Location,
        config: ConfigInput,
    ) -> AdminResult<HttpRequest> {
        let body = normalize(config)?.to_body()?;
        Ok(self.request(method, location, Some(body)))
    }

    /// `GET` the configuration at `location` (root when empty).
    pub fn build_config(&self, location: &Location) -> HttpRequest {
        self.request(HttpMethod::Get, location, None)
    }

    /// `POST /config/`: replace the whole configuration.
    pub fn build_load(&self, config: impl Into<ConfigInput>) -> AdminResult<HttpRequest> {
        self.request_with_config(HttpMethod::Post, &Location::path("config/"), config.into())
    }

    /// `PUT`: insert into an array position or create a new object key.
    pub fn build_add(&self, config: impl Into<ConfigInput>, location: &Location) -> AdminResult<HttpRequest> {
        self.request_with_config(HttpMethod::Put, location, config.into())
    }

    /// `PATCH`: strictly replace an existing value or array element.
    pub fn build_update(&self, config: impl Into<ConfigInput>, location: &Location) -> AdminResult<HttpRequest> {
        self.request_with_config(HttpMethod::Patch, location, config.into())
    }

    pub fn build_delete(&self, location: &Location) -> HttpRequest {
        self.request(HttpMethod::Delete, location, None)
    }

    /// `POST /stop`: gracefully shut down the remote process.
    pub fn build_stop(&self) -> HttpRequest {
        self.request(HttpMethod::Post, &Location::path("stop"), None)
    }

    pub fn parse_config(&self, response: HttpResponse, mode: ReadMode) -> AdminResult<ConfigResponse> {
        let body = check_status(response)?;
        if mode == ReadMode::Raw {
            return Ok(ConfigResponse::Raw(body));
        }
        match serde_json::from_slice(&body) {
            Ok(value) => Ok(ConfigResponse::Json(value)),
            Err(e) => {
                warn!(error = %e, body_len = body.len(), "response is not JSON, returning raw bytes");
                Ok(ConfigResponse::Fallback(body))
            }
        }
    }

    /// Body of a load, add, update, delete or stop response.
    pub fn parse_raw(&self, response: HttpResponse) -> AdminResult<Vec<u8>> {
        check_status(response)
    }
}
