//! Synchronous client for the Caddy admin API.
//!
//! # Overview
//! Reads, replaces, inserts, patches and deletes fragments of the JSON
//! configuration a running Caddy process holds in memory, and asks it to
//! stop. Requests are built as plain data by `CaddyClient` and carried by a
//! `Transport`; `Caddy` composes the two into one call per operation.
//!
//! # Design
//! - `location::resolve` turns a path and optional `@id` anchor into a URL.
//! - `payload::normalize` turns a mapping, JSON text or encoded bytes into
//!   the canonical body.
//! - `CaddyClient` is stateless; `build_*` produces a request and `parse_*`
//!   consumes the response, so the I/O boundary is explicit.
//! - `UreqTransport` is the default blocking transport.

pub mod caddy;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod location;
pub mod payload;
pub mod transport;

pub use caddy::Caddy;
pub use client::{CaddyClient, ConfigResponse, ReadMode};
pub use config::{ClientConfig, Endpoint, Protocol, DEFAULT_ADMIN_PORT};
pub use error::{AdminError, AdminResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use location::Location;
pub use payload::{ConfigInput, Payload};
pub use transport::{Transport, UreqTransport};
