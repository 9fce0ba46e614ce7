//! Execution of `HttpRequest` values against the admin endpoint.
//!
//! A transport performs exactly one round-trip per call and hands back the
//! status, headers and body as data. It never interprets the status code
//! and never retries; `http::check_status` decides what counts as success.

use std::time::Duration;

use tracing::debug;
use ureq::{Agent, RequestBuilder};

use crate::error::{AdminError, AdminResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Something that can carry an `HttpRequest` to the admin API.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> AdminResult<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> AdminResult<HttpResponse> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a shared `ureq` agent.
///
/// 4xx/5xx answers come back as `HttpResponse` values rather than errors;
/// only I/O failures (refused connections, timeouts, TLS) become
/// `AdminError::Connectivity`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Requests that could not be built are not connectivity failures.
fn classify(url: &str, err: ureq::Error) -> AdminError {
    match err {
        ureq::Error::Http(_) | ureq::Error::BadUri(_) => AdminError::InvalidRequest {
            url: url.to_string(),
            message: err.to_string(),
        },
        other => AdminError::Connectivity {
            url: url.to_string(),
            message: other.to_string(),
        },
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> AdminResult<HttpResponse> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        debug!(
            method = %request.method,
            url = %url,
            body_len = request.body.as_ref().map_or(0, Vec::len),
            "sending admin request"
        );

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => with_headers(self.agent.patch(url), headers).send(body),
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
        };

        let mut response = result.map_err(|e| classify(&request.url, e))?;
        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // ureq caps bodies at 10 MiB by default; full configs can exceed that.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| classify(&request.url, e))?;

        debug!(status, body_len = body.len(), "received admin response");
        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Headers;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Headers::new(None).into_vec(),
            body: None,
        }
    }

    #[test]
    fn segment_invalid_in_uri_is_an_invalid_request() {
        let err = UreqTransport::default()
            .execute(&get("http://127.0.0.1:2019/config/apps/http/servers/my server"))
            .unwrap_err();
        assert!(matches!(err, AdminError::InvalidRequest { .. }), "got {err:?}");
        assert!(!err.to_string().contains("failed to reach"));
    }

    #[test]
    fn bad_uri_classification() {
        let err = classify("http://x/", ureq::Error::BadUri("no host".to_string()));
        assert!(matches!(err, AdminError::InvalidRequest { .. }));

        let err = classify("http://x/", ureq::Error::ConnectionFailed);
        assert!(matches!(err, AdminError::Connectivity { .. }));
    }
}
