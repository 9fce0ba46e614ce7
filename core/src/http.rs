//! HTTP requests and responses as plain data.
//!
//! # Design
//! `CaddyClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. A `Transport` (see `transport`) performs
//! the actual round-trip, so request construction stays deterministic and
//! easy to test.

use std::fmt;

use crate::error::{AdminError, AdminResult};

pub const CONTENT_TYPE: &str = "content-type";
pub const ORIGIN: &str = "origin";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP verbs used by the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headers attached to every admin request.
///
/// Built once per request from the client's fixed settings:
/// `content-type: application/json` always, `origin` only when configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    origin: Option<String>,
}

impl Headers {
    pub fn new(origin: Option<&str>) -> Self {
        Self {
            origin: origin.map(str::to_string),
        }
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        if let Some(origin) = self.origin {
            headers.push((ORIGIN.to_string(), origin));
        }
        headers
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data. The body is kept as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Return the body of a 2xx response, or a `Status` error carrying the code
/// and body of anything else.
pub fn check_status(response: HttpResponse) -> AdminResult<Vec<u8>> {
    if response.is_success() {
        return Ok(response.body);
    }
    tracing::warn!(status = response.status, "admin API returned an error status");
    Err(AdminError::Status {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_always_carry_json_content_type() {
        assert_eq!(
            Headers::new(None).into_vec(),
            vec![("content-type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn origin_header_added_only_when_configured() {
        let headers = Headers::new(Some("http://localhost:2019")).into_vec();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[1], ("origin".to_string(), "http://localhost:2019".to_string()));
    }

    #[test]
    fn request_header_lookup_is_case_insensitive() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost:2019/config/".to_string(),
            headers: Headers::new(None).into_vec(),
            body: None,
        };
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("Origin"), None);
    }

    #[test]
    fn check_status_returns_body_on_success() {
        for status in [200, 201, 204, 299] {
            let body = check_status(HttpResponse::new(status, "ok")).unwrap();
            assert_eq!(body, b"ok");
        }
    }

    #[test]
    fn check_status_rejects_everything_else() {
        for status in [199, 300, 304, 400, 404, 500, 503] {
            let err = check_status(HttpResponse::new(status, "nope")).unwrap_err();
            match err {
                AdminError::Status { status: s, body } => {
                    assert_eq!(s, status);
                    assert_eq!(body, "nope");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
