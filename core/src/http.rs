//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `MailgunClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; a `Transport` executes the round-trip in between. The default
//! `UreqTransport` performs one blocking request per call, and tests can swap
//! in a scripted transport to observe exactly which requests were issued.
//!
//! All fields use owned types (`String`, `Vec`) so values can be recorded,
//! replayed and compared in tests without lifetime concerns.

use ureq::RequestBuilder;

use crate::context::Context;
use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL with its query string already encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Non-2xx statuses are carried here as data; interpreting them is up to the
/// client's `parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Executes a single request.
///
/// Implementations must return `Err` only when no response was obtained
/// (transport failure, cancellation); any HTTP status is an `Ok` response.
pub trait Transport: Send + Sync {
    fn execute(&self, ctx: &Context, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by `ureq`, one short-lived agent per request.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, ctx: &Context, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        ctx.check()?;

        // Status codes are returned as data so the client can map them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(ctx.remaining())
            .build()
            .new_agent();

        let headers = &request.headers;
        let result = match (request.method, request.body) {
            (HttpMethod::Get, _) => with_headers(agent.get(&request.path), headers).call(),
            (HttpMethod::Delete, _) => with_headers(agent.delete(&request.path), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(agent.post(&request.path), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(agent.post(&request.path), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(agent.put(&request.path), headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(agent.put(&request.path), headers).send_empty(),
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}
