//! The Mailgun client: credentials, endpoint, and request plumbing.
//!
//! # Design
//! `MailgunClient` holds a sending domain, an API key, a base URL and a
//! shared `Transport`. Each operation is split into a `build_*` method that
//! produces an authenticated `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`; a thin executing wrapper runs the round-trip
//! through the transport. The resource modules (`tags`, `routes`,
//! `unsubscribes`, `bounces`, `stats`) each add their own `impl` block.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

/// Public API endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.mailgun.net/v3";

/// User half of the basic-auth credential pair; the API key is the secret.
const BASIC_AUTH_USER: &str = "api";

/// Whether an endpoint lives under the sending domain or at account level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Domain,
    Account,
}

/// Client for the Mailgun REST API.
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct MailgunClient {
    domain: String,
    api_key: String,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for MailgunClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailgunClient")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MailgunClient {
    pub fn new(domain: &str, api_key: &str) -> Self {
        Self {
            domain: domain.to_string(),
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: Arc::new(UreqTransport),
        }
    }

    /// Build a client from `MG_DOMAIN`, `MG_API_KEY` and optionally `MG_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        let domain = required_env("MG_DOMAIN")?;
        let api_key = required_env("MG_API_KEY")?;
        let client = Self::new(&domain, &api_key);
        Ok(match std::env::var("MG_URL") {
            Ok(url) if !url.is_empty() => client.with_base_url(&url),
            _ => client,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a request built by one of the `build_*` methods.
    pub fn execute(&self, ctx: &Context, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = ?request.method, url = %request.path, "mailgun request");
        self.transport.execute(ctx, request)
    }

    /// Absolute URL for an endpoint, with path segments percent-encoded and
    /// only the given query parameters appended.
    pub(crate) fn endpoint_url(
        &self,
        scope: Scope,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<String, ApiError> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            path.pop_if_empty();
            if scope == Scope::Domain {
                path.push(&self.domain);
            }
            path.extend(segments);
        }
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url.into())
    }

    /// An authenticated request against an already-built URL.
    pub(crate) fn authed_request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            path: url,
            headers: vec![self.authorization()],
            body: None,
        }
    }

    /// An authenticated request carrying a JSON body.
    pub(crate) fn authed_json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        url: String,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut request = self.authed_request(method, url);
        request
            .headers
            .push(("content-type".to_string(), "application/json".to_string()));
        request.body = Some(body);
        Ok(request)
    }

    fn authorization(&self) -> (String, String) {
        let credentials = STANDARD.encode(format!("{BASIC_AUTH_USER}:{}", self.api_key));
        ("authorization".to_string(), format!("Basic {credentials}"))
    }
}

fn required_env(name: &str) -> Result<String, ApiError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::Config(format!("{name} is not set"))),
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Check the status, then decode the JSON body.
pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
