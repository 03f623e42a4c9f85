/*============================================================
  Synavera Project: bugsnag_notifier
  Module: bugsnag_notifier::transport
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    POST serialised payloads to the notify endpoint and turn
    the HTTP outcome into success or a typed failure.

  Security / Safety Notes:
    Sends the API key inside the request body only; no
    authentication headers are attached.

  Dependencies:
    reqwest (blocking) for HTTP.

  Operational Scope:
    Invoked synchronously by the client for every event that
    passes the release-stage gate.

  Revision History:
    2026-10-16 COD  Implemented blocking notify transport.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Connection failures surfaced, never swallowed
    - Single attempt per call; retry belongs to the caller
    - Injectable transport seam for deterministic tests
============================================================*/

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::{NotifierError, Result};

/// Host receiving notifications; the scheme depends on the SSL flag.
pub const NOTIFY_HOST: &str = "notify.bugsnag.com";

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Anything able to POST a body and report the response.
///
/// Implementations return `Err(NotifierError::Transport)` only when no HTTP
/// response was obtained; every received status, including 4xx and 5xx, is
/// returned as `Ok`.
pub trait HttpTransport: Send + Sync {
    fn post(&self, url: &str, headers: &[(&str, &str)], body: Vec<u8>) -> Result<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn post(&self, url: &str, headers: &[(&str, &str)], body: Vec<u8>) -> Result<HttpResponse> {
        (**self).post(url, headers, body)
    }
}

/// Default transport backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bugsnag-notifier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                NotifierError::Transport(format!("Failed to build HTTP client: {err}"))
            })?;
        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post(&self, url: &str, headers: &[(&str, &str)], body: Vec<u8>) -> Result<HttpResponse> {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send().map_err(|err| {
            let kind = if err.is_timeout() {
                "timed out"
            } else if err.is_connect() {
                "connection failed"
            } else {
                "failed"
            };
            NotifierError::Transport(format!("POST {url} {kind}: {err}"))
        })?;
        let status = response.status();
        // Success needs no body; a truncated or dropped body on 2xx is still delivery.
        if status.is_success() {
            return Ok(HttpResponse::new(status.as_u16(), String::new()));
        }
        let body = response.text().unwrap_or_default();
        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Endpoint URL for the given scheme preference.
pub fn endpoint(use_ssl: bool) -> String {
    let scheme = if use_ssl { "https" } else { "http" };
    format!("{scheme}://{NOTIFY_HOST}")
}

/// Map a response onto success or the matching failure kind.
pub fn classify_response(response: HttpResponse) -> Result<()> {
    match response.status {
        200..=299 => Ok(()),
        400 => Err(NotifierError::InvalidPayload),
        401 => Err(NotifierError::Unauthorized),
        413 => Err(NotifierError::PayloadTooLarge),
        429 => Err(NotifierError::RateLimited),
        status => Err(NotifierError::UnclassifiedHttp {
            status,
            body: response.body,
        }),
    }
}

/// POST a serialised payload as JSON and classify the outcome.
pub fn send_payload(transport: &dyn HttpTransport, url: &str, body: Vec<u8>) -> Result<()> {
    let headers = [(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)];
    let response = transport.post(url, &headers, body)?;
    classify_response(response)
}
