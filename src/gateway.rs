// ABOUTME: Shared HTTP request gateway: builds, executes, and logs calls against the fixed backend origin
// ABOUTME: Normalizes success and failure into parsed JSON or an ApiError carrying the HTTP status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use crate::config::ClientConfig;
use crate::errors::{ApiError, ApiResult};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// HTTP gateway for all backend calls.
///
/// Every call is a single best-effort attempt: no retry, no cancellation.
/// The caller owns any retry policy. Responses are returned untyped; the
/// typed operation layer supplies the expected shape.
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    /// Build a gateway with a pooled client using the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the underlying client cannot be
    /// constructed.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("platewise-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.origin().to_string(),
        })
    }

    /// Backend origin this gateway targets.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a request and normalize the outcome.
    ///
    /// 2xx with a non-empty body parses as JSON; an empty body resolves to
    /// an empty record; an unparsable body resolves to `Null` with a
    /// warning rather than an error. Anything outside 2xx becomes
    /// [`ApiError::Api`] with the status attached.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when the transport itself fails and
    /// [`ApiError::Api`] for non-2xx responses.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, payload = ?body, "outbound request");

        let mut request = self.client.request(method, &url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let text = response.text().await.unwrap_or_default();
        info!(status = status.as_u16(), latency_ms, "inbound response");

        if !status.is_success() {
            let message = error_message(status, &text);
            error!(status = status.as_u16(), %message, "request failed");
            return Err(ApiError::Api {
                status_code: status.as_u16(),
                message,
                retryable: status.is_server_error(),
            });
        }

        if text.trim().is_empty() {
            return Ok(json!({}));
        }
        match serde_json::from_str(&text) {
            Ok(value) => {
                debug!(body = %truncate_for_log(&text), "parsed response body");
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "response body is not valid JSON, treating as absent");
                Ok(Value::Null)
            }
        }
    }

    /// GET a path, optionally authenticated.
    ///
    /// # Errors
    ///
    /// Propagates [`Gateway::execute`] failures.
    pub async fn get(&self, path: &str, bearer: Option<&str>) -> ApiResult<Value> {
        self.execute(Method::GET, path, bearer, None).await
    }

    /// POST a JSON body to a path, optionally authenticated.
    ///
    /// # Errors
    ///
    /// Propagates [`Gateway::execute`] failures.
    pub async fn post(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        self.execute(Method::POST, path, bearer, body).await
    }
}

/// Response bodies are logged at debug level; cap the line length.
fn truncate_for_log(text: &str) -> &str {
    const MAX: usize = 500;
    if text.len() <= MAX {
        text
    } else {
        let mut end = MAX;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }
}

/// Resolve the human-readable message for a non-2xx response.
///
/// Priority: `error` field in the parsed body, then `message`, then the raw
/// response text, then a synthesized `HTTP <status>` string.
fn error_message(status: StatusCode, raw: &str) -> String {
    if let Ok(body) = serde_json::from_str::<Value>(raw) {
        for key in ["error", "message"] {
            if let Some(msg) = body.get(key).and_then(Value::as_str) {
                if !msg.trim().is_empty() {
                    return msg.to_string();
                }
            }
        }
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed.to_string()
    }
}
