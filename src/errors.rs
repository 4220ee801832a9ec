// ABOUTME: Unified error taxonomy for client API operations
// ABOUTME: Transport failures, non-2xx responses with status codes, parse and session errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use thiserror::Error;

/// Errors produced by client operations.
///
/// Non-2xx responses always surface as [`ApiError::Api`] with the HTTP
/// status attached; callers own presentation and any retry decision.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure before a response was received
    #[error("network error: {0}")]
    Network(String),

    /// Backend responded outside the 2xx range
    #[error("API request failed with status {status_code}: {message}")]
    Api {
        /// HTTP status code of the response
        status_code: u16,
        /// Human-readable message resolved from the response body
        message: String,
        /// Whether the failure class is worth retrying (server errors)
        retryable: bool,
    },

    /// A typed operation could not deserialize its response
    #[error("failed to parse {endpoint} response")]
    Parse {
        /// Operation whose response was malformed
        endpoint: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Token store read or write failed
    #[error("session storage error: {0}")]
    Session(String),

    /// Client configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status attached to this error, where one exists.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the operation.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { retryable, .. } => *retryable,
            Self::Network(_) => true,
            _ => false,
        }
    }

    /// True for a 401 response, the signal to drop the session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Result type alias for client operations
pub type ApiResult<T> = Result<T, ApiError>;
