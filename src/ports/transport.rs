//! Transport port for single calls against the tracker's HTTP API.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`ApiTransport`] to keep the trait dyn-compatible.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = RequestOutcome> + Send + 'a>>;

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read-only request.
    Get,
    /// Mutating request.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// A single request against the tracker API.
///
/// `path` is relative to the API base URL so recorded requests stay
/// independent of the host they were captured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// The HTTP method.
    pub method: Method,
    /// Path below the API base URL, starting with `/`.
    pub path: String,
    /// Query string pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<(String, String)>,
    /// Optional JSON request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// Builds a `GET` request with the given query pairs.
    #[must_use]
    pub fn get(path: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query,
            body: None,
        }
    }

    /// Builds a `POST` request carrying a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Returns `true` for requests that change tracker state.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        self.method == Method::Post
    }
}

/// Classified result of exactly one API call.
///
/// Every non-success variant keeps the diagnostic text the tracker (or the
/// network stack) produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestOutcome {
    /// 2xx response with its parsed JSON body (`null` when the body was empty).
    Success(serde_json::Value),
    /// The tracker asked us to slow down.
    RateLimited {
        /// Seconds from a `Retry-After` header, when the tracker sent one.
        #[serde(default)]
        retry_after_secs: Option<u64>,
        /// The tracker's message.
        message: String,
    },
    /// The request never produced an HTTP response (timeout, reset, DNS).
    TransientError {
        /// The network error text.
        message: String,
    },
    /// Any other 4xx/5xx response.
    PermanentError {
        /// HTTP status code.
        status: u16,
        /// The tracker's message.
        message: String,
    },
}

/// Sends single requests to the tracker and classifies the response.
///
/// Implementations never retry and never sleep; that is the caller's job.
pub trait ApiTransport: Send + Sync {
    /// Performs one HTTP call for `request`.
    fn send(&self, request: &ApiRequest) -> TransportFuture<'_>;
}
