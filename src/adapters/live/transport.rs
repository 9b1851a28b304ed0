//! Live adapter for the `ApiTransport` port using `reqwest`.

use std::time::Duration;

use reqwest::header::{ACCEPT, RETRY_AFTER, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::ports::transport::{ApiRequest, ApiTransport, Method, RequestOutcome, TransportFuture};
use crate::tracker::classify::classify;

const ACCEPT_HEADER: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Live transport that calls the tracker's REST API.
pub struct LiveTransport {
    client: Client,
    api_url: String,
    token: String,
    user_agent: String,
}

impl LiveTransport {
    /// Creates a transport authenticated with the configured token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &TrackerConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            user_agent: config.user_agent(),
        })
    }
}

impl ApiTransport for LiveTransport {
    fn send(&self, request: &ApiRequest) -> TransportFuture<'_> {
        let url = format!("{}{}", self.api_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .bearer_auth(&self.token)
        .header(ACCEPT, ACCEPT_HEADER)
        .header(USER_AGENT, &self.user_agent)
        .header(API_VERSION_HEADER, API_VERSION);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let label = format!("{} {}", request.method, request.path);

        Box::pin(async move {
            debug!(request = %label, "sending");
            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) => {
                    return RequestOutcome::TransientError {
                        message: format!("{label}: {e}"),
                    }
                }
            };

            let status = response.status().as_u16();
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    return RequestOutcome::TransientError {
                        message: format!("{label}: failed to read response body: {e}"),
                    }
                }
            };

            debug!(request = %label, status, "received");
            classify(status, retry_after, &text)
        })
    }
}
