//! Blocking HTTP transport

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use super::{ChatRequest, ChatResponse, ChatTransport};
use crate::error::{Error, Result};

/// [`ChatTransport`] over a pooled blocking HTTP client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl ChatTransport for HttpTransport {
    fn send(&self, endpoint: &Url, api_key: &str, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(endpoint.clone())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .map_err(|e| Error::Transport(format!("request to {endpoint} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Error::Transport(format!("{endpoint} returned {status}: {body}")));
        }

        response
            .json::<ChatResponse>()
            .map_err(|e| Error::Transport(format!("invalid response from {endpoint}: {e}")))
    }
}
