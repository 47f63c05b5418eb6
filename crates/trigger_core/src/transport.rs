use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::ScraperRunRequest;
use url::Url;

use crate::{config::TriggerSettings, error::TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerResponse {
    pub status: u16,
}

impl TriggerResponse {
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[async_trait]
pub trait ScraperTransport: Send + Sync {
    /// Sends one run request. Any HTTP status is an `Ok`; only requests that
    /// never got a status are errors.
    async fn trigger(&self, request: &ScraperRunRequest)
        -> Result<TriggerResponse, TransportError>;
}

pub struct HttpScraperTransport {
    http: Client,
    endpoint: Url,
}

impl HttpScraperTransport {
    pub fn new(settings: &TriggerSettings) -> Result<Self, TransportError> {
        let endpoint = settings.endpoint_url()?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ScraperTransport for HttpScraperTransport {
    async fn trigger(
        &self,
        request: &ScraperRunRequest,
    ) -> Result<TriggerResponse, TransportError> {
        // The response body is never read.
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        Ok(TriggerResponse {
            status: response.status().as_u16(),
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
