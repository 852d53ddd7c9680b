use async_trait::async_trait;
use log::debug;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::holding::{HoldingRecord, HoldingsEnvelope};
use crate::models::settings::Settings;
use super::traits::HoldingsSource;

/// Holdings endpoint reached over HTTP(S).
///
/// - **Method**: a single `GET` on the configured URL, no auth.
/// - **Payload**: `{ "data": { "userHolding": [ ... ] } }`, see [`parse_holdings_payload`].
/// - **Timeout**: 30s unless configured otherwise (native only).
pub struct HttpHoldingsSource {
    client: Client,
    endpoint: String,
}

impl HttpHoldingsSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(endpoint, 30)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_timeout(settings.endpoint_url.clone(), settings.request_timeout_secs)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HoldingsSource for HttpHoldingsSource {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_holdings(&self) -> Result<Vec<HoldingRecord>, CoreError> {
        debug!("GET holdings from {}", self.endpoint);

        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::HttpStatus {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let body = response.text().await?;
        parse_holdings_payload(&body)
    }
}

/// Decode a holdings document into records.
///
/// A blank body, a JSON `null`, or a document whose `data` / `userHolding`
/// is missing or null is [`CoreError::EmptyResponse`]. An explicit empty
/// `userHolding` array is a valid, empty portfolio. Every record is
/// validated; one bad record rejects the whole payload.
pub fn parse_holdings_payload(body: &str) -> Result<Vec<HoldingRecord>, CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::EmptyResponse);
    }

    let envelope: Option<HoldingsEnvelope> = serde_json::from_str(body)?;

    let remote = envelope
        .and_then(|e| e.data)
        .and_then(|d| d.user_holding)
        .ok_or(CoreError::EmptyResponse)?;

    let holdings: Vec<HoldingRecord> = remote.into_iter().map(HoldingRecord::from).collect();
    for holding in &holdings {
        holding.validate()?;
    }
    Ok(holdings)
}
