//! HTTP client of the public transit path search.
//!
//! Every failure ends in the synthetic walking itinerary, so handlers always
//! receive at least one alternative.

use std::time::Duration;

use saferoute_core::config::FallbackConfig;
use saferoute_core::transit::odsay::search_params;
use saferoute_core::{Itinerary, TransitQuery, transit::parse_odsay_response};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::TransitSettings;

#[derive(Debug, Error)]
pub enum TransitError {
    #[error("No transit API key configured")]
    MissingKey,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("Malformed payload: {0}")]
    Payload(#[from] saferoute_core::Error),
}

pub struct TransitClient {
    settings: TransitSettings,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl TransitClient {
    pub fn new(settings: TransitSettings) -> Self {
        Self {
            api_key: settings.resolve_api_key(),
            settings,
            client: reqwest::Client::new(),
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Requests itinerary alternatives, giving up after the configured timeout
    pub async fn fetch_itineraries(
        &self,
        query: &TransitQuery,
    ) -> Result<Vec<Itinerary>, TransitError> {
        let api_key = self.api_key.as_deref().ok_or(TransitError::MissingKey)?;
        let timeout = self.settings.timeout();

        let body = tokio::time::timeout(timeout, self.request(query, api_key))
            .await
            .map_err(|_| TransitError::Timeout(timeout))??;

        Ok(parse_odsay_response(&body, query)?)
    }

    async fn request(&self, query: &TransitQuery, api_key: &str) -> Result<String, TransitError> {
        let response = self
            .client
            .get(&self.settings.base_url)
            .query(&search_params(query))
            .query(&[("apiKey", api_key)])
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.text().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(TransitError::Api { status, message })
        }
    }

    /// Provider itineraries, or the single synthetic walking itinerary when
    /// the provider cannot deliver
    pub async fn itineraries_or_fallback(
        &self,
        query: &TransitQuery,
        fallback: &FallbackConfig,
    ) -> Vec<Itinerary> {
        match self.fetch_itineraries(query).await {
            Ok(itineraries) => {
                debug!("Transit provider returned {} itineraries", itineraries.len());
                itineraries
            }
            Err(error) => {
                warn!("Transit provider unavailable, walking the whole way: {error}");
                vec![Itinerary::fallback(query, fallback)]
            }
        }
    }
}
