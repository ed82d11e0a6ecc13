use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::{config::ApiSettings, error::QueryError};

use super::{RawResponse, WeatherSource};

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: ApiSettings,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: ApiSettings) -> Result<Self, QueryError> {
        let http = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self { settings, http })
    }

    async fn get(&self, endpoint: &str, city: &str) -> Result<RawResponse, QueryError> {
        let url = format!("{}/{endpoint}", self.settings.base_url);

        // `query` percent-encodes every pair, so city names with spaces or
        // `&` reach the provider intact.
        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.settings.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| QueryError::Request(format!("OpenWeather {endpoint}: {e}")))?;

        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(|e| QueryError::Request(format!("OpenWeather {endpoint} body: {e}")))?;

        debug!(endpoint, status, bytes = body.len(), "provider responded");

        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<RawResponse, QueryError> {
        self.get("weather", city).await
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, city: &str) -> Result<RawResponse, QueryError> {
        self.get("forecast", city).await
    }
}
