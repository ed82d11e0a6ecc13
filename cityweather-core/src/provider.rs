use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::QueryError;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Status and body of a settled request, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two endpoints the query workflow talks to.
///
/// Implementations return whatever the provider answered; an `Err` means the
/// request never settled with a response.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<RawResponse, QueryError>;

    async fn fetch_forecast(&self, city: &str) -> Result<RawResponse, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_2xx_is_success() {
        let ok = |status| RawResponse { status, body: String::new() }.is_success();

        assert!(ok(200));
        assert!(ok(204));
        assert!(!ok(301));
        assert!(!ok(404));
        assert!(!ok(500));
    }
}
