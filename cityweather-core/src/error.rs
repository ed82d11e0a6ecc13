use thiserror::Error;

/// Everything that can go wrong while answering a city query.
///
/// The view only ever shows the `Display` text; the variants exist so callers
/// and tests can tell the failure sites apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The current-conditions endpoint answered with a non-2xx status.
    #[error("City not found")]
    CityNotFound,

    /// The forecast endpoint answered with a non-2xx status.
    #[error("Forecast unavailable (HTTP {status})")]
    ForecastUnavailable { status: u16 },

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Request(String),

    /// A response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}
