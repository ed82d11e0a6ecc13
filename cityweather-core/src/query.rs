//! The city query workflow.
//!
//! A [`WeatherQuery`] owns everything the view renders: the loading flag, the
//! last error message and the last [`Report`]. Submitting a city clears all
//! three, fetches current conditions and the forecast concurrently, and then
//! publishes either a complete report or a single error message.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::{
    error::QueryError,
    model::{Report, parse_current, parse_daily_forecast},
    provider::{RawResponse, WeatherSource},
};

/// Why a submission did not start a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Nothing left after trimming.
    Empty,
    /// Same city (ignoring case) as the last successful fetch.
    Duplicate,
    /// Another fetch has not settled yet.
    InFlight,
}

/// Result of [`WeatherQuery::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Skipped(Skip),
    Fetched,
    Failed(String),
}

/// What the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub loading: bool,
    pub error: Option<String>,
    pub report: Option<Report>,
}

#[derive(Debug, Default)]
struct QueryState {
    view: ViewState,
    last_city: Option<String>,
}

#[derive(Debug)]
pub struct WeatherQuery<S> {
    source: S,
    state: Mutex<QueryState>,
}

impl<S: WeatherSource> WeatherQuery<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(QueryState::default()),
        }
    }

    /// Current view state, read under a single lock.
    pub fn snapshot(&self) -> ViewState {
        self.lock().view.clone()
    }

    /// Last city fetched successfully, as it was sent to the provider.
    pub fn last_city(&self) -> Option<String> {
        self.lock().last_city.clone()
    }

    /// Validate `input` and enter the loading state.
    ///
    /// On success the previous error and report are cleared and the returned
    /// [`PendingQuery`] keeps the loading flag set until it is completed or
    /// dropped.
    pub fn begin(&self, input: &str) -> Result<PendingQuery<'_, S>, Skip> {
        let city = input.trim();
        let mut state = self.lock();

        if city.is_empty() {
            return Err(Skip::Empty);
        }
        if state.last_city.as_deref().is_some_and(|last| same_city(last, city)) {
            debug!(city, "same as last fetched city");
            return Err(Skip::Duplicate);
        }
        if state.view.loading {
            debug!(city, "fetch already in flight");
            return Err(Skip::InFlight);
        }

        state.view = ViewState {
            loading: true,
            error: None,
            report: None,
        };

        Ok(PendingQuery {
            query: self,
            city: city.to_string(),
        })
    }

    /// [`begin`](Self::begin) and [`complete`](PendingQuery::complete) in one call.
    pub async fn submit(&self, input: &str) -> Submission {
        let pending = match self.begin(input) {
            Ok(pending) => pending,
            Err(skip) => return Submission::Skipped(skip),
        };

        match pending.complete().await {
            Ok(()) => Submission::Fetched,
            Err(err) => Submission::Failed(err.to_string()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A submission that passed validation and holds the loading flag.
#[derive(Debug)]
pub struct PendingQuery<'a, S: WeatherSource> {
    query: &'a WeatherQuery<S>,
    city: String,
}

impl<S: WeatherSource> PendingQuery<'_, S> {
    /// Trimmed city that will be sent to the provider.
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Fetch both endpoints, wait for both to settle, and publish the outcome.
    pub async fn complete(self) -> Result<(), QueryError> {
        let source = &self.query.source;
        let (current, forecast) = tokio::join!(
            source.fetch_current(&self.city),
            source.fetch_forecast(&self.city),
        );
        let outcome = resolve(current, forecast);

        let mut state = self.query.lock();
        state.view.loading = false;

        match outcome {
            Ok(report) => {
                info!(
                    city = %self.city,
                    location = %report.conditions.location_name,
                    days = report.forecast.len(),
                    "weather published"
                );
                state.view.report = Some(report);
                state.last_city = Some(self.city.clone());
                Ok(())
            }
            Err(err) => {
                warn!(city = %self.city, error = %err, "weather query failed");
                state.view.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

impl<S: WeatherSource> Drop for PendingQuery<'_, S> {
    fn drop(&mut self) {
        // Covers futures dropped mid-flight as well as normal completion.
        self.query.lock().view.loading = false;
    }
}

fn resolve(
    current: Result<RawResponse, QueryError>,
    forecast: Result<RawResponse, QueryError>,
) -> Result<Report, QueryError> {
    let current = current?;
    if !current.is_success() {
        return Err(QueryError::CityNotFound);
    }

    let forecast = forecast?;
    if !forecast.is_success() {
        return Err(QueryError::ForecastUnavailable {
            status: forecast.status,
        });
    }

    Ok(Report {
        conditions: parse_current(&current.body)?,
        forecast: parse_daily_forecast(&forecast.body)?,
    })
}

fn same_city(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
