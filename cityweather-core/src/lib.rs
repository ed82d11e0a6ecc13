//! Core library for the `cityweather` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherSource`] seam
//! - Display models (current conditions, daily forecast samples)
//! - The city query workflow that ties them together
//!
//! It is used by `cityweather-cli`, but can also be driven by any other front end.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod query;
pub mod theme;

pub use config::{ApiSettings, Config};
pub use error::QueryError;
pub use model::{CurrentConditions, ForecastEntry, Report, display_temperature};
pub use provider::{OpenWeatherClient, RawResponse, WeatherSource};
pub use query::{PendingQuery, Skip, Submission, ViewState, WeatherQuery};
pub use theme::Theme;
