use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// The provider reports forecasts at 3-hour granularity, so every 8th entry
/// lands on the same time of day one day later.
pub const SAMPLES_PER_DAY: usize = 8;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Present-moment weather for the queried location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub description: String,
    pub temperature_c: f64,
}

/// One sampled day of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub description: String,
    pub temperature_c: f64,
    pub icon: String,
}

impl ForecastEntry {
    /// Short `en-US` weekday label, e.g. "Mon".
    pub fn weekday(&self) -> String {
        self.timestamp.weekday().to_string()
    }
}

/// Conditions and their forecast, published together so a view never pairs
/// one city's conditions with another city's forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub conditions: CurrentConditions,
    pub forecast: Vec<ForecastEntry>,
}

/// Rounds to the nearest degree with ties toward positive infinity, so -2.5
/// displays as -2.
pub fn display_temperature(celsius: f64) -> i64 {
    let floor = celsius.floor();
    // `celsius + 0.5` rounds up for values just below one half.
    let rounded = if celsius - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Keep indices 0, 8, 16, … of the raw 3-hour series.
pub fn daily_samples<T>(entries: Vec<T>) -> Vec<T> {
    entries.into_iter().step_by(SAMPLES_PER_DAY).collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwCurrentResponse {
    name: String,
    weather: Vec<OwWeather>,
    main: OwMain,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwForecastItem {
    dt_txt: String,
    weather: Vec<OwWeather>,
    main: OwMain,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwForecastResponse {
    list: Vec<OwForecastItem>,
}

fn first_weather(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("unknown".to_string(), String::new()))
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(raw: OwCurrentResponse) -> Self {
        let (description, _) = first_weather(raw.weather);
        Self {
            location_name: raw.name,
            description,
            temperature_c: raw.main.temp,
        }
    }
}

impl TryFrom<OwForecastItem> for ForecastEntry {
    type Error = QueryError;

    fn try_from(raw: OwForecastItem) -> Result<Self, Self::Error> {
        let timestamp = NaiveDateTime::parse_from_str(&raw.dt_txt, DT_TXT_FORMAT)
            .map_err(|e| QueryError::Parse(format!("invalid dt_txt '{}': {e}", raw.dt_txt)))?;
        let (description, icon) = first_weather(raw.weather);

        Ok(Self {
            timestamp,
            description,
            temperature_c: raw.main.temp,
            icon,
        })
    }
}

/// Parse the current-conditions body.
pub fn parse_current(body: &str) -> Result<CurrentConditions, QueryError> {
    let raw: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| QueryError::Parse(format!("current conditions: {e}")))?;
    Ok(raw.into())
}

/// Parse the forecast body and down-sample it to one entry per day.
pub fn parse_daily_forecast(body: &str) -> Result<Vec<ForecastEntry>, QueryError> {
    let raw: OwForecastResponse =
        serde_json::from_str(body).map_err(|e| QueryError::Parse(format!("forecast: {e}")))?;

    daily_samples(raw.list)
        .into_iter()
        .map(ForecastEntry::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn forecast_body(n: usize) -> String {
        let list: Vec<_> = (0..n)
            .map(|i| {
                json!({
                    "dt": 1_700_000_000 + i * 10_800,
                    "dt_txt": format!("2024-01-{:02} {:02}:00:00", 15 + i / 8, (i % 8) * 3),
                    "main": { "temp": i as f64, "humidity": 50 },
                    "weather": [{ "id": 800, "description": format!("entry {i}"), "icon": "01d" }]
                })
            })
            .collect();
        json!({ "cod": "200", "cnt": n, "list": list }).to_string()
    }

    #[test]
    fn forty_entries_become_five_days() {
        let days = parse_daily_forecast(&forecast_body(40)).expect("valid forecast");

        let descriptions: Vec<_> = days.iter().map(|d| d.description.as_str()).collect();
        assert_eq!(descriptions, ["entry 0", "entry 8", "entry 16", "entry 24", "entry 32"]);
    }

    #[test]
    fn partial_day_rounds_up() {
        for (n, expected) in [(0, 0), (1, 1), (8, 1), (9, 2), (17, 3)] {
            let days = parse_daily_forecast(&forecast_body(n)).expect("valid forecast");
            assert_eq!(days.len(), expected, "n = {n}");
        }
    }

    #[test]
    fn weekday_uses_short_english_names() {
        let days = parse_daily_forecast(&forecast_body(16)).expect("valid forecast");

        // 2024-01-15 was a Monday.
        assert_eq!(days[0].weekday(), "Mon");
        assert_eq!(days[1].weekday(), "Tue");
    }

    #[test]
    fn current_takes_first_weather_entry() {
        let body = json!({
            "name": "Paris",
            "weather": [
                { "description": "light rain", "icon": "10d" },
                { "description": "mist", "icon": "50d" }
            ],
            "main": { "temp": 11.6, "feels_like": 10.2 }
        })
        .to_string();

        let current = parse_current(&body).expect("valid current");
        assert_eq!(current.location_name, "Paris");
        assert_eq!(current.description, "light rain");
        assert_eq!(current.temperature_c, 11.6);
    }

    #[test]
    fn missing_weather_entry_is_unknown() {
        let body = json!({ "name": "Nowhere", "weather": [], "main": { "temp": 0.0 } }).to_string();

        let current = parse_current(&body).expect("valid current");
        assert_eq!(current.description, "unknown");
    }

    #[test]
    fn malformed_forecast_is_parse_error() {
        let err = parse_daily_forecast(r#"{"cod":"404","message":"city not found"}"#).unwrap_err();
        assert!(matches!(err, QueryError::Parse(_)));

        let bad_ts = json!({
            "list": [{ "dt_txt": "yesterday", "weather": [], "main": { "temp": 1.0 } }]
        })
        .to_string();
        let err = parse_daily_forecast(&bad_ts).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn temperatures_round_half_up() {
        assert_eq!(display_temperature(11.6), 12);
        assert_eq!(display_temperature(2.5), 3);
        assert_eq!(display_temperature(-2.5), -2);
        assert_eq!(display_temperature(-2.6), -3);
        assert_eq!(display_temperature(0.499_999_999_999_999_94), 0);
        assert_eq!(display_temperature(-0.499_999_999_999_999_94), 0);
        assert_eq!(display_temperature(-0.5), 0);
    }
}
