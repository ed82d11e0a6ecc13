//! Terminal rendering of the query view state.

use cityweather_core::{
    ApiSettings, CurrentConditions, ForecastEntry, Theme, ViewState, display_temperature,
};
use crossterm::style::{Color, Stylize};

const MIN_CARD_WIDTH: usize = 10;
const CARD_GAP: &str = "  ";

struct Palette {
    title: Color,
    accent: Color,
    muted: Color,
    error: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                title: Color::DarkBlue,
                accent: Color::Blue,
                muted: Color::DarkGrey,
                error: Color::DarkRed,
            },
            Theme::Dark => Self {
                title: Color::Cyan,
                accent: Color::White,
                muted: Color::Grey,
                error: Color::Red,
            },
        }
    }
}

/// Render the whole screen: header, loading line, error, conditions, forecast.
pub fn render_view(view: &ViewState, theme: Theme, settings: &ApiSettings) -> String {
    let palette = Palette::for_theme(theme);
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}\n",
        "Weather App".with(palette.title).bold(),
        format!("[{}]", theme.toggle_label()).with(palette.muted)
    ));

    if view.loading {
        out.push_str(&format!("{}\n", "Loading weather...".with(palette.muted).italic()));
    }
    if let Some(error) = &view.error {
        out.push_str(&format!("{}\n", error.as_str().with(palette.error)));
    }
    if let Some(report) = &view.report {
        out.push_str(&render_conditions(&report.conditions, &palette));
        if !report.forecast.is_empty() {
            out.push('\n');
            out.push_str(&render_forecast(&report.forecast, &palette, settings));
        }
    }

    out
}

fn render_conditions(conditions: &CurrentConditions, palette: &Palette) -> String {
    format!(
        "\n{}\n{}\n{}\n",
        conditions.location_name.as_str().with(palette.title).bold(),
        conditions.description.as_str().with(palette.muted),
        format!("{}°C", display_temperature(conditions.temperature_c)).with(palette.accent),
    )
}

/// Forecast cards side by side, one column per day.
fn render_forecast(days: &[ForecastEntry], palette: &Palette, settings: &ApiSettings) -> String {
    let widths: Vec<usize> = days
        .iter()
        .map(|d| d.description.chars().count().max(MIN_CARD_WIDTH))
        .collect();

    let mut rows: [Vec<String>; 4] = Default::default();
    for (day, &w) in days.iter().zip(&widths) {
        rows[0].push(format!("{:<w$}", day.weekday()).with(palette.title).bold().to_string());
        rows[1].push(hyperlink(&settings.icon_url(&day.icon), &format!("{:<w$}", day.icon)));
        rows[2].push(
            format!("{:<w$}", format!("{}°C", display_temperature(day.temperature_c)))
                .with(palette.accent)
                .to_string(),
        );
        rows[3].push(format!("{:<w$}", day.description).with(palette.muted).to_string());
    }

    rows.iter()
        .map(|cells| cells.join(CARD_GAP).trim_end().to_string() + "\n")
        .collect()
}

/// OSC 8 terminal hyperlink; terminals without support print just the label.
fn hyperlink(url: &str, label: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{label}\x1b]8;;\x1b\\")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cityweather_core::{Config, Report};

    fn settings() -> ApiSettings {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.resolve_api_settings(None).expect("key must resolve")
    }

    fn report() -> Report {
        let day = |d: u32, description: &str, temp: f64| ForecastEntry {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, d)
                .and_then(|date| date.and_hms_opt(12, 0, 0))
                .expect("valid date"),
            description: description.to_string(),
            temperature_c: temp,
            icon: "10d".to_string(),
        };

        Report {
            conditions: CurrentConditions {
                location_name: "Paris".into(),
                description: "light rain".into(),
                temperature_c: 11.6,
            },
            forecast: vec![day(15, "light rain", 9.5), day(16, "overcast clouds", -0.5)],
        }
    }

    #[test]
    fn empty_view_shows_only_header() {
        let out = render_view(&ViewState::default(), Theme::Light, &settings());

        assert!(out.contains("Weather App"));
        assert!(!out.contains("Loading weather..."));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn loading_and_error_lines() {
        let view = ViewState {
            loading: true,
            error: Some("City not found".into()),
            report: None,
        };

        let out = render_view(&view, Theme::Dark, &settings());
        assert!(out.contains("Loading weather..."));
        assert!(out.contains("City not found"));
        assert!(out.contains("light"));
    }

    #[test]
    fn report_renders_conditions_and_cards() {
        let view = ViewState {
            report: Some(report()),
            ..Default::default()
        };

        let out = render_view(&view, Theme::Light, &settings());
        assert!(out.contains("Paris"));
        assert!(out.contains("12°C"));
        assert!(out.contains("Mon"));
        assert!(out.contains("Tue"));
        assert!(out.contains("10°C"));
        assert!(out.contains("0°C"));
        assert!(out.contains("overcast clouds"));
        assert!(out.contains("https://openweathermap.org/img/wn/10d@2x.png"));
    }

    #[test]
    fn cards_share_one_row_per_field() {
        let palette = Palette::for_theme(Theme::Light);
        let out = render_forecast(&report().forecast, &palette, &settings());

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Mon") && lines[0].contains("Tue"));
        assert!(lines[3].contains("light rain") && lines[3].contains("overcast clouds"));
    }
}
