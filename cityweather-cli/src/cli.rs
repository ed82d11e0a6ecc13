use anyhow::{Context, anyhow};
use cityweather_core::{ApiSettings, Config, OpenWeatherClient, Skip, Theme, WeatherQuery};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use tracing::debug;

use crate::render::render_view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather and a 5-day forecast by city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Prompt for cities until `:quit` (the default).
    Interactive {
        /// Start in dark mode.
        #[arg(long)]
        dark: bool,
    },

    /// Show weather for a single city and exit.
    Show {
        /// City name, e.g. "Paris" or "New York".
        city: String,

        /// Use the dark palette.
        #[arg(long)]
        dark: bool,

        /// Print the report as JSON instead.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command.unwrap_or(Command::Interactive { dark: false }) {
            Command::Configure => configure(&mut config),
            Command::Interactive { dark } => {
                let theme = Theme::from_dark_mode(dark || config.dark_mode);
                interactive(config.api_settings()?, theme).await
            }
            Command::Show { city, dark, json } => {
                let theme = Theme::from_dark_mode(dark || config.dark_mode);
                show(config.api_settings()?, &city, theme, json).await
            }
        }
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(settings: ApiSettings, city: &str, theme: Theme, json: bool) -> anyhow::Result<()> {
    let query = WeatherQuery::new(OpenWeatherClient::new(settings.clone())?);

    let pending = query.begin(city).map_err(|_| anyhow!("City name must not be empty"))?;
    pending
        .complete()
        .await
        .with_context(|| format!("No weather for '{}'", city.trim()))?;

    let view = query.snapshot();
    if json {
        let report = view.report.context("Query finished without a report")?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_view(&view, theme, &settings));
    }

    Ok(())
}

async fn interactive(settings: ApiSettings, mut theme: Theme) -> anyhow::Result<()> {
    let query = WeatherQuery::new(OpenWeatherClient::new(settings.clone())?);
    print!("{}", render_view(&query.snapshot(), theme, &settings));

    loop {
        let input = match Text::new("Enter city")
            .with_help_message(":theme toggles light/dark, :quit exits")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        match input.trim() {
            ":quit" | ":q" => break,
            ":theme" => {
                theme.toggle();
                debug!(%theme, "theme toggled");
                print!("{}", render_view(&query.snapshot(), theme, &settings));
                continue;
            }
            _ => {}
        }

        let pending = match query.begin(&input) {
            Ok(pending) => pending,
            Err(Skip::Duplicate) => {
                debug!(city = input.trim(), "same as last fetched city");
                continue;
            }
            Err(skip) => {
                debug!(?skip, "submission ignored");
                continue;
            }
        };

        print!("{}", render_view(&query.snapshot(), theme, &settings));
        if let Err(err) = pending.complete().await {
            debug!(%err, "query failed");
        }
        print!("{}", render_view(&query.snapshot(), theme, &settings));
    }

    Ok(())
}
