use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use weather_core::{
    Action, Config, ScreenRuntime, ScreenSettings, ScreenView, WeatherProvider,
    provider_from_config, view::parse_locale,
};

use crate::{app, logging, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and forecast with city search")]
pub struct Cli {
    /// Defaults to `screen` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive weather screen.
    Screen {
        /// City to show first instead of the configured default.
        #[arg(long)]
        city: Option<String>,
    },

    /// Store the weatherapi.com API key and default city.
    Configure,

    /// Print the forecast for a city once and exit.
    Show {
        city: String,

        /// Forecast horizon in days; defaults to the configured value.
        #[arg(long)]
        days: Option<u8>,
    },

    /// List locations matching a query.
    Search { query: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Screen { city: None }) {
            Command::Screen { city } => {
                let config = Config::load()?;
                let log_path = logging::init_file(Config::data_dir()?)?;
                tracing::info!(log = %log_path.display(), "starting weather screen");
                app::run(config, city).await
            }
            Command::Configure => {
                logging::init_stderr()?;
                configure()
            }
            Command::Show { city, days } => {
                logging::init_stderr()?;
                show(city, days).await
            }
            Command::Search { query } => {
                logging::init_stderr()?;
                search(&query).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("weatherapi.com API key:")
        .without_confirmation()
        .prompt()
        .context("API key prompt aborted")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key.trim().to_string());

    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Default city prompt aborted")?;
    config.default_city = city.trim().to_string();

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Runs the same mount flow as the screen, then prints the resulting view.
async fn show(city: String, days: Option<u8>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);

    let mut settings = ScreenSettings::from(&config);
    settings.default_city = city;
    if let Some(days) = days {
        settings.forecast_days = days;
    }

    let mut runtime = ScreenRuntime::new(provider, settings);
    runtime.dispatch(Action::Mount);
    runtime.apply_next_completion().await;

    let view = ScreenView::from_state(runtime.state(), parse_locale(&config.locale));
    for line in render::plain_lines(&view) {
        println!("{line}");
    }

    if let ScreenView::Error { message, .. } = view {
        bail!("{message}");
    }
    Ok(())
}

async fn search(query: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    if query.chars().count() < config.min_query_len {
        bail!("Query must be at least {} characters", config.min_query_len);
    }

    let provider = provider_from_config(&config)?;
    let locations = provider.fetch_locations(query).await?;

    if locations.is_empty() {
        println!("No matching locations");
    }
    for loc in locations {
        println!("{}\t({})", loc.display_name(), loc.region);
    }
    Ok(())
}
