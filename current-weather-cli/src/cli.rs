use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use current_weather::{LocationSelector, ReqwestTransport, WeatherClient};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::debug;

use crate::{render, settings::Settings};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather from OpenWeatherMap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key (and optionally a custom endpoint).
    Configure,

    /// Current weather for a city, e.g. "London" or "London,uk".
    City {
        name: String,

        #[command(flatten)]
        opts: FetchOpts,
    },

    /// Current weather for a latitude/longitude pair.
    Coords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        #[command(flatten)]
        opts: FetchOpts,
    },

    /// Current weather for a postal code, e.g. "94040,us".
    Zip {
        code: String,

        #[command(flatten)]
        opts: FetchOpts,
    },
}

#[derive(Debug, Args)]
pub struct FetchOpts {
    /// Use this API key instead of the stored one.
    #[arg(long)]
    pub api_key: Option<String>,

    /// Print the decoded response as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::City { name, opts } => {
                let label = name.clone();
                show(LocationSelector::ByCity(name), &label, opts).await
            }
            Command::Coords { lat, lon, opts } => {
                show(LocationSelector::ByCoordinates { lat, lon }, &format!("{lat}, {lon}"), opts)
                    .await
            }
            Command::Zip { code, opts } => {
                let label = code.clone();
                show(LocationSelector::ByZipCode(code), &label, opts).await
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut settings = Settings::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let base_url = Text::new("Endpoint (leave empty for the public API):")
        .with_default(settings.base_url.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read endpoint")?;

    settings.api_key = Some(api_key.trim().to_string());
    settings.base_url = Some(base_url.trim().to_string()).filter(|url| !url.is_empty());

    // Reject an unusable endpoint now rather than on the next lookup.
    build_client(&settings, None)?;

    let path = settings.save()?;
    println!("Saved settings to {}", path.display());
    Ok(())
}

async fn show(selector: LocationSelector, label: &str, opts: FetchOpts) -> Result<()> {
    let settings = Settings::load()?;
    debug!(?settings, "Loaded settings");
    let client = build_client(&settings, opts.api_key)?;

    let data = client
        .spawn(selector)
        .await
        .with_context(|| format!("Failed to fetch weather for {label}"))?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!("{}", render::human(label, &data));
    }
    Ok(())
}

fn build_client(settings: &Settings, api_key: Option<String>) -> Result<WeatherClient> {
    let api_key = settings.resolve_api_key(api_key)?;
    let transport = ReqwestTransport::with_timeout(settings.timeout())?;

    let mut builder = WeatherClient::builder(api_key).transport(transport);
    if let Some(base_url) = &settings.base_url {
        builder = builder.base_url(base_url.as_str());
    }

    Ok(builder.build()?)
}
