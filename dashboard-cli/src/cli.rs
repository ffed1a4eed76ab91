use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{Config, Engine, ProviderId, sources_from_config};
use inquire::Password;
use tracing::info;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about = "Weather intelligence dashboard")]
pub struct Cli {
    /// Log source calls and timings to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name: "openweather" or "newsapi".
        provider: String,
    },

    /// Show weather, forecast, air quality and news for a city.
    Show {
        /// City or place name.
        city: String,

        /// Print the raw dashboard JSON instead of the text view.
        #[arg(long)]
        json: bool,

        /// Also write the dashboard JSON to this file.
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city, json, export } => show(&city, json, export).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let prompt = format!("API key for {id}:");
    let api_key = Password::new(&prompt)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!("Saved credentials for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: &str, json: bool, export: Option<PathBuf>) -> anyhow::Result<()> {
    let city = city.trim();
    if city.is_empty() {
        anyhow::bail!("City must not be empty");
    }

    let config = Config::load()?;
    let engine = Engine::new(sources_from_config(&config)?, config.timeouts);

    let result = engine.aggregate(city).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::dashboard(&result, chrono::Utc::now()));
    }

    if let Some(path) = export {
        let body = serde_json::to_string_pretty(&result)
            .context("Failed to serialize dashboard to JSON")?;
        fs::write(&path, body)
            .with_context(|| format!("Failed to write export file: {}", path.display()))?;
        info!(path = %path.display(), "dashboard exported");
    }

    Ok(())
}
