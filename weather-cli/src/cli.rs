use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use std::path::PathBuf;
use weather_core::{App, Changed, Config};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "City weather lookup")]
pub struct Cli {
    /// Read settings from this file instead of the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit settings interactively and save them.
    Configure,

    /// List location suggestions for a search text.
    Search {
        /// City name, at least two characters.
        text: String,
    },

    /// Show current weather for the best match of a city name.
    Show {
        /// City name, at least two characters.
        city: String,

        /// Choose among the suggestions instead of taking the first.
        #[arg(long)]
        pick: bool,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search-as-you-type session reading lines from stdin.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command {
            Command::Configure => configure(config, self.config),
            Command::Search { text } => {
                let app = lookup(&config, &text).await?;
                println!("{}", render::suggestions(app.search()));
                Ok(())
            }
            Command::Show { city, pick, json } => show(&config, &city, pick, json).await,
            Command::Interactive => interactive::run(App::from_config(&config)?).await,
        }
    }
}

/// Run one search through the session and wait for its suggestions.
async fn lookup(config: &Config, text: &str) -> Result<App> {
    let mut app = App::from_config(config)?;
    app.on_input_change(text);

    if !app.search().is_loading {
        bail!(
            "Search text must be at least {} characters long.",
            config.min_query_chars
        );
    }

    wait_for(&mut app, Changed::Suggestions).await?;

    Ok(app)
}

async fn wait_for(app: &mut App, wanted: Changed) -> Result<()> {
    loop {
        match app.next_update().await {
            Some(changed) if changed == wanted => return Ok(()),
            Some(_) => continue,
            None => bail!("Session ended before {wanted:?} arrived"),
        }
    }
}

async fn show(config: &Config, city: &str, pick: bool, json: bool) -> Result<()> {
    let mut app = lookup(config, city).await?;

    if app.search().candidates.is_empty() {
        bail!("No locations found for '{city}'.");
    }

    if pick {
        let options: Vec<String> = app.search().candidates.iter().map(ToString::to_string).collect();
        let choice = Select::new("Location:", options)
            .raw_prompt()
            .context("Location selection aborted")?;
        app.select_suggestion(choice.index);
    } else {
        app.submit();
    }

    wait_for(&mut app, Changed::Weather).await?;

    let state = app.weather();
    match (&state.snapshot, &state.error_message) {
        (Some(snap), _) if json => {
            println!(
                "{}",
                serde_json::to_string_pretty(snap).context("Failed to serialize weather")?
            );
        }
        (Some(_), _) => println!("{}", render::weather_state(state)),
        (None, Some(err)) => bail!("{err}"),
        (None, None) => bail!("No weather data received."),
    }

    Ok(())
}

fn configure(mut config: Config, path: Option<PathBuf>) -> Result<()> {
    let geocoding_url = Text::new("Geocoding URL:")
        .with_default(&config.geocoding_url)
        .prompt()?;
    let forecast_url = Text::new("Forecast URL:")
        .with_default(&config.forecast_url)
        .prompt()?;
    let language = Text::new("Language for place names:")
        .with_default(&config.language)
        .prompt()?;

    config.geocoding_url = geocoding_url;
    config.forecast_url = forecast_url;
    config.language = language;
    config.suggestion_count = CustomType::<usize>::new("Suggestions per search:")
        .with_default(config.suggestion_count)
        .prompt()?;
    config.debounce_ms = CustomType::<u64>::new("Debounce (ms):")
        .with_default(config.debounce_ms)
        .prompt()?;
    config.min_query_chars = CustomType::<usize>::new("Minimum search length:")
        .with_default(config.min_query_chars)
        .prompt()?;

    config.validate()?;

    let saved = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };
    println!("Saved configuration to {}", saved.display());

    Ok(())
}
