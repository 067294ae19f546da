//! `absentia` - CLI for the district absenteeism dashboard
//!
//! This binary provides the interactive dashboard plus one-shot search and
//! lookup commands over the same dataset pipeline.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::debug;

use absentia::cli::{
    Cli, Command, ConfigCommand, DashCommand, OutputFormat, SearchCommand, ShowCommand,
};
use absentia::history::RateHistory;
use absentia::search::{self, MIN_QUERY_LEN, NO_MATCH_PLACEHOLDER};
use absentia::{init_logging, ui, Config, Dataset, Error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command; the dashboard is the default
    match cli.command.unwrap_or(Command::Dash(DashCommand::default())) {
        Command::Dash(cmd) => handle_dash(&config, cmd).await,
        Command::Search(cmd) => handle_search(&config, cmd).await,
        Command::Show(cmd) => handle_show(&config, cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_dash(config: &Config, cmd: DashCommand) -> anyhow::Result<()> {
    let path = cmd.dataset.unwrap_or_else(|| config.dataset_path());
    debug!("loading dataset from {}", path.display());

    // The load runs once, concurrently with the event loop; its outcome
    // arrives over the channel
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let outcome = Dataset::load(&path).await;
        // The loop may have exited already; a dropped receiver is fine
        let _ = tx.send(outcome).await;
    });

    ui::run(config, rx).await?;
    Ok(())
}

async fn load_dataset(config: &Config, override_path: Option<PathBuf>) -> anyhow::Result<Dataset> {
    let path = override_path.unwrap_or_else(|| config.dataset_path());
    debug!("loading dataset from {}", path.display());
    Ok(Dataset::load(&path).await?)
}

async fn handle_search(config: &Config, cmd: SearchCommand) -> anyhow::Result<()> {
    if !search::is_searchable(&cmd.query) {
        anyhow::bail!("query must be at least {MIN_QUERY_LEN} characters");
    }

    let dataset = load_dataset(config, cmd.dataset).await?;
    let matches = search::search(dataset.records(), &cmd.query);

    match cmd.format {
        OutputFormat::Plain => {
            if matches.is_empty() {
                println!("{NO_MATCH_PLACEHOLDER}");
            } else {
                for record in &matches {
                    println!("{}", record.name);
                }
            }
        }
        OutputFormat::Table => {
            if matches.is_empty() {
                println!("{NO_MATCH_PLACEHOLDER}");
            } else {
                println!("{:>4}  District", "#");
                for (i, record) in matches.iter().enumerate() {
                    println!("{:>4}  {}", i + 1, record.name);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
    }
    Ok(())
}

async fn handle_show(config: &Config, cmd: ShowCommand) -> anyhow::Result<()> {
    if cmd.name.trim().is_empty() {
        anyhow::bail!("district name must not be empty");
    }

    let dataset = load_dataset(config, cmd.dataset).await?;
    let matches = search::search(dataset.records(), &cmd.name);
    let record = matches
        .first()
        .ok_or_else(|| Error::district_not_found(&cmd.name))?;
    let history = RateHistory::derive(record);

    match cmd.format {
        OutputFormat::Plain => {
            for row in &history.rows {
                println!("{}: {}", row.period, row.value);
            }
        }
        OutputFormat::Table => {
            println!("{}", history.district);
            println!("{:<12}  {:>8}", "School Year", "Rate");
            for row in &history.rows {
                println!("{:<12}  {:>8}", row.period, row.value);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Dataset]");
                println!("  Path:      {}", config.dataset_path().display());
                println!();
                println!("[UI]");
                println!("  Tick:      {} ms", config.ui.tick_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
