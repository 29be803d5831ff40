//! NoteMaker CLI - list and edit notes on the managed backend from a terminal

mod cli;
mod commands;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::common::load_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notemaker=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.mode.map(Into::into))?;

    match cli.command {
        Commands::List { json } => run_list(&config, json).await?,
        Commands::Add { text } => run_add(&config, &text).await?,
        Commands::Edit { id, text } => run_edit(&config, &id, &text).await?,
        Commands::Delete { id } => run_delete(&config, &id).await?,
        Commands::Watch => run_watch(&config).await?,
    }

    Ok(())
}
