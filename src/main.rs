use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::io;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use indicadores::cli::Cli;
use indicadores::config::Settings;
use indicadores::shell::readline::Readline;
use indicadores::shell::{run_session, ConsoleShell, JsonShell};
use indicadores::sources::SeriesFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for reports
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color || cli.json {
        colored::control::set_override(false);
    }

    let settings = Settings::load()?;
    debug!("Settings: {:?}", settings);
    let fetcher = SeriesFetcher::new(&settings)?;
    let today = cli.as_of.unwrap_or_else(|| Local::now().date_naive());

    let one_shot = cli.window.is_some();
    let summary = match cli.window {
        Some(window) if cli.json => {
            let mut shell = JsonShell::new(window, io::stdout());
            run_session(&mut shell, &fetcher, today).await?
        }
        Some(window) => {
            let mut shell = ConsoleShell::once(window, io::stdout());
            run_session(&mut shell, &fetcher, today).await?
        }
        None => {
            let candidates = ConsoleShell::<io::Stdout>::prompt_candidates();
            let candidates: Vec<&str> = candidates.iter().map(String::as_str).collect();
            let readline = Readline::new(&candidates, settings.history_path())?;
            let mut shell = ConsoleShell::interactive(readline, io::stdout())?;
            run_session(&mut shell, &fetcher, today).await?
        }
    };

    // A blocking warning in one-shot mode is a failed run
    if one_shot && summary.failures > 0 {
        std::process::exit(1);
    }

    Ok(())
}
