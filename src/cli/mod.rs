use clap::Parser;

pub mod formatters;

#[derive(Parser, Debug)]
#[command(name = "indicadores")]
#[command(
    version,
    about = "Accumulated Brazilian economic indicators over a trailing window"
)]
#[command(
    long_about = "Fetches IGP-M, INCC, IPCA, CDI and savings yield from the Central Bank SGS API plus Ibovespa and USD/BRL from Yahoo Finance, aligns them month by month and shows how much each one accumulated over the chosen window."
)]
pub struct Cli {
    /// Month count (12, 24, ..., 120) or start month like 'jun/24'.
    /// Omit it to start the interactive prompt.
    pub window: Option<String>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output the report as JSON (requires WINDOW)
    #[arg(long = "json", global = true, requires = "window")]
    pub json: bool,

    /// Compute the window as if today were this date (YYYY-MM-DD)
    #[arg(long = "as-of", value_parser = parse_as_of)]
    pub as_of: Option<chrono::NaiveDate>,
}

fn parse_as_of(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date in YYYY-MM-DD format", s))
}
