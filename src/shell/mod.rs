//! Input/output shells
//!
//! A shell reads window strings and renders reports. The console shell drives
//! a terminal (one-shot or interactive prompt); the JSON shell serves
//! dashboard consumers. Both go through the same [`run_session`] loop.

pub mod console;
pub mod json;
pub mod readline;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::info;

use crate::error::PipelineError;
use crate::pipeline::{self, ProgressEvent, Report};
use crate::sources::SeriesFetcher;

pub use console::ConsoleShell;
pub use json::JsonShell;

pub trait Shell {
    /// Next window string; `None` ends the session
    fn read_window(&mut self) -> Result<Option<String>>;

    fn show_table(&mut self, report: &Report) -> Result<()>;

    fn show_chart(&mut self, report: &Report) -> Result<()>;

    /// Blocking condition for the current run
    fn warn(&mut self, err: &PipelineError) -> Result<()>;

    fn on_progress(&mut self, _event: &ProgressEvent) {}

    /// Called once the pipeline returns, whatever the outcome
    fn end_progress(&mut self) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub reports: usize,
    pub failures: usize,
}

/// Read windows from `shell` until it runs dry, rendering one report per window
pub async fn run_session<S: Shell>(
    shell: &mut S,
    fetcher: &SeriesFetcher,
    today: NaiveDate,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    while let Some(input) = shell.read_window()? {
        let result =
            pipeline::run_with_progress(fetcher, &input, today, |ev| shell.on_progress(&ev)).await;
        shell.end_progress();

        match result {
            Ok(report) => {
                info!(
                    "Report ready: {} months, {} columns",
                    report.table.len(),
                    report.table.columns().len()
                );
                shell.show_table(&report)?;
                shell.show_chart(&report)?;
                summary.reports += 1;
            }
            Err(e) => {
                shell.warn(&e)?;
                summary.failures += 1;
            }
        }
    }

    Ok(summary)
}
