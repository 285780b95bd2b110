use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use std::io::Write;
use std::time::Duration;

use super::readline::Readline;
use super::Shell;
use crate::cli::formatters::{format_chart, format_report_table, format_warning, CHART_WIDTH};
use crate::error::PipelineError;
use crate::pipeline::{ProgressEvent, Report};
use crate::window::ALLOWED_MONTH_COUNTS;

const PROMPT: &str = "window> ";

const MONTH_CANDIDATES: [&str; 12] = [
    "jan/", "feb/", "mar/", "apr/", "may/", "jun/", "jul/", "aug/", "sep/", "oct/", "nov/", "dec/",
];

enum WindowInput {
    /// Window given on the command line; consumed by the first read
    Once(Option<String>),
    Prompt(Box<Readline>),
}

/// Terminal shell: tables with `tabled`, bar chart as text, spinner while fetching
pub struct ConsoleShell<W: Write> {
    input: WindowInput,
    out: W,
    spinner: Option<ProgressBar>,
    show_spinner: bool,
}

impl<W: Write> ConsoleShell<W> {
    /// Render a single report for `window`
    pub fn once(window: String, out: W) -> Self {
        Self {
            input: WindowInput::Once(Some(window)),
            out,
            spinner: None,
            show_spinner: true,
        }
    }

    /// Prompt for windows until `quit` or end of input
    pub fn interactive(readline: Readline, mut out: W) -> Result<Self> {
        writeln!(out, "{}", "Indicadores - Interactive Mode".bold())?;
        writeln!(
            out,
            "Type a month count ({}) or a start month like {}; {} to exit\n",
            ALLOWED_MONTH_COUNTS
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            "jun/24".cyan(),
            "quit".cyan()
        )?;

        Ok(Self {
            input: WindowInput::Prompt(Box::new(readline)),
            out,
            spinner: None,
            show_spinner: true,
        })
    }

    /// Completion candidates for the interactive prompt
    pub fn prompt_candidates() -> Vec<String> {
        ALLOWED_MONTH_COUNTS
            .iter()
            .map(|c| c.to_string())
            .chain(MONTH_CANDIDATES.iter().map(|m| m.to_string()))
            .chain(["quit".to_string(), "exit".to_string()])
            .collect()
    }

    pub fn without_spinner(mut self) -> Self {
        self.show_spinner = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Shell for ConsoleShell<W> {
    fn read_window(&mut self) -> Result<Option<String>> {
        let readline = match &mut self.input {
            WindowInput::Once(window) => return Ok(window.take()),
            WindowInput::Prompt(readline) => readline,
        };

        loop {
            match readline.readline(PROMPT) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if matches!(trimmed, "quit" | "exit" | "/quit" | "/exit") {
                        writeln!(self.out, "Goodbye!")?;
                        return Ok(None);
                    }
                    return Ok(Some(trimmed.to_string()));
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    writeln!(self.out, "^C")?;
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    writeln!(self.out, "Goodbye!")?;
                    return Ok(None);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn show_table(&mut self, report: &Report) -> Result<()> {
        write!(self.out, "{}", format_report_table(report))?;
        Ok(())
    }

    fn show_chart(&mut self, report: &Report) -> Result<()> {
        writeln!(self.out, "{}", format_chart(report, CHART_WIDTH))?;
        Ok(())
    }

    fn warn(&mut self, err: &PipelineError) -> Result<()> {
        write!(self.out, "\n{}", format_warning(err))?;
        Ok(())
    }

    fn on_progress(&mut self, event: &ProgressEvent) {
        if !self.show_spinner {
            return;
        }

        let spinner = self.spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        match event {
            ProgressEvent::Fetching {
                indicator,
                index,
                total,
            } => spinner.set_message(format!("Fetching {} ({}/{})", indicator, index + 1, total)),
            ProgressEvent::Fetched {
                indicator,
                observations: 0,
            } => spinner.println(format!("  {} {} unavailable", "!".yellow(), indicator)),
            ProgressEvent::Fetched { .. } => {}
            ProgressEvent::Aligning => spinner.set_message("Aligning months"),
        }
    }

    fn end_progress(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulate::accumulate;
    use crate::aligner::AlignedTable;
    use crate::indicators::Indicator;
    use crate::window::Window;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn report() -> Report {
        let month = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let mut columns = BTreeMap::new();
        columns.insert(Indicator::Cdi, [(month, dec!(0.79))].into_iter().collect());
        Report {
            window: Window {
                month_count: 1,
                start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            },
            table: accumulate(&AlignedTable::inner_join(columns)),
        }
    }

    #[test]
    fn test_once_reads_a_single_window() {
        let mut shell = ConsoleShell::once("24".to_string(), Vec::new());
        assert_eq!(shell.read_window().unwrap(), Some("24".to_string()));
        assert_eq!(shell.read_window().unwrap(), None);
    }

    #[test]
    fn test_renders_table_chart_and_warning() {
        colored::control::set_override(false);
        let mut shell = ConsoleShell::once("1".to_string(), Vec::new()).without_spinner();
        shell.on_progress(&ProgressEvent::Aligning);
        shell.end_progress();

        shell.show_table(&report()).unwrap();
        shell.show_chart(&report()).unwrap();
        shell.warn(&PipelineError::InsufficientData).unwrap();

        let out = String::from_utf8(shell.into_inner()).unwrap();
        assert!(out.contains("CDI-accumulated"));
        assert!(out.contains("jun/24"));
        assert!(out.contains("0.79%"));
        assert!(out.contains("insufficient data"));
    }

    #[test]
    fn test_prompt_candidates() {
        let candidates = ConsoleShell::<Vec<u8>>::prompt_candidates();
        assert!(candidates.contains(&"120".to_string()));
        assert!(candidates.contains(&"jun/".to_string()));
        assert!(candidates.contains(&"quit".to_string()));
    }
}
