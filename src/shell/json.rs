use anyhow::Result;
use std::io::Write;

use super::Shell;
use crate::cli::formatters::format_report_json;
use crate::error::PipelineError;
use crate::pipeline::Report;

/// One-shot shell for dashboard consumers: a single JSON document on stdout.
///
/// The document carries both the table rows and the chart series, so
/// `show_chart` has nothing left to write.
pub struct JsonShell<W: Write> {
    window: Option<String>,
    out: W,
}

impl<W: Write> JsonShell<W> {
    pub fn new(window: String, out: W) -> Self {
        Self {
            window: Some(window),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Shell for JsonShell<W> {
    fn read_window(&mut self) -> Result<Option<String>> {
        Ok(self.window.take())
    }

    fn show_table(&mut self, report: &Report) -> Result<()> {
        writeln!(self.out, "{}", format_report_json(report))?;
        Ok(())
    }

    fn show_chart(&mut self, _report: &Report) -> Result<()> {
        Ok(())
    }

    fn warn(&mut self, err: &PipelineError) -> Result<()> {
        let kind = match err {
            PipelineError::InvalidInput(_) => "invalid_input",
            PipelineError::InsufficientData => "insufficient_data",
        };
        let doc = serde_json::json!({ "error": kind, "message": err.to_string() });
        writeln!(self.out, "{}", serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}
