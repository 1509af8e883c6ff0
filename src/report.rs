use crate::checker::ActionRef;
use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Defines the possible output formats for check reports.
#[derive(Debug, Clone)]
pub enum OutputFormat {
    /// A simple, human-readable text format.
    Text,
    /// JSON format, suitable for machine processing.
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// The outcome of a check run.
#[derive(Serialize)]
pub struct CheckReport {
    pub tool: String,
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    /// The version declared by the pin file.
    pub pinned_version: String,
    /// How many workflow files were scanned.
    pub files_scanned: usize,
    /// How many versioned action references were found in total.
    pub references: usize,
    /// The references that disagree with the pin.
    pub stale: Vec<ActionRef>,
    /// `true` when no stale references exist.
    pub in_sync: bool,
}

impl CheckReport {
    pub fn new(
        pinned_version: String,
        files_scanned: usize,
        references: usize,
        stale: Vec<ActionRef>,
    ) -> Self {
        let in_sync = stale.is_empty();
        Self {
            tool: "pinsync".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            pinned_version,
            files_scanned,
            references,
            stale,
            in_sync,
        }
    }
}

/// Handles the rendering of check reports.
pub struct ReportWriter {
    format: OutputFormat,
}

impl ReportWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Writes the formatted report to a given writer.
    ///
    /// # Arguments
    ///
    /// * `writer` - The `Write` target (e.g., a file or `stdout`).
    /// * `report` - The `CheckReport` to render.
    pub fn write_report<W: Write>(&self, writer: &mut W, report: &CheckReport) -> Result<()> {
        let output = match self.format {
            OutputFormat::Text => self.format_text(report),
            OutputFormat::Json => self.format_json(report)?,
        };

        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    /// Formats a report into a simple, human-readable text format.
    fn format_text(&self, report: &CheckReport) -> String {
        let mut output = String::new();

        for r in &report.stale {
            output.push_str(&format!(
                "[stale] {}:{}: {}\n",
                r.file_path.display(),
                r.line_number,
                r.line_content
            ));
        }

        output.push_str(&format!("\n{}\n", "-".repeat(50)));
        output.push_str(&format!("Pinned version : {}\n", report.pinned_version));
        output.push_str(&format!("Files scanned  : {}\n", report.files_scanned));
        output.push_str(&format!("References     : {}\n", report.references));
        output.push_str(&format!("Stale          : {}\n", report.stale.len()));

        output
    }

    /// Formats a report into structured JSON.
    fn format_json(&self, report: &CheckReport) -> Result<String> {
        Ok(format!("{}\n", serde_json::to_string_pretty(report)?))
    }
}
