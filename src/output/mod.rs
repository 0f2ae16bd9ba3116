//! Report output: JSON files, boxplots and the console summary
//!
//! This module provides:
//! - `save_json` for the 4-space indented report file
//! - `render_boxplot` for the latency distribution chart
//! - Colored and plain console formatters behind `OutputFormatter`

mod colored;
mod formatter;
pub mod json;
pub mod plot;

pub use colored::{latency_color, ColorScheme, ColoredFormatter};
pub use formatter::{Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat};
pub use json::{save_json, to_json_string};
pub use plot::{render_boxplot, BoxplotGroup, BoxplotStyle};

use crate::{
    error::Result,
    executor::ExecutionSummary,
    models::{Hop, LatencySummary, OutputPaths},
};

/// Write the ping report. The graph goes first so a render failure leaves no JSON behind.
pub fn write_ping_report(summary: &LatencySummary, paths: &OutputPaths) -> Result<()> {
    render_boxplot(
        &[BoxplotGroup::from_summary("1", summary)],
        &BoxplotStyle::ping(),
        &paths.graph,
    )?;
    save_json(summary, &paths.json)
}

/// Write the traceroute report: one box per hop, then the JSON list
pub fn write_traceroute_report(hops: &[Hop], paths: &OutputPaths) -> Result<()> {
    render_boxplot(&BoxplotGroup::from_hops(hops), &BoxplotStyle::traceroute(), &paths.graph)?;
    save_json(hops, &paths.json)
}

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Assembles the console report of a pipeline
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    verbose: bool,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>, verbose: bool) -> Self {
        Self { formatter, verbose }
    }

    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }

    /// Console report of the ping pipeline
    pub fn display_ping_report(
        &self,
        target: &str,
        summary: &LatencySummary,
        execution: &ExecutionSummary,
        paths: &OutputPaths,
    ) -> Result<String> {
        let mut sections = vec![
            self.formatter.format_header(&format!("Ping statistics for {}", target))?,
            self.formatter.format_ping_summary(summary, execution.successful_runs as usize)?,
        ];
        if self.verbose {
            sections.push(self.formatter.format_execution_summary(execution)?);
        }
        sections.push(self.formatter.format_artifacts(&paths.json, &paths.graph)?);
        Ok(sections.join("\n\n"))
    }

    /// Console report of the traceroute pipeline
    pub fn display_traceroute_report(
        &self,
        source: &str,
        hops: &[Hop],
        execution: &ExecutionSummary,
        paths: &OutputPaths,
    ) -> Result<String> {
        let mut sections = vec![
            self.formatter.format_header(&format!("Traceroute statistics for {}", source))?,
            self.formatter.format_hop_table(hops)?,
        ];
        if self.verbose || execution.skipped_runs > 0 {
            sections.push(self.formatter.format_execution_summary(execution)?);
        }
        sections.push(self.formatter.format_artifacts(&paths.json, &paths.graph)?);
        Ok(sections.join("\n\n"))
    }
}
