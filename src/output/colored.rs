//! Colored formatter implementation with terminal color support
//!
//! Latency cells are colored by their `LatencyLevel`; headers, borders
//! and messages follow a `ColorScheme`.

use crate::{
    error::{AppError, Result},
    executor::ExecutionSummary,
    models::{Hop, LatencySummary},
    types::LatencyLevel,
};
use super::formatter::{
    hop_rows, hop_table, ping_rows, ping_table, FormattingOptions, OutputFormatter, PlainFormatter,
};
use colored::*;
use std::fmt::Write as _;
use std::path::Path;

/// Color for a latency level
pub fn latency_color(level: LatencyLevel) -> Color {
    match level {
        LatencyLevel::Excellent => Color::Green,
        LatencyLevel::Good => Color::Cyan,
        LatencyLevel::Fair => Color::Yellow,
        LatencyLevel::Poor => Color::Red,
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Apply bold formatting if colors are enabled
    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Paint one already padded table cell
    ///
    /// Header cells are bold, numeric cells in `latency_columns` take the
    /// color of their latency level.
    fn paint_cell(&self, row: Option<usize>, col: usize, cell: String, latency_columns: &[usize]) -> String {
        match row {
            None => self.bold(&cell).to_string(),
            Some(_) if latency_columns.contains(&col) => match cell.trim().parse::<f64>() {
                Ok(ms) => self.colorize(&cell, latency_color(LatencyLevel::from_ms(ms))).to_string(),
                Err(_) => cell,
            },
            Some(_) => cell,
        }
    }

    fn paint_borders(&self, table: String) -> String {
        if !self.options.enable_color {
            return table;
        }
        table
            .lines()
            .map(|line| {
                if line.starts_with('+') {
                    line.color(self.color_scheme.border).to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", self.bold(title).color(self.color_scheme.header))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_ping_summary(&self, summary: &LatencySummary, runs: usize) -> Result<String> {
        let table = ping_table(self.options.table_borders);
        let paint = |row: Option<usize>, col: usize, cell: String| self.paint_cell(row, col, cell, &[1, 2, 3, 4]);
        let mut output = self.paint_borders(
            self.plain_formatter.create_table(&table, &ping_rows(summary, runs), &paint),
        );

        let level = LatencyLevel::from_ms(summary.avg);
        write!(output, "\nLatency level: {}", self.colorize(level.description(), latency_color(level)))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        Ok(output)
    }

    fn format_hop_table(&self, hops: &[Hop]) -> Result<String> {
        if hops.is_empty() {
            return Ok(self.colorize("No responding hops.", self.color_scheme.muted).to_string());
        }
        let table = hop_table(self.options.table_borders, self.options.max_host_width);
        let paint = |row: Option<usize>, col: usize, cell: String| self.paint_cell(row, col, cell, &[2, 3, 4, 5]);
        Ok(self.paint_borders(self.plain_formatter.create_table(&table, &hop_rows(hops), &paint)))
    }

    fn format_execution_summary(&self, summary: &ExecutionSummary) -> Result<String> {
        let rate = summary.success_rate();
        let rate_color = if rate >= 95.0 {
            self.color_scheme.success
        } else if rate >= 50.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        };

        let mut output = String::new();
        writeln!(output, "{}", self.bold("Execution Summary:").color(self.color_scheme.header))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "  Duration:  {}",
            self.plain_formatter.format_duration(summary.total_duration.as_secs_f64() * 1000.0))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "  Runs:      {} attempted, {} succeeded ({})",
            summary.attempted_runs,
            summary.successful_runs,
            self.colorize(&self.plain_formatter.format_percentage(rate), rate_color))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        write!(output, "  Skipped:   {}, without data: {}",
            self.colorize(&summary.skipped_runs.to_string(),
                if summary.skipped_runs > 0 { self.color_scheme.warning } else { self.color_scheme.muted }),
            summary.empty_runs)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        Ok(output)
    }

    fn format_artifacts(&self, json: &Path, graph: &Path) -> Result<String> {
        Ok(format!("{} {}\n{} {}",
            self.colorize("Statistics saved to", self.color_scheme.success),
            self.colorize(&json.display().to_string(), self.color_scheme.info),
            self.colorize("Graph saved to", self.color_scheme.success),
            self.colorize(&graph.display().to_string(), self.color_scheme.info)))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.bold("ERROR:").color(self.color_scheme.error), error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.bold("WARNING:").color(self.color_scheme.warning), warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.bold("SUCCESS:").color(self.color_scheme.success), message))
    }
}
