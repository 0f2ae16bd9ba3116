//! Output formatter trait and the plain text implementation

use crate::{
    error::{AppError, Result},
    executor::ExecutionSummary,
    models::{Hop, LatencySummary},
};
use std::fmt::Write as _;
use std::path::Path;

/// Trait for rendering reports to the console
pub trait OutputFormatter {
    /// Format a section header
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the summary of a ping report
    fn format_ping_summary(&self, summary: &LatencySummary, runs: usize) -> Result<String>;

    /// Format the per-hop table of a traceroute report
    fn format_hop_table(&self, hops: &[Hop]) -> Result<String>;

    /// Format run counters of a batch
    fn format_execution_summary(&self, summary: &ExecutionSummary) -> Result<String>;

    /// Format the list of written files
    fn format_artifacts(&self, json: &Path, graph: &Path) -> Result<String>;

    /// Format an error message
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format a warning message
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format a success message
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show run counters and timing
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum width of the hosts column
    pub max_host_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_host_width: 48,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Show borders around table
    pub show_borders: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    /// Column header
    pub header: String,
    /// Column alignment
    pub alignment: Alignment,
    /// Minimum width
    pub min_width: usize,
    /// Maximum width
    pub max_width: usize,
}

impl Column {
    fn new(header: &str, alignment: Alignment, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Table cell position handed to a painter: row (`None` for the header) and column
pub(crate) type CellPainter<'a> = &'a dyn Fn(Option<usize>, usize, String) -> String;

/// Format a latency value in milliseconds
pub(crate) fn format_ms(value: f64) -> String {
    format!("{:.3}", value)
}

/// Table layout shared by the ping summary
pub(crate) fn ping_table(borders: bool) -> TableFormat {
    TableFormat {
        columns: vec![
            Column::new("Runs", Alignment::Right, 4, 6),
            Column::new("Min (ms)", Alignment::Right, 8, 14),
            Column::new("Med (ms)", Alignment::Right, 8, 14),
            Column::new("Avg (ms)", Alignment::Right, 8, 14),
            Column::new("Max (ms)", Alignment::Right, 8, 14),
        ],
        show_borders: borders,
    }
}

pub(crate) fn ping_rows(summary: &LatencySummary, runs: usize) -> Vec<RowData> {
    vec![vec![
        runs.to_string(),
        format_ms(summary.min),
        format_ms(summary.med),
        format_ms(summary.avg),
        format_ms(summary.max),
    ]]
}

/// Table layout shared by the hop report
pub(crate) fn hop_table(borders: bool, max_host_width: usize) -> TableFormat {
    TableFormat {
        columns: vec![
            Column::new("Hop", Alignment::Right, 3, 5),
            Column::new("Host", Alignment::Left, 10, max_host_width),
            Column::new("Min (ms)", Alignment::Right, 8, 14),
            Column::new("Med (ms)", Alignment::Right, 8, 14),
            Column::new("Avg (ms)", Alignment::Right, 8, 14),
            Column::new("Max (ms)", Alignment::Right, 8, 14),
        ],
        show_borders: borders,
    }
}

/// One row per hop; extra hosts of a hop continue on rows of their own
pub(crate) fn hop_rows(hops: &[Hop]) -> Vec<RowData> {
    let mut rows = Vec::new();
    for hop in hops {
        let mut hosts = hop.hosts.iter().map(ToString::to_string);
        rows.push(vec![
            hop.hop.to_string(),
            hosts.next().unwrap_or_else(|| "*".to_string()),
            format_ms(hop.min),
            format_ms(hop.med),
            format_ms(hop.avg),
            format_ms(hop.max),
        ]);
        for host in hosts {
            rows.push(vec![String::new(), host, String::new(), String::new(), String::new(), String::new()]);
        }
    }
    rows
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData], paint: CellPainter<'_>) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let mut lines = Vec::with_capacity(rows.len() + 4);

        if format.show_borders {
            lines.push(self.create_horizontal_border(&column_widths));
        }
        let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
        lines.push(self.create_row(None, &headers, &column_widths, format, paint));
        if format.show_borders {
            lines.push(self.create_horizontal_border(&column_widths));
        }

        for (index, row) in rows.iter().enumerate() {
            lines.push(self.create_row(Some(index), row, &column_widths, format, paint));
        }

        if format.show_borders {
            lines.push(self.create_horizontal_border(&column_widths));
        }

        lines.join("\n")
    }

    /// Calculate column widths from headers and content
    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        format.columns.iter().enumerate()
            .map(|(col_idx, column)| {
                let content = rows.iter()
                    .filter_map(|row| row.get(col_idx))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                column.min_width
                    .max(column.header.len())
                    .max(content)
                    .min(column.max_width.max(column.header.len()))
            })
            .collect()
    }

    /// Create a table row
    fn create_row(
        &self,
        row_idx: Option<usize>,
        data: &[String],
        widths: &[usize],
        format: &TableFormat,
        paint: CellPainter<'_>,
    ) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format.columns.get(idx).map(|c| &c.alignment).unwrap_or(&Alignment::Left);
            let padded_cell = paint(row_idx, idx, self.align_text(cell, width, alignment));

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&padded_cell);
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }

    /// Align text within specified width, truncating with `~` when too long
    fn align_text(&self, text: &str, width: usize, alignment: &Alignment) -> String {
        let length = text.chars().count();
        if length > width {
            let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
            truncated.push('~');
            return truncated;
        }

        let padding = width - length;
        match alignment {
            Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
            Alignment::Right => format!("{}{}", " ".repeat(padding), text),
            Alignment::Center => {
                let left_pad = padding / 2;
                let right_pad = padding - left_pad;
                format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
            }
        }
    }

    /// Format duration in human-readable format
    pub(crate) fn format_duration(&self, duration_ms: f64) -> String {
        if duration_ms < 1000.0 {
            format!("{:.0}ms", duration_ms)
        } else if duration_ms < 60000.0 {
            format!("{:.2}s", duration_ms / 1000.0)
        } else {
            let minutes = (duration_ms / 60000.0) as u32;
            let seconds = (duration_ms % 60000.0) / 1000.0;
            format!("{}m{:.1}s", minutes, seconds)
        }
    }

    /// Format percentage with appropriate precision
    pub(crate) fn format_percentage(&self, percentage: f64) -> String {
        if percentage >= 99.95 {
            "100.0%".to_string()
        } else if percentage < 0.05 {
            "0.0%".to_string()
        } else {
            format!("{:.1}%", percentage)
        }
    }
}

fn identity(_: Option<usize>, _: usize, cell: String) -> String {
    cell
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", title)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_ping_summary(&self, summary: &LatencySummary, runs: usize) -> Result<String> {
        let table = ping_table(self.options.table_borders);
        Ok(self.create_table(&table, &ping_rows(summary, runs), &identity))
    }

    fn format_hop_table(&self, hops: &[Hop]) -> Result<String> {
        if hops.is_empty() {
            return Ok("No responding hops.".to_string());
        }
        let table = hop_table(self.options.table_borders, self.options.max_host_width);
        Ok(self.create_table(&table, &hop_rows(hops), &identity))
    }

    fn format_execution_summary(&self, summary: &ExecutionSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Execution Summary:")
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "-----------------")
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "Total Duration:   {}", self.format_duration(summary.total_duration.as_secs_f64() * 1000.0))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "Runs Attempted:   {}", summary.attempted_runs)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "Successful:       {} ({})", summary.successful_runs, self.format_percentage(summary.success_rate()))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(output, "Skipped:          {}", summary.skipped_runs)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        write!(output, "Without Data:     {}", summary.empty_runs)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        Ok(output)
    }

    fn format_artifacts(&self, json: &Path, graph: &Path) -> Result<String> {
        Ok(format!("Statistics saved to {}\nGraph saved to {}", json.display(), graph.display()))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
