//! Structured logging for netstats
//!
//! This module provides:
//! - Leveled, structured log entries with arbitrary JSON fields
//! - Console, compact and JSON line output formats
//! - Correlation IDs tying together the runs of one pipeline execution
//! - A run logger for per-run progress and skips
//!
//! Every entry is written to standard output so diagnostics interleave with
//! the console report in order.

use crate::error::{AppError, Result};
use crate::models::{Config, LatencySummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - run progress
    Info = 2,
    /// Warning level - a run was skipped or produced nothing
    Warn = 3,
    /// Error level - the pipeline cannot continue
    Error = 4,
    /// Fatal level - unexpected termination
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",    // White
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
            LogLevel::Fatal => "\x1b[35m",    // Magenta
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    /// Global correlation ID for the session
    session_id: Option<String>,
    /// Current operation correlation ID
    current_correlation_id: Option<String>,
    /// Additional context fields
    context_fields: BTreeMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Shared context storage
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set output format
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Enable or disable colored output
    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    /// Logger name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Start a correlated operation
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        {
            let mut context = self.context.write().await;
            context.current_correlation_id = Some(correlation_id.clone());
        }

        self.debug(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "start")
            .log()
            .await;

        correlation_id
    }

    /// End a correlated operation
    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.debug(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("operation_type", "end")
            .field("success", success)
            .log()
            .await;

        let mut context = self.context.write().await;
        if context.current_correlation_id.as_deref() == Some(correlation_id) {
            context.current_correlation_id = None;
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    /// Convenience methods for different log levels
    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Fill in context fields and render the entry; `None` below the level
    async fn render_entry(&self, mut entry: LogEntry) -> Option<String> {
        if entry.level < self.min_level {
            return None;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        if entry.correlation_id.is_none() {
            entry.correlation_id = context.current_correlation_id.clone();
        }
        for (key, value) in &context.context_fields {
            entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        drop(context);

        Some(match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        })
    }

    /// Write log entry to output
    async fn write_entry(&self, entry: LogEntry) {
        if let Some(output) = self.render_entry(entry).await {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}",
            timestamp,
            formatted_level,
            entry.logger,
            entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            output.push_str(&format!(" [{}]", correlation_id.get(..8).unwrap_or(correlation_id)));
        }

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add latency summary fields
    pub fn summary(self, summary: &LatencySummary) -> Self {
        self.field("min_ms", summary.min)
            .field("med_ms", summary.med)
            .field("avg_ms", summary.avg)
            .field("max_ms", summary.max)
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_run_local", error.is_run_local())
            .field("error_exit_code", error.exit_code())
    }

    /// Render without writing, for inspection
    pub async fn render(self) -> Option<String> {
        self.logger.render_entry(self.entry).await
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Logger for per-run progress of a batch
pub struct RunLogger {
    logger: Logger,
}

impl RunLogger {
    /// Create a new run logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("RUN".to_string(), config),
        }
    }

    /// Wrap an existing logger, sharing its context
    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log the start of a run
    pub async fn log_run_started(&self, index: u32, total: u32, source: &str) {
        self.logger.info(&format!("Run {}/{} from {}", index, total, source))
            .field("run", index)
            .field("total_runs", total)
            .field("source", source)
            .log()
            .await;
    }

    /// Log a run that produced hop or sample records
    pub async fn log_run_completed(&self, index: u32, records: usize) {
        let level = if records > 0 { LogLevel::Info } else { LogLevel::Warn };
        let message = if records > 0 {
            format!("Run {} produced {} record(s)", index, records)
        } else {
            format!("Run {} produced no latency data", index)
        };

        self.logger.log(level, &message)
            .field("run", index)
            .field("records", records)
            .log()
            .await;
    }

    /// Log a run that was skipped
    pub async fn log_run_skipped(&self, index: u32, error: &AppError) {
        self.logger.warn(&format!("Skipping run {}: {}", index, error))
            .field("run", index)
            .error_info(error)
            .log()
            .await;
    }

    /// Log the inter-run pause
    pub async fn log_delay(&self, seconds: f64) {
        self.logger.debug(&format!("Sleeping {:.3}s before next run", seconds))
            .field("delay_seconds", seconds)
            .log()
            .await;
    }
}

/// Logger factory sharing one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    /// Create a run logger bound to this session
    pub async fn create_run_logger(&self) -> RunLogger {
        RunLogger::from_logger(self.create_logger("RUN").await)
    }

    /// Session ID shared by every logger from this factory
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutputPaths, PingConfig, PipelineConfig};
    use std::str::FromStr;

    fn config() -> Config {
        Config::new(PipelineConfig::Ping(PingConfig::new(
            Some("example.com".to_string()),
            OutputPaths::new("out.json", "out.svg"),
        )))
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_logger_levels_from_config() {
        let mut config = config();
        assert_eq!(Logger::with_config("T".to_string(), &config).min_level, LogLevel::Warn);

        config.verbose = true;
        assert_eq!(Logger::with_config("T".to_string(), &config).min_level, LogLevel::Info);

        config.debug = true;
        let logger = Logger::with_config("T".to_string(), &config);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert_eq!(logger.format, LogFormat::Json);
    }

    #[tokio::test]
    async fn test_would_log() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_level(LogLevel::Warn);

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Error));
    }

    #[tokio::test]
    async fn test_entries_below_level_are_dropped() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_level(LogLevel::Warn);
        assert!(logger.info("quiet").render().await.is_none());
        assert!(logger.warn("loud").render().await.is_some());
    }

    #[tokio::test]
    async fn test_console_format_plain() {
        let mut logger = Logger::new("RUN".to_string());
        logger.set_color(false);

        let line = logger.warn("File tr_run-2.out does not exist.")
            .field("run", 2)
            .render()
            .await
            .unwrap();

        assert!(line.contains(" WARN [RUN] File tr_run-2.out does not exist."));
        assert!(line.ends_with("{run=2}"));
        assert!(!line.contains("\x1b["));
    }

    #[tokio::test]
    async fn test_json_format_includes_session_and_summary() {
        let mut logger = Logger::new("RUN".to_string());
        logger.set_format(LogFormat::Json);
        logger.set_session_id("session-1".to_string()).await;

        let summary = LatencySummary { avg: 2.0, max: 3.0, med: 2.0, min: 1.0 };
        let line = logger.info("done").summary(&summary).render().await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["fields"]["session_id"], "session-1");
        assert_eq!(value["fields"]["max_ms"], 3.0);
        assert_eq!(value["level"], "Info");
    }

    #[tokio::test]
    async fn test_operation_correlation() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_format(LogFormat::Json);
        let correlation_id = logger.start_operation("traceroute").await;
        assert!(!correlation_id.is_empty());

        let line = logger.info("inside").render().await.unwrap();
        assert!(line.contains(&correlation_id));

        logger.end_operation(&correlation_id, "traceroute", true).await;
        let line = logger.info("after").render().await.unwrap();
        assert!(!line.contains(&correlation_id));
    }

    #[tokio::test]
    async fn test_context_fields() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_format(LogFormat::Json);
        logger.add_context_field("target".to_string(), "example.com").await;

        let line = logger.info("x").render().await.unwrap();
        assert!(line.contains("\"target\":\"example.com\""));
    }

    #[tokio::test]
    async fn test_error_info_fields() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_format(LogFormat::Json);
        let error = AppError::missing_fixture("tr_run-3.out");

        let line = logger.warn("skip").error_info(&error).render().await.unwrap();
        assert!(line.contains("\"error_category\":\"FIXTURE\""));
        assert!(line.contains("\"error_run_local\":true"));
    }

    #[test]
    fn test_logger_factory() {
        tokio_test::block_on(async {
            let factory = LoggerFactory::new(config());
            let logger = factory.create_logger("APP").await;
            assert_eq!(logger.name(), "APP");
            assert!(!factory.session_id().is_empty());

            let run_logger = factory.create_run_logger().await;
            assert_eq!(run_logger.logger.name(), "RUN");
        });
    }

    #[test]
    fn test_compact_format() {
        let logger = Logger::new("APP".to_string());
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Error,
            message: "boom".to_string(),
            logger: "APP".to_string(),
            correlation_id: None,
            fields: BTreeMap::new(),
        };
        assert!(logger.format_compact(&entry).ends_with(" E APP: boom"));
    }
}
