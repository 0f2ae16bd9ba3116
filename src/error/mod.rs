//! Error handling for netstats

use thiserror::Error;

/// Custom error types for netstats
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (environment, .env file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors for argument values
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required argument was not supplied
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// The diagnostic tool exited nonzero or could not be launched
    #[error("Tool invocation error: {0}")]
    ToolInvocation(String),

    /// Parsing produced no latency samples
    #[error("No data: {0}")]
    NoData(String),

    /// A fixture file for a run index does not exist
    #[error("Missing fixture: {0}")]
    MissingFixture(String),

    /// Parsing errors (numbers, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Statistics calculation errors
    #[error("Statistics error: {0}")]
    Statistics(String),

    /// Plot rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new missing argument error
    pub fn missing_argument<S: Into<String>>(message: S) -> Self {
        Self::MissingArgument(message.into())
    }

    /// Create a new tool invocation error
    pub fn tool_invocation<S: Into<String>>(message: S) -> Self {
        Self::ToolInvocation(message.into())
    }

    /// Create a new no-data error
    pub fn no_data<S: Into<String>>(message: S) -> Self {
        Self::NoData(message.into())
    }

    /// Create a new missing fixture error
    pub fn missing_fixture<S: Into<String>>(message: S) -> Self {
        Self::MissingFixture(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new statistics error
    pub fn statistics<S: Into<String>>(message: S) -> Self {
        Self::Statistics(message.into())
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::MissingArgument(_) => "ARGUMENT",
            Self::ToolInvocation(_) => "TOOL",
            Self::NoData(_) => "NODATA",
            Self::MissingFixture(_) => "FIXTURE",
            Self::Parse(_) => "PARSE",
            Self::Io(_) => "IO",
            Self::Statistics(_) => "STATS",
            Self::Render(_) => "RENDER",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether this error only discards a single run of a batch
    pub fn is_run_local(&self) -> bool {
        matches!(
            self,
            Self::ToolInvocation(_) | Self::MissingFixture(_) | Self::NoData(_)
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or environment variables.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check counts, delays and output file extensions.", msg)
            }
            Self::MissingArgument(msg) => {
                format!("Missing argument: {}\n\nSuggestion: Pass --target, or --test <DIR> for traceroute fixtures.", msg)
            }
            Self::ToolInvocation(msg) => {
                format!("Diagnostic tool failed: {}\n\nSuggestion: Check that the tool is installed and the target is reachable.", msg)
            }
            Self::NoData(msg) => {
                format!("No latency data: {}\n\nSuggestion: The target may be filtering probes. Try another target.", msg)
            }
            Self::MissingFixture(msg) => {
                format!("Fixture file not found: {}\n\nSuggestion: Fixture files must be named tr_run-<N>.out, starting at 1.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your input data.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::Statistics(msg) => {
                format!("Statistics calculation failed: {}\n\nSuggestion: This may indicate insufficient test data.", msg)
            }
            Self::Render(msg) => {
                format!("Plot rendering failed: {}\n\nSuggestion: Use a .svg or .png graph path.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoData(_) => 0,  // Nothing to report is not a failure
            Self::Config(_) | Self::Validation(_) | Self::MissingArgument(_) | Self::Parse(_) => 1,
            Self::ToolInvocation(_) | Self::MissingFixture(_) => 2,
            Self::Io(_) | Self::Render(_) => 5,
            Self::Statistics(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::MissingArgument(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::ToolInvocation(_) | Self::MissingFixture(_) | Self::NoData(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::Statistics(_) | Self::Render(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reporter for user feedback
///
/// Diagnostics go to standard output alongside the rest of the run log.
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        println!("{}", self.format_error(error));
    }

    /// Format an error the way `report_error` prints it
    pub fn format_error(&self, error: &AppError) -> String {
        let mut output = error.format_for_console(self.use_color);
        if self.verbose {
            output.push_str("\n\n");
            output.push_str(&error.user_friendly_message());
        }
        output
    }
}
