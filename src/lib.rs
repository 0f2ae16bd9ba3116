//! netstats
//!
//! Runs `ping` and `traceroute` repeatedly, parses their textual output into
//! latency records, aggregates statistics across runs, and writes a JSON
//! summary together with a boxplot of the latency distribution.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod parser;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{AggregatedHop, AggregatedPingSummary, Config, Hop, HostPair, LatencySummary, PingSummary};
pub use parser::{parse_ping_output, parse_traceroute_output};
pub use stats::aggregate::{aggregate_hops, aggregate_ping};
pub use output::{ColoredFormatter, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_MAX_PINGS: u32 = 10;
    pub const DEFAULT_PING_DELAY_SECS: f64 = 1.0;
    pub const DEFAULT_NUM_RUNS: u32 = 1;
    pub const DEFAULT_RUN_DELAY_SECS: f64 = 1.0;
    pub const DEFAULT_MAX_HOPS: u32 = 30;
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Indentation of the JSON report
    pub const JSON_INDENT: &str = "    ";

    /// Boxplot size in pixels
    pub const GRAPH_WIDTH: u32 = 1200;
    pub const GRAPH_HEIGHT: u32 = 600;
}
