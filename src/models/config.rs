//! Configuration data model and validation

use crate::types::{AppError, ImageFormat, Result, Tool};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Executable used for ping runs
    #[serde(default = "default_ping_bin")]
    pub ping_bin: String,

    /// Executable used for traceroute runs
    #[serde(default = "default_traceroute_bin")]
    pub traceroute_bin: String,

    /// Which pipeline to run and its parameters
    pub pipeline: PipelineConfig,
}

/// Pipeline selected on the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineConfig {
    Ping(PingConfig),
    Traceroute(TracerouteConfig),
}

/// Where the JSON report and the boxplot are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub graph: PathBuf,
}

/// Parameters of the ping pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingConfig {
    /// Target domain name or IP address
    pub target: Option<String>,

    /// Packets sent per run (`ping -c`)
    #[serde(default = "default_max_pings")]
    pub max_pings: u32,

    /// Seconds between packets (`ping -i`)
    #[serde(default = "default_ping_delay")]
    pub delay_secs: f64,

    /// Number of ping runs aggregated into the report
    #[serde(default = "default_runs")]
    pub runs: u32,

    /// Seconds slept between consecutive ping runs
    #[serde(default = "default_run_delay")]
    pub run_delay_secs: f64,

    pub output: OutputPaths,
}

/// Parameters of the traceroute pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracerouteConfig {
    /// Target domain name or IP address; unused in fixture mode
    pub target: Option<String>,

    /// Number of traceroute runs
    #[serde(default = "default_runs")]
    pub num_runs: u32,

    /// Seconds slept between consecutive live runs
    #[serde(default = "default_run_delay")]
    pub run_delay_secs: f64,

    /// Maximum hops per run (`traceroute -m`)
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,

    pub output: OutputPaths,

    /// Directory of `tr_run-<N>.out` files read instead of running traceroute
    #[serde(default)]
    pub fixture_dir: Option<PathBuf>,
}

impl PingConfig {
    pub fn new(target: Option<String>, output: OutputPaths) -> Self {
        Self {
            target,
            max_pings: default_max_pings(),
            delay_secs: default_ping_delay(),
            runs: default_runs(),
            run_delay_secs: default_run_delay(),
            output,
        }
    }

    /// Interval between packets as Duration
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs)
    }

    /// Delay between ping runs as Duration
    pub fn run_delay(&self) -> Duration {
        Duration::from_secs_f64(self.run_delay_secs)
    }

    /// Validate ping parameters
    pub fn validate(&self) -> Result<()> {
        require_target(self.target.as_deref(), "Target is required.")?;

        if self.max_pings == 0 {
            return Err(AppError::validation("max_pings must be greater than 0"));
        }
        if self.max_pings > 1000 {
            return Err(AppError::validation("max_pings cannot exceed 1000"));
        }
        if !self.delay_secs.is_finite() || self.delay_secs <= 0.0 {
            return Err(AppError::validation(format!("Ping delay must be a positive number of seconds, got {}", self.delay_secs)));
        }
        if self.runs == 0 || self.runs > 100 {
            return Err(AppError::validation(format!("Ping runs must be between 1 and 100, got {}", self.runs)));
        }
        if !self.run_delay_secs.is_finite() || self.run_delay_secs < 0.0 {
            return Err(AppError::validation(format!("Run delay must be zero or more seconds, got {}", self.run_delay_secs)));
        }

        self.output.validate()
    }
}

impl TracerouteConfig {
    pub fn new(target: Option<String>, output: OutputPaths) -> Self {
        Self {
            target,
            num_runs: default_runs(),
            run_delay_secs: default_run_delay(),
            max_hops: default_max_hops(),
            output,
            fixture_dir: None,
        }
    }

    /// Delay between live runs as Duration
    pub fn run_delay(&self) -> Duration {
        Duration::from_secs_f64(self.run_delay_secs)
    }

    /// Whether runs are read from fixture files
    pub fn is_fixture_mode(&self) -> bool {
        self.fixture_dir.is_some()
    }

    /// Validate traceroute parameters
    pub fn validate(&self) -> Result<()> {
        match &self.fixture_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(AppError::validation(format!("Fixture directory '{}' does not exist", dir.display())));
                }
            }
            None => require_target(self.target.as_deref(), "Target is required when not in test mode.")?,
        }

        if self.num_runs == 0 || self.num_runs > 100 {
            return Err(AppError::validation(format!("num_runs must be between 1 and 100, got {}", self.num_runs)));
        }
        if !self.run_delay_secs.is_finite() || self.run_delay_secs < 0.0 {
            return Err(AppError::validation(format!("Run delay must be zero or more seconds, got {}", self.run_delay_secs)));
        }
        if self.max_hops == 0 || self.max_hops > 255 {
            return Err(AppError::validation(format!("max_hops must be between 1 and 255, got {}", self.max_hops)));
        }

        self.output.validate()
    }
}

impl OutputPaths {
    pub fn new<J: Into<PathBuf>, G: Into<PathBuf>>(json: J, graph: G) -> Self {
        Self { json: json.into(), graph: graph.into() }
    }

    /// Check that both paths are set and the graph format is supported
    pub fn validate(&self) -> Result<()> {
        if self.json.as_os_str().is_empty() {
            return Err(AppError::validation("Output JSON path cannot be empty"));
        }
        if self.graph.as_os_str().is_empty() {
            return Err(AppError::validation("Graph path cannot be empty"));
        }
        ImageFormat::from_path(&self.graph)?;
        Ok(())
    }
}

impl Config {
    /// Create a configuration for the given pipeline with default settings
    pub fn new(pipeline: PipelineConfig) -> Self {
        Self {
            verbose: false,
            debug: false,
            enable_color: default_enable_color(),
            ping_bin: default_ping_bin(),
            traceroute_bin: default_traceroute_bin(),
            pipeline,
        }
    }

    /// The tool this configuration drives
    pub fn tool(&self) -> Tool {
        match self.pipeline {
            PipelineConfig::Ping(_) => Tool::Ping,
            PipelineConfig::Traceroute(_) => Tool::Traceroute,
        }
    }

    /// Output paths of the selected pipeline
    pub fn output(&self) -> &OutputPaths {
        match &self.pipeline {
            PipelineConfig::Ping(ping) => &ping.output,
            PipelineConfig::Traceroute(trace) => &trace.output,
        }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.ping_bin.trim().is_empty() {
            return Err(AppError::config("PING_BIN cannot be empty"));
        }
        if self.traceroute_bin.trim().is_empty() {
            return Err(AppError::config("TRACEROUTE_BIN cannot be empty"));
        }

        match &self.pipeline {
            PipelineConfig::Ping(ping) => ping.validate(),
            PipelineConfig::Traceroute(trace) => trace.validate(),
        }
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(ping_bin) = std::env::var("PING_BIN") {
            self.ping_bin = ping_bin.trim().to_string();
        }

        if let Ok(traceroute_bin) = std::env::var("TRACEROUTE_BIN") {
            self.traceroute_bin = traceroute_bin.trim().to_string();
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if std::env::var("NO_COLOR").is_ok() {
            self.enable_color = false;
        }

        Ok(())
    }
}

fn require_target(target: Option<&str>, message: &str) -> Result<()> {
    match target {
        Some(t) if !t.trim().is_empty() => Ok(()),
        _ => Err(AppError::missing_argument(message)),
    }
}

// Default value functions for serde
fn default_max_pings() -> u32 {
    crate::defaults::DEFAULT_MAX_PINGS
}

fn default_ping_delay() -> f64 {
    crate::defaults::DEFAULT_PING_DELAY_SECS
}

fn default_runs() -> u32 {
    crate::defaults::DEFAULT_NUM_RUNS
}

fn default_run_delay() -> f64 {
    crate::defaults::DEFAULT_RUN_DELAY_SECS
}

fn default_max_hops() -> u32 {
    crate::defaults::DEFAULT_MAX_HOPS
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

fn default_ping_bin() -> String {
    Tool::Ping.default_binary().to_string()
}

fn default_traceroute_bin() -> String {
    Tool::Traceroute.default_binary().to_string()
}
