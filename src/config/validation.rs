//! Configuration validation utilities and rules

use crate::{
    error::Result,
    executor::FixtureSource,
    models::{Config, OutputPaths, PingConfig, PipelineConfig, TracerouteConfig},
};
use std::path::Path;

/// Ping intervals below this usually need root
const MIN_UNPRIVILEGED_PING_INTERVAL_SECS: f64 = 0.2;

/// Estimated runtime above which a warning is emitted
const LONG_RUNTIME_SECS: f64 = 300.0;

/// Configuration validator with advisory checks on top of `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    ///
    /// Hard errors come from `Config::validate`; everything else is returned
    /// as a non-fatal warning.
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = match &config.pipeline {
            PipelineConfig::Ping(ping) => Self::validate_ping(ping),
            PipelineConfig::Traceroute(trace) => Self::validate_traceroute(trace),
        };
        warnings.extend(Self::validate_output_paths(config.output()));

        Ok(warnings)
    }

    fn validate_ping(ping: &PingConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if ping.delay_secs < MIN_UNPRIVILEGED_PING_INTERVAL_SECS {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Ping interval of {}s is below {}s and usually requires root privileges",
                    ping.delay_secs, MIN_UNPRIVILEGED_PING_INTERVAL_SECS)
            ));
        }

        let estimated = ping.max_pings as f64 * ping.delay_secs * ping.runs as f64
            + ping.run_delay_secs * ping.runs.saturating_sub(1) as f64;
        if estimated > LONG_RUNTIME_SECS {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Configuration will ping for about {:.0}s, which may take a long time", estimated)
            ));
        }

        if ping.max_pings < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("{} packet(s) per run may not provide reliable statistics (recommended: >= 3)", ping.max_pings)
            ));
        }

        warnings
    }

    fn validate_traceroute(trace: &TracerouteConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        match &trace.fixture_dir {
            Some(dir) => {
                if trace.target.is_some() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        "Target is ignored in test mode".to_string()
                    ));
                }

                let source = FixtureSource::new(dir);
                let missing: Vec<u32> = (1..=trace.num_runs)
                    .filter(|&run| !source.path_for(run).is_file())
                    .collect();
                if !missing.is_empty() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("{} of {} fixture file(s) missing in {}; those runs will be skipped",
                            missing.len(), trace.num_runs, dir.display())
                    ));
                }
            }
            None => {
                let estimated = trace.run_delay_secs * trace.num_runs.saturating_sub(1) as f64;
                if estimated > LONG_RUNTIME_SECS {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("Delays between runs alone add up to {:.0}s", estimated)
                    ));
                }
            }
        }

        if trace.max_hops > 64 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Max hops of {} is unusually high", trace.max_hops)
            ));
        }

        warnings
    }

    fn validate_output_paths(output: &OutputPaths) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for path in [&output.json, &output.graph] {
            if let Some(parent) = missing_parent(path) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Output directory '{}' does not exist", parent.display())
                ));
            }
        }

        let is_json = output.json.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Output file '{}' does not end in .json", output.json.display())
            ));
        }

        warnings
    }
}

/// Parent directory of `path` when it is named and absent
fn missing_parent(path: &Path) -> Option<&Path> {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .filter(|parent| !parent.exists())
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> colored::Color {
        match self {
            Self::Info => colored::Color::Blue,
            Self::Warning => colored::Color::Yellow,
            Self::Error => colored::Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            format!("[{}] {}", self.level.as_str().color(self.level.color()).bold(), self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
