//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{Cli, Command, PingArgs, TracerouteArgs},
    config::env::EnvManager,
    error::Result,
    models::{Config, OutputPaths, PingConfig, PipelineConfig, TracerouteConfig},
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let config = self.build()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration without validating it
    pub fn build(&self) -> Result<Config> {
        let mut config = Config::new(self.pipeline());

        self.load_env_file()?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        Ok(config)
    }

    /// Load .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Pipeline parameters straight from the subcommand
    fn pipeline(&self) -> PipelineConfig {
        match &self.cli.command {
            Command::Ping(args) => PipelineConfig::Ping(ping_config(args)),
            Command::Traceroute(args) => PipelineConfig::Traceroute(traceroute_config(args)),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
            println!("Final config: {}", display_config_summary(config).replace('\n', ", "));
        }
    }
}

fn ping_config(args: &PingArgs) -> PingConfig {
    PingConfig {
        target: args.target.clone(),
        max_pings: args.max_pings,
        delay_secs: args.delay,
        runs: args.runs,
        run_delay_secs: args.run_delay,
        output: OutputPaths::new(args.output.output.clone(), args.output.graph.clone()),
    }
}

fn traceroute_config(args: &TracerouteArgs) -> TracerouteConfig {
    TracerouteConfig {
        target: args.target.clone(),
        num_runs: args.num_runs,
        run_delay_secs: args.run_delay,
        max_hops: args.max_hops,
        output: OutputPaths::new(args.output.output.clone(), args.output.graph.clone()),
        fixture_dir: args.test_dir.clone(),
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    match &config.pipeline {
        PipelineConfig::Ping(ping) => {
            summary.push("Command: ping".to_string());
            summary.push(format!("Target: {}", ping.target.as_deref().unwrap_or("<none>")));
            summary.push(format!("Max Pings: {}", ping.max_pings));
            summary.push(format!("Delay: {}s", ping.delay_secs));
            summary.push(format!("Runs: {}", ping.runs));
            summary.push(format!("Run Delay: {}s", ping.run_delay_secs));
            summary.push(format!("Ping Binary: {}", config.ping_bin));
        }
        PipelineConfig::Traceroute(trace) => {
            summary.push("Command: traceroute".to_string());
            match &trace.fixture_dir {
                Some(dir) => summary.push(format!("Fixture Directory: {}", dir.display())),
                None => summary.push(format!("Target: {}", trace.target.as_deref().unwrap_or("<none>"))),
            }
            summary.push(format!("Runs: {}", trace.num_runs));
            summary.push(format!("Run Delay: {}s", trace.run_delay_secs));
            summary.push(format!("Max Hops: {}", trace.max_hops));
            summary.push(format!("Traceroute Binary: {}", config.traceroute_bin));
        }
    }

    let output = config.output();
    summary.push(format!("JSON Output: {}", output.json.display()));
    summary.push(format!("Graph Output: {}", output.graph.display()));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use clap::Parser;
    use std::env;
    use std::path::PathBuf;

    fn clear_env() {
        env::remove_var("PING_BIN");
        env::remove_var("TRACEROUTE_BIN");
        env::remove_var("ENABLE_COLOR");
        env::remove_var("NO_COLOR");
    }

    #[test]
    fn test_ping_config_from_cli() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let cli = Cli::parse_from([
            "netstats", "--verbose", "--no-color", "ping",
            "-t", "example.com", "-m", "5", "-d", "0.5", "--runs", "2", "--run-delay", "3",
            "-o", "p.json", "-g", "p.svg",
        ]);
        let config = load_config(cli).unwrap();

        assert!(config.verbose);
        assert!(!config.enable_color);
        assert_eq!(config.ping_bin, "ping");
        match &config.pipeline {
            PipelineConfig::Ping(ping) => {
                assert_eq!(ping.target.as_deref(), Some("example.com"));
                assert_eq!(ping.max_pings, 5);
                assert_eq!(ping.delay_secs, 0.5);
                assert_eq!(ping.runs, 2);
                assert_eq!(ping.run_delay_secs, 3.0);
                assert_eq!(ping.output.json, PathBuf::from("p.json"));
            }
            other => panic!("unexpected pipeline: {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides_binaries() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("TRACEROUTE_BIN", "/opt/bin/traceroute");
        env::set_var("ENABLE_COLOR", "false");

        let cli = Cli::parse_from(["netstats", "traceroute", "-t", "example.com", "-o", "t.json", "-g", "t.svg"]);
        let config = load_config(cli).unwrap();
        clear_env();

        assert_eq!(config.traceroute_bin, "/opt/bin/traceroute");
        assert!(!config.enable_color);
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("ENABLE_COLOR", "sometimes");

        let cli = Cli::parse_from(["netstats", "traceroute", "-t", "example.com", "-o", "t.json", "-g", "t.svg"]);
        let result = load_config(cli);
        clear_env();

        assert!(matches!(result, Err(crate::error::AppError::Config(_))));
    }

    #[test]
    fn test_missing_target_fails_validation() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let cli = Cli::parse_from(["netstats", "traceroute", "-o", "t.json", "-g", "t.svg"]);
        let err = load_config(cli).unwrap_err();
        assert!(err.to_string().contains("Target is required when not in test mode."));

        // build() alone does not validate
        let cli = Cli::parse_from(["netstats", "ping", "-o", "p.json", "-g", "p.svg"]);
        assert!(ConfigParser::new(cli).build().is_ok());
    }

    #[test]
    fn test_display_config_summary() {
        let mut config = Config::new(PipelineConfig::Traceroute(TracerouteConfig::new(
            None,
            OutputPaths::new("t.json", "t.svg"),
        )));
        if let PipelineConfig::Traceroute(trace) = &mut config.pipeline {
            trace.fixture_dir = Some(PathBuf::from("fixtures"));
        }

        let summary = display_config_summary(&config);
        assert!(summary.contains("Command: traceroute"));
        assert!(summary.contains("Fixture Directory: fixtures"));
        assert!(summary.contains("Max Hops: 30"));
        assert!(summary.contains("Graph Output: t.svg"));
    }
}
