//! Main application orchestration and execution

use crate::{
    config::{display_config_summary, validate_config},
    error::{AppError, Result},
    executor::{execute_runs, FailurePolicy, FixtureSource, LiveSource, RunSource, ToolInvocation},
    logging::{LogLevel, Logger, LoggerFactory, RunLogger},
    models::{Config, LatencySummary, PingConfig, PipelineConfig, TracerouteConfig},
    output::{write_ping_report, write_traceroute_report, OutputCoordinator, OutputFormatterFactory},
    parser::{parse_ping_output, parse_traceroute_output},
    stats::aggregate::{aggregate_hops, aggregate_ping},
};

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    logger: Logger,
    run_logger: RunLogger,
}

impl App {
    /// Create a new application instance from a loaded configuration
    pub async fn new(config: Config) -> Result<Self> {
        let factory = LoggerFactory::new(config.clone());
        let logger = factory.create_logger("APP").await;
        let run_logger = factory.create_run_logger().await;
        Ok(Self { config, logger, run_logger })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the selected pipeline
    pub async fn run(&self) -> Result<()> {
        let warnings = validate_config(&self.config)?;

        if self.config.debug {
            println!("\nConfiguration Summary:");
            println!("{}", display_config_summary(&self.config));
        }

        if self.config.verbose && !warnings.is_empty() {
            println!("\nConfiguration Warnings:");
            for warning in &warnings {
                println!("  {}", warning.format(self.config.enable_color));
            }
        }

        let operation = self.config.tool().name();
        let correlation_id = self.logger.start_operation(operation).await;

        let result = match &self.config.pipeline {
            PipelineConfig::Ping(ping) => self.run_ping(ping).await,
            PipelineConfig::Traceroute(trace) => self.run_traceroute(trace).await,
        };

        if let Err(e) = &result {
            let level = if e.exit_code() == 0 { LogLevel::Warn } else { LogLevel::Error };
            self.logger.log(level, &format!("{} pipeline failed", operation))
                .correlation_id(&correlation_id)
                .error_info(e)
                .log()
                .await;
        }
        self.logger.end_operation(&correlation_id, operation, result.is_ok()).await;

        result
    }

    /// Ping pipeline: run, summarize, write JSON and graph, print the table
    async fn run_ping(&self, ping: &PingConfig) -> Result<()> {
        let target = ping.target.as_deref()
            .ok_or_else(|| AppError::missing_argument("Target is required."))?;

        let source = self.ping_source(ping, target);

        let outcome = execute_runs(&source, ping.runs, FailurePolicy::Abort, &self.run_logger, parse_ping_output).await?;

        let summaries: Vec<LatencySummary> = outcome.runs.iter()
            .filter_map(|samples| LatencySummary::from_samples(samples))
            .collect();

        let summary = match summaries.as_slice() {
            [] => return Err(AppError::no_data(format!("No latency data received from {}", target))),
            [single] if ping.runs == 1 => *single,
            many => aggregate_ping(many)?,
        };

        self.logger.info("Ping summary computed")
            .summary(&summary)
            .field("runs", summaries.len())
            .log()
            .await;

        write_ping_report(&summary, &ping.output)?;

        let report = self.coordinator().display_ping_report(target, &summary, &outcome.summary, &ping.output)?;
        println!("{}", report);
        Ok(())
    }

    /// Traceroute pipeline: run N times, aggregate per hop, write and print
    async fn run_traceroute(&self, trace: &TracerouteConfig) -> Result<()> {
        let source: Box<dyn RunSource> = match &trace.fixture_dir {
            Some(dir) => Box::new(FixtureSource::new(dir)),
            None => {
                let target = trace.target.as_deref()
                    .ok_or_else(|| AppError::missing_argument("Target is required when not in test mode."))?;
                let invocation = ToolInvocation::traceroute(&self.config.traceroute_bin, target, trace.max_hops);
                Box::new(LiveSource::new(invocation, trace.run_delay()))
            }
        };
        let description = source.describe();

        let outcome = execute_runs(
            source.as_ref(),
            trace.num_runs,
            FailurePolicy::SkipRun,
            &self.run_logger,
            parse_traceroute_output,
        ).await?;

        let hops = aggregate_hops(&outcome.runs);
        if hops.is_empty() {
            return Err(AppError::no_data(format!(
                "No hop data collected from {} run(s) of {}", trace.num_runs, description
            )));
        }

        self.logger.info("Traceroute aggregated")
            .field("hops", hops.len())
            .field("successful_runs", outcome.summary.successful_runs)
            .field("skipped_runs", outcome.summary.skipped_runs)
            .log()
            .await;

        write_traceroute_report(&hops, &trace.output)?;

        let report = self.coordinator().display_traceroute_report(&description, &hops, &outcome.summary, &trace.output)?;
        println!("{}", report);
        Ok(())
    }

    /// Live ping runs: `-i` spaces packets, the run delay spaces runs
    fn ping_source(&self, ping: &PingConfig, target: &str) -> LiveSource {
        let invocation = ToolInvocation::ping(&self.config.ping_bin, target, ping.max_pings, ping.delay_secs);
        LiveSource::new(invocation, ping.run_delay())
    }

    fn coordinator(&self) -> OutputCoordinator {
        OutputCoordinator::new(
            OutputFormatterFactory::create_formatter(self.config.enable_color, self.config.verbose),
            self.config.verbose,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutputPaths;
    use tempfile::TempDir;

    const RUN_1: &str = "traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets\n \
1  gateway (192.168.1.1)  1.000 ms  2.000 ms  3.000 ms\n \
2  isp-router (10.0.0.1)  10.000 ms  12.000 ms  14.000 ms\n";
    const RUN_2: &str = " 1  gateway (192.168.1.1)  3.000 ms  4.000 ms  5.000 ms\n 2  * * *\n";

    fn fixture_app_config(dir: &TempDir, num_runs: u32) -> Config {
        let mut trace = TracerouteConfig::new(
            None,
            OutputPaths::new(dir.path().join("out.json"), dir.path().join("out.svg")),
        );
        trace.fixture_dir = Some(dir.path().to_path_buf());
        trace.num_runs = num_runs;

        let mut config = Config::new(PipelineConfig::Traceroute(trace));
        config.enable_color = false;
        config
    }

    #[tokio::test]
    async fn test_traceroute_fixture_pipeline_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("tr_run-1.out"), RUN_1).unwrap();
        std::fs::write(dir.path().join("tr_run-2.out"), RUN_2).unwrap();

        let app = App::new(fixture_app_config(&dir, 2)).await.unwrap();
        app.run().await.unwrap();

        let json = std::fs::read_to_string(dir.path().join("out.json")).unwrap();
        let hops: Vec<crate::models::Hop> = serde_json::from_str(&json).unwrap();
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0].hop, 1);
        assert_eq!(hops[0].min, 1.0);
        assert_eq!(hops[0].max, 5.0);
        assert_eq!(hops[1].hop, 2);
        assert_eq!(hops[1].med, 12.0);
        assert!(dir.path().join("out.svg").exists());
    }

    #[tokio::test]
    async fn test_missing_fixture_run_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("tr_run-1.out"), RUN_1).unwrap();

        let app = App::new(fixture_app_config(&dir, 3)).await.unwrap();
        app.run().await.unwrap();

        assert!(dir.path().join("out.json").exists());
    }

    #[tokio::test]
    async fn test_all_runs_empty_is_no_data() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("tr_run-1.out"), " 1  * * *\n").unwrap();

        let app = App::new(fixture_app_config(&dir, 1)).await.unwrap();
        let err = app.run().await.unwrap_err();

        assert!(matches!(err, AppError::NoData(_)));
        assert!(!dir.path().join("out.json").exists());
        assert!(!dir.path().join("out.svg").exists());
    }

    #[tokio::test]
    async fn test_ping_runs_are_spaced_by_run_delay() {
        let dir = TempDir::new().unwrap();
        let mut ping = PingConfig::new(
            Some("example.com".to_string()),
            OutputPaths::new(dir.path().join("p.json"), dir.path().join("p.svg")),
        );
        ping.delay_secs = 0.2;
        ping.run_delay_secs = 5.0;
        let app = App::new(Config::new(PipelineConfig::Ping(ping.clone()))).await.unwrap();

        let source = app.ping_source(&ping, "example.com");
        assert_eq!(source.inter_run_delay(), std::time::Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_ping_tool_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::new(PipelineConfig::Ping(PingConfig::new(
            Some("example.com".to_string()),
            OutputPaths::new(dir.path().join("p.json"), dir.path().join("p.svg")),
        )));
        config.ping_bin = "netstats-missing-ping-binary".to_string();

        let app = App::new(config).await.unwrap();
        let err = app.run().await.unwrap_err();

        assert!(matches!(err, AppError::ToolInvocation(_)));
        assert!(!dir.path().join("p.json").exists());
    }
}
