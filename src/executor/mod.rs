//! Run execution for the ping and traceroute pipelines
//!
//! This module contains:
//! - Tool invocations and the subprocess runner
//! - The `RunSource` seam between live tools and fixture files
//! - The sequential batch runner with its failure policy

pub mod fixtures;

pub use fixtures::FixtureSource;

use crate::{
    error::{AppError, Result},
    logging::RunLogger,
    types::Tool,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::process::Command;

/// A fully specified command line for one tool run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Which tool is being run
    pub tool: Tool,
    /// Executable name or path
    pub program: String,
    /// Arguments, target last
    pub args: Vec<String>,
}

impl ToolInvocation {
    /// `ping -c <count> -i <delay> <target>`
    pub fn ping(program: &str, target: &str, count: u32, delay_secs: f64) -> Self {
        Self {
            tool: Tool::Ping,
            program: program.to_string(),
            args: vec![
                "-c".to_string(),
                count.to_string(),
                "-i".to_string(),
                delay_secs.to_string(),
                target.to_string(),
            ],
        }
    }

    /// `traceroute -m <max_hops> <target>`
    pub fn traceroute(program: &str, target: &str, max_hops: u32) -> Self {
        Self {
            tool: Tool::Traceroute,
            program: program.to_string(),
            args: vec!["-m".to_string(), max_hops.to_string(), target.to_string()],
        }
    }

    /// Shell-like rendering for logs
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run a tool to completion and return its standard output
///
/// A nonzero exit status yields `ToolInvocation` carrying the captured stderr.
pub async fn run_tool(invocation: &ToolInvocation) -> Result<String> {
    let output = Command::new(&invocation.program)
        .args(&invocation.args)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| AppError::tool_invocation(format!(
            "Exception running {}: {}", invocation.tool, e
        )))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::tool_invocation(format!(
            "Error running {}: {}", invocation.tool, stderr.trim_end()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Where the raw text of each run comes from
#[async_trait]
pub trait RunSource: Send + Sync {
    /// Raw tool output for the 1-indexed run
    async fn fetch(&self, run_index: u32) -> Result<String>;

    /// Human readable description for logs
    fn describe(&self) -> String;

    /// Pause between two consecutive runs
    fn inter_run_delay(&self) -> Duration;
}

/// Runs the real tool every time
#[derive(Debug, Clone)]
pub struct LiveSource {
    invocation: ToolInvocation,
    delay: Duration,
}

impl LiveSource {
    pub fn new(invocation: ToolInvocation, delay: Duration) -> Self {
        Self { invocation, delay }
    }

    pub fn invocation(&self) -> &ToolInvocation {
        &self.invocation
    }
}

#[async_trait]
impl RunSource for LiveSource {
    async fn fetch(&self, _run_index: u32) -> Result<String> {
        run_tool(&self.invocation).await
    }

    fn describe(&self) -> String {
        format!("`{}`", self.invocation.command_line())
    }

    fn inter_run_delay(&self) -> Duration {
        self.delay
    }
}

/// What to do when a single run fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Log the failure and continue with the next run
    SkipRun,
    /// Stop the batch and return the error
    Abort,
}

/// Counters for one batch of runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionSummary {
    /// Total wall-clock duration, delays included
    pub total_duration: Duration,
    /// Runs attempted
    pub attempted_runs: u32,
    /// Runs whose output was parsed
    pub successful_runs: u32,
    /// Runs skipped because of a run-local error
    pub skipped_runs: u32,
    /// Successful runs that produced no records
    pub empty_runs: u32,
}

impl ExecutionSummary {
    /// Percentage of attempted runs that produced output
    pub fn success_rate(&self) -> f64 {
        if self.attempted_runs == 0 {
            0.0
        } else {
            self.successful_runs as f64 / self.attempted_runs as f64 * 100.0
        }
    }
}

/// Parsed runs plus the errors of skipped runs
#[derive(Debug, Default)]
pub struct BatchOutcome<R> {
    /// Records of each successful run, in run order
    pub runs: Vec<Vec<R>>,
    /// Errors of skipped runs, in run order
    pub errors: Vec<AppError>,
    pub summary: ExecutionSummary,
}

impl<R> BatchOutcome<R> {
    /// Whether no run produced a single record
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Vec::is_empty)
    }
}

/// Execute `num_runs` runs sequentially and parse each with `parse`
///
/// The source's delay is slept between runs, never after the last one.
/// Under `SkipRun` only run-local errors are skipped; anything else aborts.
pub async fn execute_runs<S, R, F>(
    source: &S,
    num_runs: u32,
    policy: FailurePolicy,
    logger: &RunLogger,
    mut parse: F,
) -> Result<BatchOutcome<R>>
where
    S: RunSource + ?Sized,
    F: FnMut(&str) -> Vec<R>,
{
    let started = Instant::now();
    let mut outcome = BatchOutcome {
        runs: Vec::with_capacity(num_runs as usize),
        errors: Vec::new(),
        summary: ExecutionSummary::default(),
    };
    let description = source.describe();
    let delay = source.inter_run_delay();

    for run_index in 1..=num_runs {
        if run_index > 1 && !delay.is_zero() {
            logger.log_delay(delay.as_secs_f64()).await;
            tokio::time::sleep(delay).await;
        }

        logger.log_run_started(run_index, num_runs, &description).await;
        outcome.summary.attempted_runs += 1;

        match source.fetch(run_index).await {
            Ok(text) => {
                let records = parse(&text);
                logger.log_run_completed(run_index, records.len()).await;
                outcome.summary.successful_runs += 1;
                if records.is_empty() {
                    outcome.summary.empty_runs += 1;
                }
                outcome.runs.push(records);
            }
            Err(e) if policy == FailurePolicy::SkipRun && e.is_run_local() => {
                logger.log_run_skipped(run_index, &e).await;
                outcome.summary.skipped_runs += 1;
                outcome.errors.push(e);
            }
            Err(e) => return Err(e),
        }
    }

    outcome.summary.total_duration = started.elapsed();
    Ok(outcome)
}
