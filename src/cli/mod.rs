//! Command-line interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// netstats - repeated ping/traceroute runs summarized as JSON and a boxplot
#[derive(Parser, Debug, Clone)]
#[command(name = "netstats")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output (JSON log lines)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Pipelines
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run ping towards a target and summarize per-packet latency
    Ping(PingArgs),
    /// Run traceroute several times and summarize latency per hop
    Traceroute(TracerouteArgs),
}

/// Output file arguments shared by both pipelines
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Path of the output JSON file containing the stats
    #[arg(short, long, value_name = "JSON")]
    pub output: PathBuf,

    /// Path of the output graph (.svg, .pdf, .png, .jpg, .jpeg or .bmp)
    #[arg(short, long, value_name = "IMAGE")]
    pub graph: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct PingArgs {
    /// Target domain name or IP address
    #[arg(short, long)]
    pub target: Option<String>,

    /// Number of ping packets to send per run
    #[arg(short, long = "max-pings", default_value_t = crate::defaults::DEFAULT_MAX_PINGS)]
    pub max_pings: u32,

    /// Seconds to wait between two consecutive packets
    #[arg(short, long, value_parser = parse_seconds, default_value_t = crate::defaults::DEFAULT_PING_DELAY_SECS)]
    pub delay: f64,

    /// Number of ping runs aggregated into one report
    #[arg(long, default_value_t = crate::defaults::DEFAULT_NUM_RUNS)]
    pub runs: u32,

    /// Seconds to wait between two consecutive ping runs
    #[arg(long = "run-delay", value_parser = parse_seconds, default_value_t = crate::defaults::DEFAULT_RUN_DELAY_SECS)]
    pub run_delay: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct TracerouteArgs {
    /// Target domain name or IP address (required unless --test is given)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Number of times traceroute will run
    #[arg(short, long = "num-runs", default_value_t = crate::defaults::DEFAULT_NUM_RUNS)]
    pub num_runs: u32,

    /// Seconds to wait between two consecutive runs
    #[arg(short = 'd', long = "run-delay", value_parser = parse_seconds, default_value_t = crate::defaults::DEFAULT_RUN_DELAY_SECS)]
    pub run_delay: f64,

    /// Maximum number of hops per run
    #[arg(short, long = "max-hops", default_value_t = crate::defaults::DEFAULT_MAX_HOPS)]
    pub max_hops: u32,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Directory of tr_run-<N>.out files to read instead of running traceroute
    #[arg(long = "test", value_name = "DIR")]
    pub test_dir: Option<PathBuf>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Ping(args) => {
                if args.max_pings == 0 {
                    return Err("--max-pings must be greater than 0".to_string());
                }
                if args.runs == 0 {
                    return Err("--runs must be greater than 0".to_string());
                }
            }
            Command::Traceroute(args) => {
                if args.num_runs == 0 {
                    return Err("--num-runs must be greater than 0".to_string());
                }
                if args.max_hops == 0 {
                    return Err("--max-hops must be greater than 0".to_string());
                }
            }
        }
        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Parse a non-negative number of seconds
fn parse_seconds(s: &str) -> Result<f64, String> {
    let secs: f64 = s.trim().parse()
        .map_err(|_| format!("Invalid number of seconds: {}", s))?;
    if !secs.is_finite() {
        return Err(format!("Invalid number of seconds: {}", s));
    }
    if secs < 0.0 {
        return Err("Seconds cannot be negative".to_string());
    }
    if secs > 3600.0 {
        return Err("Seconds cannot exceed 3600".to_string());
    }
    Ok(secs)
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_defaults() {
        let cli = Cli::parse_from(["netstats", "ping", "-t", "example.com", "-o", "p.json", "-g", "p.svg"]);
        match cli.command {
            Command::Ping(args) => {
                assert_eq!(args.target.as_deref(), Some("example.com"));
                assert_eq!(args.max_pings, 10);
                assert_eq!(args.delay, 1.0);
                assert_eq!(args.runs, 1);
                assert_eq!(args.run_delay, 1.0);
                assert_eq!(args.output.output, PathBuf::from("p.json"));
                assert_eq!(args.output.graph, PathBuf::from("p.svg"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!cli.verbose);
        assert!(!cli.debug);
    }

    #[test]
    fn test_traceroute_all_options() {
        let cli = Cli::parse_from([
            "netstats", "--verbose", "traceroute",
            "-t", "example.com",
            "-n", "5",
            "-d", "0.5",
            "-m", "20",
            "-o", "t.json",
            "-g", "t.png",
            "--test", "runs",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Traceroute(args) => {
                assert_eq!(args.num_runs, 5);
                assert_eq!(args.run_delay, 0.5);
                assert_eq!(args.max_hops, 20);
                assert_eq!(args.test_dir, Some(PathBuf::from("runs")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["netstats", "ping", "-o", "a.json", "-g", "a.svg", "--debug", "--no-color"]);
        assert!(cli.debug);
        assert!(cli.no_color);
        assert!(!cli.use_colors());
    }

    #[test]
    fn test_target_is_optional_at_parse_time() {
        let cli = Cli::parse_from(["netstats", "traceroute", "-o", "a.json", "-g", "a.svg"]);
        match cli.command {
            Command::Traceroute(args) => assert!(args.target.is_none()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_paths_required() {
        assert!(Cli::try_parse_from(["netstats", "ping", "-t", "x", "-g", "a.svg"]).is_err());
        assert!(Cli::try_parse_from(["netstats", "ping", "-t", "x", "-o", "a.json"]).is_err());
    }

    #[test]
    fn test_validate_zero_counts() {
        let cli = Cli::parse_from(["netstats", "ping", "-m", "0", "-o", "a.json", "-g", "a.svg"]);
        assert!(cli.validate().unwrap_err().contains("--max-pings"));

        let cli = Cli::parse_from(["netstats", "traceroute", "-n", "0", "-o", "a.json", "-g", "a.svg"]);
        assert!(cli.validate().unwrap_err().contains("--num-runs"));

        let cli = Cli::parse_from(["netstats", "traceroute", "-o", "a.json", "-g", "a.svg"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_seconds_parsing() {
        assert_eq!(parse_seconds("1").unwrap(), 1.0);
        assert_eq!(parse_seconds("0.2").unwrap(), 0.2);
        assert_eq!(parse_seconds("0").unwrap(), 0.0);

        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("abc").is_err());
        assert!(parse_seconds("inf").is_err());
        assert!(parse_seconds("NaN").is_err());
        assert!(parse_seconds("3601").is_err());
    }
}
