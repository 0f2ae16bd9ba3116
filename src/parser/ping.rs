//! Ping output parsing

use super::lexer::parse_latency;
use crate::models::metrics::PingSummary;

const TIME_PREFIX: &str = "time=";

/// Extract every `time=<value>` latency from ping output, in order
///
/// Lines without the token (header, statistics footer) are ignored and
/// values that do not parse are skipped.
pub fn parse_ping_output(output: &str) -> Vec<f64> {
    output
        .lines()
        .filter(|line| line.contains(TIME_PREFIX))
        .flat_map(|line| line.split_whitespace())
        .filter_map(|token| token.strip_prefix(TIME_PREFIX))
        .filter_map(parse_latency)
        .collect()
}

/// Parse and summarize one ping run; `None` when no reply was parsed
pub fn summarize_ping_output(output: &str) -> Option<PingSummary> {
    PingSummary::from_samples(&parse_ping_output(output))
}
