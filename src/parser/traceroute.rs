//! Traceroute output parsing
//!
//! Typical input:
//!
//! ```text
//! traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets
//!  1  gateway (192.168.1.1)  1.123 ms  0.998 ms  1.045 ms
//!  2  * * *
//!  3  core1.isp.net (10.20.0.1)  8.512 ms edge.isp.net (10.20.0.9)  9.004 ms  8.871 ms
//! ```

use super::lexer::{lex_line, Token};
use crate::models::metrics::{Hop, HostPair};

/// One hop line reduced to its raw parts
#[derive(Debug, Clone, PartialEq)]
pub struct HopLine {
    pub hop: u32,
    pub hosts: Vec<HostPair>,
    pub samples: Vec<f64>,
}

impl HopLine {
    /// Summarize into a hop record; `None` when no probe answered
    pub fn into_hop(self) -> Option<Hop> {
        Hop::from_samples(self.hop, self.hosts, &self.samples)
    }
}

/// Reduce one line to its hop number, host pairs and latency samples
///
/// Returns `None` for lines that do not start with a hop number, which
/// covers the `traceroute to ...` header and blank lines.
pub fn parse_hop_line(line: &str) -> Option<HopLine> {
    let line = line.trim();
    let (first, rest) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest),
        None => (line, ""),
    };
    let hop: u32 = first.parse().ok()?;

    let tokens = lex_line(rest);
    let mut hosts: Vec<HostPair> = Vec::new();
    let mut samples = Vec::new();

    let mut cursor = 0;
    while cursor < tokens.len() {
        match &tokens[cursor] {
            // Orphaned annotation; IPs are only consumed right after a hostname
            Token::Paren(_) => {}
            Token::Number(value) => samples.push(*value),
            Token::Word(name) => {
                if let Some(Token::Paren(ip)) = tokens.get(cursor + 1) {
                    let pair = HostPair::new(*name, *ip);
                    if !hosts.contains(&pair) {
                        hosts.push(pair);
                    }
                    cursor += 1;
                }
                // A word without an IP (`*`, `ms`, `!H`, bare names) records nothing
            }
        }
        cursor += 1;
    }

    Some(HopLine { hop, hosts, samples })
}

/// Parse a whole traceroute run into hop records, in output order
///
/// Hops whose probes all timed out are omitted.
pub fn parse_traceroute_output(output: &str) -> Vec<Hop> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_hop_line)
        .filter_map(HopLine::into_hop)
        .collect()
}
