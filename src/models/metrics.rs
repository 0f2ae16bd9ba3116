//! Latency summary and hop record data models

use crate::stats;
use serde::{Deserialize, Serialize};

/// Five-number proxy over a set of latency samples, in milliseconds
///
/// Field order is the serialized JSON order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub avg: f64,
    pub max: f64,
    pub med: f64,
    pub min: f64,
}

/// Summary of one ping run
pub type PingSummary = LatencySummary;

/// Summary pooled across several ping runs
pub type AggregatedPingSummary = LatencySummary;

impl LatencySummary {
    /// Summarize latency samples, returning `None` when there are none
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        Some(Self {
            avg: stats::mean(samples)?,
            max: stats::max(samples)?,
            med: stats::median(samples)?,
            min: stats::min(samples)?,
        })
    }

    /// Values in boxplot order: min, med, avg, max
    pub fn values(&self) -> [f64; 4] {
        [self.min, self.med, self.avg, self.max]
    }

    /// Spread between the slowest and fastest value
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// A `(hostname, ip)` pair reported at a hop
///
/// The IP keeps the surrounding parentheses as printed by traceroute.
/// Serializes as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostPair(pub String, pub String);

impl HostPair {
    pub fn new<H: Into<String>, I: Into<String>>(hostname: H, ip: I) -> Self {
        Self(hostname.into(), ip.into())
    }

    pub fn hostname(&self) -> &str {
        &self.0
    }

    pub fn ip(&self) -> &str {
        &self.1
    }

    /// IP address without the surrounding parentheses
    pub fn bare_ip(&self) -> &str {
        self.1.trim_start_matches('(').trim_end_matches(')')
    }
}

impl std::fmt::Display for HostPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

/// Latency statistics for one hop number
///
/// Used both for a single traceroute run and for the cross-run aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub avg: f64,
    pub hop: u32,
    pub hosts: Vec<HostPair>,
    pub max: f64,
    pub med: f64,
    pub min: f64,
}

/// Hop statistics pooled across traceroute runs
pub type AggregatedHop = Hop;

impl Hop {
    /// Build a hop record from its samples; `None` when no probe answered
    pub fn from_samples(hop: u32, hosts: Vec<HostPair>, samples: &[f64]) -> Option<Self> {
        LatencySummary::from_samples(samples).map(|summary| Self::with_summary(hop, hosts, summary))
    }

    pub fn with_summary(hop: u32, hosts: Vec<HostPair>, summary: LatencySummary) -> Self {
        Self {
            avg: summary.avg,
            hop,
            hosts,
            max: summary.max,
            med: summary.med,
            min: summary.min,
        }
    }

    pub fn summary(&self) -> LatencySummary {
        LatencySummary {
            avg: self.avg,
            max: self.max,
            med: self.med,
            min: self.min,
        }
    }

    /// First reported hostname, if any
    pub fn primary_host(&self) -> Option<&HostPair> {
        self.hosts.first()
    }
}
