//! Data models and structures for netstats

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::{Config, PipelineConfig, PingConfig, TracerouteConfig, OutputPaths};
pub use metrics::{LatencySummary, PingSummary, AggregatedPingSummary, HostPair, Hop, AggregatedHop};
