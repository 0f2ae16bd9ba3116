//! Cross-run aggregation
//!
//! Both aggregators combine per-run *summaries*, not raw samples: the mean of
//! a hop is the mean of the per-run means, the median is the median of the
//! per-run medians, and so on. Pooling raw samples would give different
//! numbers.

use super::{max, mean, median, min, round_to};
use crate::{
    error::{AppError, Result},
    models::metrics::{AggregatedHop, AggregatedPingSummary, Hop, HostPair, PingSummary},
};
use std::collections::BTreeMap;

/// Decimal places kept for aggregated averages
pub const AVG_DECIMALS: u32 = 3;

/// Pool all four values of every run summary and recompute over the pool
pub fn aggregate_ping(summaries: &[PingSummary]) -> Result<AggregatedPingSummary> {
    let pooled: Vec<f64> = summaries
        .iter()
        .flat_map(|s| [s.min, s.med, s.avg, s.max])
        .collect();

    let empty = || AppError::statistics("Cannot aggregate zero ping summaries");

    Ok(AggregatedPingSummary {
        avg: round_to(mean(&pooled).ok_or_else(empty)?, AVG_DECIMALS),
        max: max(&pooled).ok_or_else(empty)?,
        med: median(&pooled).ok_or_else(empty)?,
        min: min(&pooled).ok_or_else(empty)?,
    })
}

/// Per-hop-number pools collected across runs
#[derive(Debug, Clone, Default)]
pub struct HopAccumulator {
    hosts: Vec<HostPair>,
    mins: Vec<f64>,
    meds: Vec<f64>,
    avgs: Vec<f64>,
    maxes: Vec<f64>,
}

impl HopAccumulator {
    /// Start a pool seeded by the first run reporting this hop
    pub fn new(first: &Hop) -> Self {
        let mut acc = Self {
            hosts: first.hosts.clone(),
            ..Self::default()
        };
        acc.push(first);
        acc
    }

    /// Add one run's statistics; hosts of later runs are ignored
    pub fn push(&mut self, hop: &Hop) {
        self.mins.push(hop.min);
        self.meds.push(hop.med);
        self.avgs.push(hop.avg);
        self.maxes.push(hop.max);
    }

    /// Number of runs that reported this hop
    pub fn run_count(&self) -> usize {
        self.avgs.len()
    }

    /// Collapse the pools into one record
    pub fn finish(self, hop: u32) -> Option<AggregatedHop> {
        Some(AggregatedHop {
            avg: round_to(mean(&self.avgs)?, AVG_DECIMALS),
            hop,
            hosts: self.hosts,
            max: max(&self.maxes)?,
            med: median(&self.meds)?,
            min: min(&self.mins)?,
        })
    }
}

/// Group hops by number across runs and aggregate each group
///
/// Output is sorted ascending by hop number. A hop number seen in only some
/// runs is aggregated over those runs alone.
pub fn aggregate_hops(runs: &[Vec<Hop>]) -> Vec<AggregatedHop> {
    let mut by_hop: BTreeMap<u32, HopAccumulator> = BTreeMap::new();

    for run in runs {
        for hop in run {
            by_hop
                .entry(hop.hop)
                .and_modify(|acc| acc.push(hop))
                .or_insert_with(|| HopAccumulator::new(hop));
        }
    }

    by_hop
        .into_iter()
        .filter_map(|(number, acc)| acc.finish(number))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metrics::LatencySummary;

    fn summary(min: f64, med: f64, avg: f64, max: f64) -> LatencySummary {
        LatencySummary { avg, max, med, min }
    }

    fn hop(number: u32, host: &str, s: LatencySummary) -> Hop {
        Hop::with_summary(number, vec![HostPair::new(host, format!("({})", host))], s)
    }

    #[test]
    fn test_aggregate_ping_pools_all_values() {
        let runs = [summary(1.0, 2.0, 3.0, 4.0), summary(2.0, 3.0, 4.0, 5.0)];
        let agg = aggregate_ping(&runs).unwrap();

        assert_eq!(agg.min, 1.0);
        assert_eq!(agg.max, 5.0);
        assert_eq!(agg.med, 3.0);
        assert_eq!(agg.avg, 3.0);
    }

    #[test]
    fn test_aggregate_ping_rounds_avg() {
        let runs = [summary(1.0, 1.0, 1.0, 2.0), summary(1.0, 1.0, 1.0, 1.0), summary(1.0, 1.0, 1.0, 1.0)];
        let agg = aggregate_ping(&runs).unwrap();
        // 13 / 12 = 1.08333...
        assert_eq!(agg.avg, 1.083);
    }

    #[test]
    fn test_aggregate_ping_single_run() {
        let agg = aggregate_ping(&[summary(10.0, 20.0, 20.0, 30.0)]).unwrap();
        assert_eq!(agg.min, 10.0);
        assert_eq!(agg.max, 30.0);
        assert_eq!(agg.med, 20.0);
        assert_eq!(agg.avg, 20.0);
    }

    #[test]
    fn test_aggregate_ping_empty_is_error() {
        let err = aggregate_ping(&[]).unwrap_err();
        assert_eq!(err.category(), "STATS");
    }

    #[test]
    fn test_aggregate_hops_partial_runs() {
        let run_a = vec![
            hop(1, "gw-a", summary(1.0, 2.0, 2.0, 3.0)),
            hop(2, "isp-a", summary(10.0, 11.0, 12.0, 14.0)),
        ];
        let run_b = vec![hop(1, "gw-b", summary(2.0, 4.0, 5.0, 9.0))];

        let agg = aggregate_hops(&[run_a, run_b]);
        assert_eq!(agg.len(), 2);

        let first = &agg[0];
        assert_eq!(first.hop, 1);
        assert_eq!(first.min, 1.0);
        assert_eq!(first.max, 9.0);
        assert_eq!(first.med, 3.0);
        assert_eq!(first.avg, 3.5);
        assert_eq!(first.hosts, vec![HostPair::new("gw-a", "(gw-a)")]);

        let second = &agg[1];
        assert_eq!(second.hop, 2);
        assert_eq!(second.summary(), summary(10.0, 11.0, 12.0, 14.0));
        assert_eq!(second.hosts, vec![HostPair::new("isp-a", "(isp-a)")]);
    }

    #[test]
    fn test_aggregate_hops_avg_tie_rounds_to_even() {
        let run_a = vec![hop(1, "gw", summary(16.0, 16.125, 16.125, 16.25))];
        let run_b = vec![hop(1, "gw", summary(15.9, 16.0, 16.0, 16.1))];

        let agg = aggregate_hops(&[run_a, run_b]);
        // (16.125 + 16.0) / 2 = 16.0625 exactly
        assert_eq!(agg[0].avg, 16.062);
        assert_eq!(agg[0].med, 16.0625);
    }

    #[test]
    fn test_aggregate_ping_avg_tie_rounds_to_even() {
        let runs = [summary(16.0, 16.0, 16.0, 16.0), summary(16.0, 16.0, 16.0, 16.5)];
        let agg = aggregate_ping(&runs).unwrap();
        // 128.5 / 8 = 16.0625 exactly
        assert_eq!(agg.avg, 16.062);
    }

    #[test]
    fn test_aggregate_hops_sorted_by_hop_number() {
        let run_a = vec![hop(4, "d", summary(4.0, 4.0, 4.0, 4.0))];
        let run_b = vec![
            hop(2, "b", summary(2.0, 2.0, 2.0, 2.0)),
            hop(3, "c", summary(3.0, 3.0, 3.0, 3.0)),
        ];
        let run_c = vec![hop(1, "a", summary(1.0, 1.0, 1.0, 1.0))];

        let numbers: Vec<u32> = aggregate_hops(&[run_a, run_b, run_c]).iter().map(|h| h.hop).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_aggregate_hops_hosts_from_first_run_even_when_empty() {
        let mut silent = hop(1, "x", summary(1.0, 1.0, 1.0, 1.0));
        silent.hosts.clear();
        let named = hop(1, "named", summary(2.0, 2.0, 2.0, 2.0));

        let agg = aggregate_hops(&[vec![silent], vec![named]]);
        assert!(agg[0].hosts.is_empty());
    }

    #[test]
    fn test_aggregate_hops_empty() {
        assert!(aggregate_hops(&[]).is_empty());
        assert!(aggregate_hops(&[Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn test_accumulator_counts_runs() {
        let first = hop(1, "a", summary(1.0, 1.0, 1.0, 1.0));
        let mut acc = HopAccumulator::new(&first);
        acc.push(&hop(1, "b", summary(2.0, 2.0, 2.0, 2.0)));
        assert_eq!(acc.run_count(), 2);
    }
}
