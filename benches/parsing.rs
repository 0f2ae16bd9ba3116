//! Parser and aggregation benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use netstats::{
    aggregate_hops, aggregate_ping,
    parser::{lex_line, parse_ping_output, parse_traceroute_output},
    LatencySummary,
};
use std::hint::black_box;

/// Ping output with `count` reply lines
fn ping_output(count: usize) -> String {
    let mut output = String::from("PING example.com (93.184.216.34) 56(84) bytes of data.\n");
    for seq in 1..=count {
        output.push_str(&format!(
            "64 bytes from 93.184.216.34: icmp_seq={} ttl=56 time={}.{:03} ms\n",
            seq, 10 + seq % 40, seq % 1000
        ));
    }
    output.push_str("\n--- example.com ping statistics ---\n");
    output
}

/// Traceroute output with `hops` lines, every fifth hop unanswered
fn traceroute_output(hops: u32) -> String {
    let mut output = String::from("traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets\n");
    for hop in 1..=hops {
        if hop % 5 == 0 {
            output.push_str(&format!("{:2}  * * *\n", hop));
        } else {
            output.push_str(&format!(
                "{:2}  router{}.example.net (10.0.{}.1)  {}.512 ms  {}.433 ms alt{}.example.net (10.1.{}.1)  {}.601 ms\n",
                hop, hop, hop, hop * 2, hop * 2, hop, hop, hop * 2 + 1
            ));
        }
    }
    output
}

fn bench_ping_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ping_parsing");

    for count in [10usize, 100, 1000] {
        let output = ping_output(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &output, |b, output| {
            b.iter(|| parse_ping_output(black_box(output)))
        });
    }

    group.finish();
}

fn bench_traceroute_parsing(c: &mut Criterion) {
    let output = traceroute_output(30);

    c.bench_function("lex_hop_line", |b| {
        b.iter(|| lex_line(black_box(" 3  core1.isp.net (10.20.0.1)  8.512 ms edge.isp.net (10.20.0.9)  9.004 ms")))
    });

    c.bench_function("parse_traceroute_30_hops", |b| {
        b.iter(|| parse_traceroute_output(black_box(&output)))
    });
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for runs in [1usize, 10, 100] {
        let parsed: Vec<_> = (0..runs).map(|_| parse_traceroute_output(&traceroute_output(30))).collect();
        group.bench_with_input(BenchmarkId::new("hops", runs), &parsed, |b, parsed| {
            b.iter(|| aggregate_hops(black_box(parsed)))
        });

        let summaries: Vec<LatencySummary> = (0..runs)
            .filter_map(|i| LatencySummary::from_samples(&[i as f64, i as f64 + 1.0, i as f64 + 5.0]))
            .collect();
        group.bench_with_input(BenchmarkId::new("ping", runs), &summaries, |b, summaries| {
            b.iter(|| aggregate_ping(black_box(summaries)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ping_parsing, bench_traceroute_parsing, bench_aggregation);
criterion_main!(benches);
