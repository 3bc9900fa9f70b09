use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::data::record::TrialRecord;
use crate::error::{Error, Result};

/// Raw throughput is divided by this before any statistic, giving M ops/sec.
pub const THROUGHPUT_SCALE: f64 = 1_000_000.0;

/// Order statistics of one (workload, algorithm, thread_count) group, in M ops/sec.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryPoint {
    pub thread_count: u32,
    pub min_throughput: f64,
    pub max_throughput: f64,
    pub median_throughput: f64,
}

/// Summarize records per thread count, sorted by ascending thread count.
///
/// Fails with `EmptyInput` when `records` is empty; callers skip such series.
pub fn summarize(records: &[TrialRecord]) -> Result<Vec<SummaryPoint>> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut by_threads: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for r in records {
        by_threads
            .entry(r.thread_count)
            .or_default()
            .push(r.throughput / THROUGHPUT_SCALE);
    }

    by_threads
        .into_iter()
        .map(|(thread_count, mut values)| {
            values.sort_by_key(|v| OrderedFloat(*v));
            let median_throughput = median_sorted(&values).ok_or(Error::EmptyInput)?;
            Ok(SummaryPoint {
                thread_count,
                min_throughput: values[0],
                max_throughput: values[values.len() - 1],
                median_throughput,
            })
        })
        .collect()
}

/// Sample median; the two middle values are averaged for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by_key(|v| OrderedFloat(*v));
    median_sorted(&sorted)
}

fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(threads: u32, ops: f64) -> TrialRecord {
        TrialRecord::new("w", "a", threads, ops)
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn groups_by_threads_and_scales() {
        let records = vec![
            rec(8, 3_000_000.0),
            rec(4, 1_000_000.0),
            rec(8, 1_000_000.0),
            rec(4, 3_000_000.0),
            rec(8, 2_000_000.0),
            rec(4, 2_000_000.0),
            rec(4, 6_000_000.0),
        ];
        let points = summarize(&records).unwrap();
        assert_eq!(
            points,
            vec![
                SummaryPoint {
                    thread_count: 4,
                    min_throughput: 1.0,
                    max_throughput: 6.0,
                    median_throughput: 2.5,
                },
                SummaryPoint {
                    thread_count: 8,
                    min_throughput: 1.0,
                    max_throughput: 3.0,
                    median_throughput: 2.0,
                },
            ]
        );
        for p in &points {
            assert!(p.min_throughput <= p.median_throughput);
            assert!(p.median_throughput <= p.max_throughput);
        }
    }

    #[test]
    fn singleton_partition_collapses() {
        let points = summarize(&[rec(16, 4_200_000.0)]).unwrap();
        assert_eq!(points.len(), 1);
        let p = &points[0];
        assert_eq!(p.min_throughput, 4.2);
        assert_eq!(p.median_throughput, 4.2);
        assert_eq!(p.max_throughput, 4.2);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(summarize(&[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn summarize_is_repeatable() {
        let records = vec![rec(32, 5.0), rec(4, 7.0), rec(32, 1.0), rec(12, 2.0)];
        let first = summarize(&records).unwrap();
        for _ in 0..3 {
            assert_eq!(summarize(&records).unwrap(), first);
        }
    }
}
