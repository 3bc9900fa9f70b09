use tracing::warn;

use crate::data::store::RecordStore;
use crate::error::{Error, Result};
use crate::metrics::summary::{summarize, SummaryPoint};

/// One algorithm's summary points, sorted by thread count.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<SummaryPoint>,
}

impl Series {
    pub fn new(label: &str, mut points: Vec<SummaryPoint>) -> Self {
        points.sort_by_key(|p| p.thread_count);
        Self {
            label: label.to_string(),
            points,
        }
    }

    pub fn error_bars(&self) -> ErrorBars {
        ErrorBars::from_points(&self.points)
    }
}

/// Plot-ready columns: the line follows the medians, bars reach down to min and up to max.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorBars {
    pub x: Vec<u32>,
    pub y: Vec<f64>,
    pub minus: Vec<f64>,
    pub plus: Vec<f64>,
}

impl ErrorBars {
    pub fn from_points(points: &[SummaryPoint]) -> Self {
        Self {
            x: points.iter().map(|p| p.thread_count).collect(),
            y: points.iter().map(|p| p.median_throughput).collect(),
            minus: points
                .iter()
                .map(|p| p.median_throughput - p.min_throughput)
                .collect(),
            plus: points
                .iter()
                .map(|p| p.max_throughput - p.median_throughput)
                .collect(),
        }
    }
}

/// Summarize every algorithm for one workload. Algorithms without records are skipped.
pub fn workload_series(
    store: &RecordStore,
    workload: &str,
    algorithms: &[String],
) -> Result<Vec<Series>> {
    let mut series = Vec::with_capacity(algorithms.len());
    for algorithm in algorithms {
        match summarize(store.subset(workload, algorithm)) {
            Ok(points) => series.push(Series::new(algorithm, points)),
            Err(Error::EmptyInput) => {
                warn!("No records for {} / {}, skipping series", workload, algorithm)
            }
            Err(e) => return Err(e),
        }
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelTables;
    use crate::data::record::TrialRecord;

    fn point(thread_count: u32, min: f64, median: f64, max: f64) -> SummaryPoint {
        SummaryPoint {
            thread_count,
            min_throughput: min,
            max_throughput: max,
            median_throughput: median,
        }
    }

    #[test]
    fn asymmetric_bars() {
        let bars = ErrorBars::from_points(&[point(4, 1.0, 2.0, 5.0), point(8, 3.0, 3.0, 3.0)]);
        assert_eq!(bars.x, vec![4, 8]);
        assert_eq!(bars.y, vec![2.0, 3.0]);
        assert_eq!(bars.minus, vec![1.0, 0.0]);
        assert_eq!(bars.plus, vec![3.0, 0.0]);
    }

    #[test]
    fn series_sorted_by_threads() {
        let s = Series::new("a", vec![point(16, 1.0, 1.0, 1.0), point(4, 1.0, 1.0, 1.0)]);
        let threads: Vec<u32> = s.points.iter().map(|p| p.thread_count).collect();
        assert_eq!(threads, vec![4, 16]);
    }

    #[test]
    fn skips_algorithms_without_records() {
        let records = vec![
            TrialRecord::new("w", "a", 4, 1e6),
            TrialRecord::new("w", "a", 8, 2e6),
            TrialRecord::new("v", "b", 4, 1e6),
        ];
        let store = RecordStore::from_records(records, &LabelTables::empty()).unwrap();
        let algorithms = store.distinct_algorithms().to_vec();
        let series = workload_series(&store, "w", &algorithms).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].label, "a");
        assert_eq!(series[0].points.len(), 2);
    }
}
