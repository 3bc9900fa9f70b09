use comfy_table::Table;

use crate::metrics::summary::SummaryPoint;

/// Console table of one series, throughput in M ops/sec.
pub fn summary_table(workload: &str, algorithm: &str, points: &[SummaryPoint]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        format!("{workload} / {algorithm}"),
        "min".to_string(),
        "median".to_string(),
        "max".to_string(),
    ]);
    for p in points {
        table.add_row(vec![
            p.thread_count.to_string(),
            format!("{:.3}", p.min_throughput),
            format!("{:.3}", p.median_throughput),
            format!("{:.3}", p.max_throughput),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_point() {
        let points = vec![
            SummaryPoint {
                thread_count: 4,
                min_throughput: 1.0,
                max_throughput: 2.0,
                median_throughput: 1.5,
            },
            SummaryPoint {
                thread_count: 8,
                min_throughput: 2.0,
                max_throughput: 4.0,
                median_throughput: 3.25,
            },
        ];
        let rendered = summary_table("Random Insert", "Baseline", &points).to_string();
        assert!(rendered.contains("Random Insert / Baseline"));
        assert!(rendered.contains("3.250"));
        assert!(rendered.contains("1.500"));
    }
}
