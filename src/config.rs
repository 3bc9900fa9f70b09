use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Thread counts the harness is run with; every panel shares this tick set.
pub const DEFAULT_X_TICKS: [u32; 8] = [4, 8, 12, 16, 20, 24, 28, 32];

/// Display labels for raw workload and algorithm keys.
///
/// Keys missing from a table are shown verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelTables {
    #[serde(default)]
    pub workloads: BTreeMap<String, String>,
    #[serde(default)]
    pub algorithms: BTreeMap<String, String>,
}

impl Default for LabelTables {
    fn default() -> Self {
        let workloads = [
            ("./workload/rand_insert.txt", "Random Insert"),
            ("./workload/seq_insert.txt", "Sequential Insert"),
            (
                "./workload/seq_insert_with_hc_read.txt",
                "Sequential Insert with High Conflict Read",
            ),
            (
                "./workload/rand_insert_with_hc_read.txt",
                "Random Insert with High Conflict Read",
            ),
        ];
        let algorithms = [("baseline", "Baseline"), ("RingBufferedBTree", "Buffered")];

        Self {
            workloads: workloads
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            algorithms: algorithms
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl LabelTables {
    pub fn empty() -> Self {
        Self {
            workloads: BTreeMap::new(),
            algorithms: BTreeMap::new(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn workload_label(&self, key: &str) -> String {
        remap(&self.workloads, key)
    }

    pub fn algorithm_label(&self, key: &str) -> String {
        remap(&self.algorithms, key)
    }
}

fn remap(table: &BTreeMap<String, String>, key: &str) -> String {
    table.get(key).cloned().unwrap_or_else(|| key.to_string())
}

#[derive(Clone, Debug)]
pub struct WorkloadSettings {
    pub count: usize,
    pub reads: usize,
    pub output_dir: PathBuf,
    // Fixed seed for reproducible random traces
    pub seed: Option<u64>,
}

impl WorkloadSettings {
    pub fn new(count: usize, reads: usize) -> Self {
        Self {
            count,
            reads,
            output_dir: PathBuf::from("./workload/"),
            seed: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlotSettings {
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Vec<u32>,
    pub output_dir: PathBuf,
    pub panel_height: usize,
    pub width: usize,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            x_label: "# Threads".to_string(),
            y_label: "M ops/sec".to_string(),
            x_ticks: DEFAULT_X_TICKS.to_vec(),
            output_dir: PathBuf::from("."),
            panel_height: 400,
            width: 900,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_pass_through() {
        let labels = LabelTables::default();
        assert_eq!(labels.algorithm_label("baseline"), "Baseline");
        assert_eq!(labels.algorithm_label("OptLock"), "OptLock");
        assert_eq!(
            labels.workload_label("./workload/seq_insert.txt"),
            "Sequential Insert"
        );
        assert_eq!(LabelTables::empty().workload_label("x"), "x");
    }

    #[test]
    fn partial_table_parses() {
        let labels: LabelTables =
            serde_json::from_str(r#"{"algorithms": {"a": "Algo A"}}"#).unwrap();
        assert!(labels.workloads.is_empty());
        assert_eq!(labels.algorithm_label("a"), "Algo A");
    }
}
