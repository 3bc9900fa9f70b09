use itertools::Itertools;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

use crate::config::LabelTables;
use crate::data::record::TrialRecord;
use crate::error::{Error, Result};

/// Trial records grouped by (workload, algorithm) display labels.
///
/// Labels are remapped once at load time; records are never modified afterwards.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    n_records: usize,
    workloads: Vec<String>,
    algorithms: Vec<String>,
    groups: HashMap<(String, String), Vec<TrialRecord>>,
}

impl RecordStore {
    /// Parse raw harness records and build the store. Any bad record aborts the load.
    pub fn load(raw: &[Value], labels: &LabelTables) -> Result<Self> {
        let records = raw
            .iter()
            .enumerate()
            .map(|(i, value)| TrialRecord::from_json(value, i + 1))
            .collect::<Result<Vec<_>>>()?;
        Self::from_records(records, labels)
    }

    /// Build the store from already typed records, validating them the same way `load` does.
    pub fn from_records(records: Vec<TrialRecord>, labels: &LabelTables) -> Result<Self> {
        for (i, r) in records.iter().enumerate() {
            if r.thread_count == 0 {
                return Err(Error::MalformedRecord {
                    line: i + 1,
                    reason: "num_threads must be a positive integer".into(),
                });
            }
            if !r.throughput.is_finite() || r.throughput < 0.0 {
                return Err(Error::MalformedRecord {
                    line: i + 1,
                    reason: "ops_per_sec must be a non-negative number".into(),
                });
            }
        }

        let n_records = records.len();
        let records: Vec<TrialRecord> = records.into_iter().map(|r| r.relabel(labels)).collect();

        // first-appearance order keeps figures stable between runs
        let workloads = records.iter().map(|r| r.workload.clone()).unique().collect();
        let algorithms = records.iter().map(|r| r.algorithm.clone()).unique().collect();

        let mut groups: HashMap<(String, String), Vec<TrialRecord>> = HashMap::new();
        for r in records {
            groups
                .entry((r.workload.clone(), r.algorithm.clone()))
                .or_default()
                .push(r);
        }

        let store = Self {
            n_records,
            workloads,
            algorithms,
            groups,
        };
        info!(
            "Loaded {} records ({} workloads, {} algorithms)",
            store.n_records,
            store.workloads.len(),
            store.algorithms.len()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.n_records
    }

    pub fn is_empty(&self) -> bool {
        self.n_records == 0
    }

    pub fn distinct_workloads(&self) -> &[String] {
        &self.workloads
    }

    pub fn distinct_algorithms(&self) -> &[String] {
        &self.algorithms
    }

    /// All records for the pair; empty when nothing matches.
    pub fn subset(&self, workload: &str, algorithm: &str) -> &[TrialRecord] {
        self.groups
            .get(&(workload.to_string(), algorithm.to_string()))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
