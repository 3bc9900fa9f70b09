use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::LabelTables;
use crate::error::{Error, Result};

/// One benchmark trial: a single throughput measurement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub workload: String,
    pub algorithm: String,
    pub thread_count: u32,
    /// Operations per second.
    pub throughput: f64,
}

impl TrialRecord {
    pub fn new(workload: &str, algorithm: &str, thread_count: u32, throughput: f64) -> Self {
        Self {
            workload: workload.to_string(),
            algorithm: algorithm.to_string(),
            thread_count,
            throughput,
        }
    }

    /// Parse one harness record. `line` is only used for error reporting.
    ///
    /// Accepted fields: `workload`, `algor` (or `algorithm`), `num_threads`, `ops_per_sec`.
    pub fn from_json(value: &Value, line: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedRecord { line, reason };

        let obj = value
            .as_object()
            .ok_or_else(|| malformed("record is not an object".into()))?;

        let workload = string_field(obj, &["workload"]).map_err(malformed)?;
        let algorithm = string_field(obj, &["algor", "algorithm"]).map_err(malformed)?;

        let thread_count = field(obj, &["num_threads"])
            .map_err(malformed)?
            .as_u64()
            .filter(|&n| n > 0)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| malformed("num_threads must be a positive integer".into()))?;

        let throughput = field(obj, &["ops_per_sec"])
            .map_err(malformed)?
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .ok_or_else(|| malformed("ops_per_sec must be a non-negative number".into()))?;

        Ok(Self {
            workload,
            algorithm,
            thread_count,
            throughput,
        })
    }

    /// Replace both keys by their display labels.
    pub fn relabel(self, labels: &LabelTables) -> Self {
        Self {
            workload: labels.workload_label(&self.workload),
            algorithm: labels.algorithm_label(&self.algorithm),
            ..self
        }
    }
}

fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> std::result::Result<&'a Value, String> {
    names
        .iter()
        .find_map(|name| obj.get(*name))
        .ok_or_else(|| format!("missing field `{}`", names[0]))
}

fn string_field(obj: &Map<String, Value>, names: &[&str]) -> std::result::Result<String, String> {
    field(obj, names)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("field `{}` must be a string", names[0]))
}
