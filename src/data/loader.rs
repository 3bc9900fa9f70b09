use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::data::record::TrialRecord;
use crate::error::{Error, Result};

/// Load a JSON-lines file, one harness record per line.
pub fn load_records_jsonl(path: impl AsRef<Path>) -> Result<Vec<TrialRecord>> {
    let path = path.as_ref();
    debug!("Loading records from {}", path.display());
    let file = File::open(path)?;
    read_records_jsonl(file)
}

/// Blank lines are skipped; any other line must be a well-formed record.
pub fn read_records_jsonl(reader: impl Read) -> Result<Vec<TrialRecord>> {
    let mut records = Vec::new();

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).map_err(|e| Error::MalformedRecord {
            line: line_no,
            reason: e.to_string(),
        })?;
        records.push(TrialRecord::from_json(&value, line_no)?);
    }

    Ok(records)
}
