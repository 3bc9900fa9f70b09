use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Insert,
    Read,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "INSERT",
            OperationKind::Read => "READ",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "INSERT" => Ok(OperationKind::Insert),
            "READ" => Ok(OperationKind::Read),
            other => Err(Error::InvalidParameter(format!(
                "unknown operation kind `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub key: u64,
}

impl Operation {
    pub fn insert(key: u64) -> Self {
        Self {
            kind: OperationKind::Insert,
            key,
        }
    }

    pub fn read(key: u64) -> Self {
        Self {
            kind: OperationKind::Read,
            key,
        }
    }
}

/// Ordered operations fed to the benchmark harness.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationTrace {
    ops: Vec<Operation>,
}

impl OperationTrace {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.ops.iter()
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.ops
    }

    pub fn insert_count(&self) -> usize {
        self.count(OperationKind::Insert)
    }

    pub fn read_count(&self) -> usize {
        self.count(OperationKind::Read)
    }

    fn count(&self, kind: OperationKind) -> usize {
        self.ops.iter().filter(|op| op.kind == kind).count()
    }

    /// Tab separated `<kind>\t<key>`, one operation per line, no header.
    pub fn write_tsv(&self, mut out: impl Write) -> Result<()> {
        for op in &self.ops {
            writeln!(out, "{}\t{}", op.kind, op.key)?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_tsv(BufWriter::new(file))
    }

    /// Parse a trace the way the harness reads it: kind and key separated by whitespace.
    pub fn parse(text: &str) -> Result<Self> {
        let mut ops = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let (kind, key) = match (fields.next(), fields.next(), fields.next()) {
                (None, _, _) => continue,
                (Some(kind), Some(key), None) => (kind, key),
                _ => {
                    return Err(Error::InvalidParameter(format!(
                        "line {}: expected `<kind> <key>`",
                        idx + 1
                    )))
                }
            };
            let kind = kind
                .parse::<OperationKind>()
                .map_err(|e| Error::InvalidParameter(format!("line {}: {e}", idx + 1)))?;
            let key = key.parse::<u64>().map_err(|_| {
                Error::InvalidParameter(format!("line {}: key `{key}` is not an integer", idx + 1))
            })?;
            ops.push(Operation { kind, key });
        }
        Ok(Self { ops })
    }
}
