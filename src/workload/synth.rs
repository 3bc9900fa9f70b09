use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::WorkloadSettings;
use crate::error::{Error, Result};
use crate::workload::trace::{Operation, OperationTrace};

/// Random keys are drawn from `[RAND_MIN, RAND_MAX)`.
pub const RAND_MIN: u64 = 0;
pub const RAND_MAX: u64 = 1 << 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySource {
    Sequential,
    Random,
}

/// Keys `0..n` in order.
pub fn sequential_insert(n: usize) -> OperationTrace {
    OperationTrace::new(sequential_keys(n).map(Operation::insert).collect())
}

/// `n` uniformly random keys, duplicates kept.
pub fn random_insert<R: Rng>(n: usize, rng: &mut R) -> OperationTrace {
    OperationTrace::new(random_keys(n, rng).into_iter().map(Operation::insert).collect())
}

/// Every insert is immediately followed by a read of the same key; then reads are
/// dropped uniformly at random until exactly `n_reads` remain.
pub fn insert_with_conflicting_reads<R: Rng>(
    n: usize,
    n_reads: usize,
    key_source: KeySource,
    rng: &mut R,
) -> Result<OperationTrace> {
    validate(n, n_reads)?;

    let keys: Vec<u64> = match key_source {
        KeySource::Sequential => sequential_keys(n).collect(),
        KeySource::Random => random_keys(n, rng),
    };

    let ops: Vec<Operation> = keys
        .into_iter()
        .flat_map(|k| [Operation::insert(k), Operation::read(k)])
        .collect();

    // reads sit at the odd positions; pick which of them to drop
    let dropped: HashSet<usize> = index::sample(rng, n, n - n_reads)
        .into_iter()
        .map(|read_idx| 2 * read_idx + 1)
        .collect();

    let ops = ops
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !dropped.contains(i))
        .map(|(_, op)| op)
        .collect();

    Ok(OperationTrace::new(ops))
}

fn validate(n: usize, n_reads: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidParameter(
            "operation count must be positive".into(),
        ));
    }
    if n_reads > n {
        return Err(Error::InvalidParameter(format!(
            "{n_reads} reads requested but only {n} inserts to read after"
        )));
    }
    Ok(())
}

fn sequential_keys(n: usize) -> impl Iterator<Item = u64> {
    0..n as u64
}

fn random_keys<R: Rng>(n: usize, rng: &mut R) -> Vec<u64> {
    (0..n).map(|_| rng.gen_range(RAND_MIN..RAND_MAX)).collect()
}

/// Generate the standard trace set into `settings.output_dir`.
///
/// Parameters are checked before anything touches the filesystem.
pub fn write_standard_workloads(settings: &WorkloadSettings) -> Result<Vec<PathBuf>> {
    validate(settings.count, settings.reads)?;

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let (n, reads) = (settings.count, settings.reads);

    let traces = vec![
        ("seq_insert.txt", sequential_insert(n)),
        ("rand_insert.txt", random_insert(n, &mut rng)),
        (
            "seq_insert_with_hc_read.txt",
            insert_with_conflicting_reads(n, reads, KeySource::Sequential, &mut rng)?,
        ),
        (
            "rand_insert_with_hc_read.txt",
            insert_with_conflicting_reads(n, reads, KeySource::Random, &mut rng)?,
        ),
    ];

    fs::create_dir_all(&settings.output_dir)?;
    let mut written = Vec::with_capacity(traces.len());
    for (name, trace) in traces {
        let path = settings.output_dir.join(name);
        trace.save(&path)?;
        info!(
            "Wrote {} ({} inserts, {} reads)",
            path.display(),
            trace.insert_count(),
            trace.read_count()
        );
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::trace::OperationKind;
    use std::collections::HashMap;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// Every read must target a key inserted at an earlier position.
    fn reads_follow_inserts(trace: &OperationTrace) -> bool {
        let mut seen = HashSet::new();
        trace.iter().all(|op| match op.kind {
            OperationKind::Insert => {
                seen.insert(op.key);
                true
            }
            OperationKind::Read => seen.contains(&op.key),
        })
    }

    #[test]
    fn sequential_insert_exact() {
        let expected: Vec<Operation> = (0..5).map(Operation::insert).collect();
        assert_eq!(sequential_insert(5).as_slice(), expected.as_slice());
    }

    #[test]
    fn random_insert_in_range() {
        let trace = random_insert(1000, &mut rng());
        assert_eq!(trace.len(), 1000);
        assert_eq!(trace.insert_count(), 1000);
        assert!(trace.iter().all(|op| op.key < RAND_MAX));
    }

    #[test]
    fn conflicting_reads_exact_ratio() {
        let trace = insert_with_conflicting_reads(4, 2, KeySource::Sequential, &mut rng()).unwrap();
        assert_eq!(trace.len(), 6);
        assert_eq!(trace.insert_count(), 4);
        assert_eq!(trace.read_count(), 2);
        assert!(reads_follow_inserts(&trace));

        let inserts: Vec<u64> = trace
            .iter()
            .filter(|op| op.kind == OperationKind::Insert)
            .map(|op| op.key)
            .collect();
        assert_eq!(inserts, vec![0, 1, 2, 3]);
    }

    #[test]
    fn conflicting_reads_keep_order_and_adjacency() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trace =
                insert_with_conflicting_reads(50, 17, KeySource::Random, &mut rng).unwrap();
            assert_eq!(trace.insert_count(), 50);
            assert_eq!(trace.read_count(), 17);

            let ops = trace.as_slice();
            for (i, op) in ops.iter().enumerate() {
                if op.kind == OperationKind::Read {
                    assert!(i > 0);
                    assert_eq!(ops[i - 1], Operation::insert(op.key));
                }
            }
        }
    }

    #[test]
    fn all_reads_kept_when_equal() {
        let trace = insert_with_conflicting_reads(3, 3, KeySource::Sequential, &mut rng()).unwrap();
        let expected = vec![
            Operation::insert(0),
            Operation::read(0),
            Operation::insert(1),
            Operation::read(1),
            Operation::insert(2),
            Operation::read(2),
        ];
        assert_eq!(trace.as_slice(), expected.as_slice());
    }

    #[test]
    fn zero_reads_leaves_inserts_only() {
        let trace = insert_with_conflicting_reads(10, 0, KeySource::Sequential, &mut rng()).unwrap();
        assert_eq!(trace, sequential_insert(10));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            insert_with_conflicting_reads(4, 6, KeySource::Sequential, &mut rng()),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            insert_with_conflicting_reads(0, 0, KeySource::Random, &mut rng()),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn dropped_reads_are_spread() {
        // with enough seeds every read position should be dropped at least once
        let mut dropped_keys: HashMap<u64, usize> = HashMap::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trace = insert_with_conflicting_reads(5, 4, KeySource::Sequential, &mut rng).unwrap();
            let read_keys: HashSet<u64> = trace
                .iter()
                .filter(|op| op.kind == OperationKind::Read)
                .map(|op| op.key)
                .collect();
            let missing = (0..5).find(|k| !read_keys.contains(k)).unwrap();
            *dropped_keys.entry(missing).or_default() += 1;
        }
        assert_eq!(dropped_keys.len(), 5);
    }
}
