use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use treebench::config::{LabelTables, PlotSettings, WorkloadSettings};
use treebench::data::loader::load_records_jsonl;
use treebench::data::store::RecordStore;
use treebench::metrics::summary::summarize;
use treebench::metrics::table::summary_table;
use treebench::plot::figure::{figure_file_name, render_comparison_figure, render_workload_figures};
use treebench::workload::synth::write_standard_workloads;
use treebench::Error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ordered-index benchmark workloads and result plots")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the standard operation traces for the harness
    GenerateWorkload {
        #[arg(long)]
        count: usize,
        #[arg(long)]
        reads: usize,
        #[arg(long, default_value = "./workload/")]
        output_dir: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Summarize harness results and plot them
    AggregateAndPlot {
        /// JSON-lines file, one trial per line
        input: PathBuf,
        /// JSON file with `workloads`/`algorithms` label tables
        #[arg(long, conflicts_with = "no_labels")]
        labels: Option<PathBuf>,
        /// Show raw keys instead of display labels
        #[arg(long)]
        no_labels: bool,
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Workloads (display labels) to stack into one comparison figure
        #[arg(long, num_args = 2..)]
        compare: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::GenerateWorkload {
            count,
            reads,
            output_dir,
            seed,
        } => {
            let settings = WorkloadSettings {
                output_dir,
                seed,
                ..WorkloadSettings::new(count, reads)
            };
            let written = write_standard_workloads(&settings)
                .with_context(|| format!("Failed to generate workloads in {}", settings.output_dir.display()))?;
            info!("Generated {} traces", written.len());
        }
        Command::AggregateAndPlot {
            input,
            labels,
            no_labels,
            output_dir,
            compare,
        } => {
            let labels = match (labels, no_labels) {
                (Some(path), _) => LabelTables::from_path(&path)
                    .with_context(|| format!("Failed to read label tables {}", path.display()))?,
                (None, true) => LabelTables::empty(),
                (None, false) => LabelTables::default(),
            };
            let records = load_records_jsonl(&input)
                .with_context(|| format!("Failed to load {}", input.display()))?;
            let store = RecordStore::from_records(records, &labels)?;
            if store.is_empty() {
                bail!("{} contains no records", input.display());
            }

            print_summaries(&store)?;

            let settings = PlotSettings {
                output_dir,
                ..PlotSettings::default()
            };
            std::fs::create_dir_all(&settings.output_dir)
                .with_context(|| format!("Failed to create {}", settings.output_dir.display()))?;

            let written = render_workload_figures(&store, &settings)?;
            info!("Wrote {} workload figures", written.len());

            if !compare.is_empty() {
                let algorithms = store.distinct_algorithms().to_vec();
                let pairs: Vec<(String, Vec<String>)> = compare
                    .iter()
                    .map(|w| (w.clone(), algorithms.clone()))
                    .collect();
                let names: Vec<&str> = compare.iter().map(String::as_str).collect();
                let path = settings.output_dir.join(figure_file_name(&names));
                render_comparison_figure(&store, &pairs, &settings, &path)
                    .with_context(|| format!("Failed to render {}", path.display()))?;
            }
        }
    }

    Ok(())
}

fn print_summaries(store: &RecordStore) -> anyhow::Result<()> {
    for workload in store.distinct_workloads() {
        for algorithm in store.distinct_algorithms() {
            match summarize(store.subset(workload, algorithm)) {
                Ok(points) => println!("{}", summary_table(workload, algorithm, &points)),
                Err(Error::EmptyInput) => warn!("No records for {} / {}", workload, algorithm),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}
