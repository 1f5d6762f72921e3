//! CLI for aggregating and collating benchmark frame-timing logs.
//!
//! # Usage
//!
//! ```bash
//! # Summarize every <config>_TN<n>.csv in the current directory into tables.csv
//! framestat aggregate
//!
//! # Read the tables back and print one box per configuration
//! framestat collate --input results/tables.csv
//!
//! # Both stages, JSON output, concurrent starts counted as zero difference
//! framestat run --input results/ --tie-policy zero --json
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use framestat::output::{format_dataset, format_report, to_json_pretty};
use framestat::{Aggregator, Collator, Config, DataSet, TiePolicy};

/// Benchmark frame-timing aggregation
#[derive(Parser, Debug)]
#[command(name = "framestat")]
#[command(about = "Aggregate per-trial frame timing logs into per-configuration statistics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level for diagnostics (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize raw trial files into the tables file
    Aggregate(AggregateArgs),
    /// Read the tables file and report per-configuration averages
    Collate(CollateArgs),
    /// Aggregate, then collate the freshly written tables
    Run {
        #[command(flatten)]
        aggregate: AggregateArgs,

        /// Print collated results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct AggregateArgs {
    /// Directory containing the raw measurement files
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// Tables file to write (default: <input>/tables.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resolution when compute and graphics start together: carry or zero
    #[arg(long, default_value = "carry")]
    tie_policy: String,
}

#[derive(Args, Debug)]
struct CollateArgs {
    /// Tables file to read
    #[arg(short, long, default_value = "tables.csv")]
    input: PathBuf,

    /// Print collated results as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { Level::ERROR } else { cli.log_level };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Command::Aggregate(args) => {
            aggregate_config(args).and_then(|config| run_aggregate(config, cli.quiet))
        }
        Command::Collate(args) => {
            let config = Config::new().tables_path(&args.input);
            run_collate(config, args.json)
        }
        Command::Run { aggregate, json } => aggregate_config(aggregate).and_then(|config| {
            run_aggregate(config.clone(), cli.quiet)?;
            run_collate(config, *json)
        }),
    };

    if let Err(message) = result {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

fn aggregate_config(args: &AggregateArgs) -> Result<Config, String> {
    let tie_policy = TiePolicy::from_name(&args.tie_policy).ok_or_else(|| {
        format!(
            "Unknown tie policy '{}'. Available: carry, zero",
            args.tie_policy
        )
    })?;

    let mut config = Config::in_dir(&args.input).tie_policy(tie_policy);
    if let Some(output) = &args.output {
        config = config.tables_path(output);
    }
    Ok(config)
}

fn run_aggregate(config: Config, quiet: bool) -> Result<(), String> {
    let report = Aggregator::new(config).run().map_err(|e| e.to_string())?;
    if !quiet {
        println!("{}", format_report(&report));
    }
    Ok(())
}

fn run_collate(config: Config, json: bool) -> Result<(), String> {
    let datasets: Vec<DataSet> = Collator::new(config).collate().map_err(|e| e.to_string())?;

    if json {
        let text = to_json_pretty(&datasets)
            .map_err(|e| format!("JSON serialization failed: {}", e))?;
        println!("{}", text);
    } else {
        for dataset in &datasets {
            print!("{}", format_dataset(dataset));
        }
        println!("{} dataset(s)", datasets.len());
    }
    Ok(())
}
