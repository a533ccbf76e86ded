//! blocksort CLI
//!
//! Command-line interface for creating, loading, sorting and searching
//! block files.

use std::path::PathBuf;

use blocksort::sort::SortOutcome;
use blocksort::verify::SortCheck;
use blocksort::{Config, Engine, Field, MismatchPolicy, Result, SearchKey};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// blocksort CLI
#[derive(Parser, Debug)]
#[command(name = "blocksort")]
#[command(about = "Heap files, external merge sort and sorted-file search")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./blocksort_data")]
    data_dir: PathBuf,

    /// Verify intermediate runs while sorting (always on in debug builds)
    #[arg(long)]
    verify_runs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty heap file
    Create {
        /// File name
        file: String,
    },

    /// Append records from a CSV file (id,"name","surname","city")
    Load {
        /// Heap file to append to (created if missing)
        file: String,

        /// CSV input
        csv: PathBuf,
    },

    /// Sort a heap file into <file>_Sorted_<field>
    Sort {
        file: String,

        /// Field number (0-3) or name (id, name, surname, city)
        field: Field,
    },

    /// Check whether a file is sorted by a field
    Check {
        file: String,

        field: Field,

        /// Proceed even if the file is recorded as sorted by another field
        #[arg(long)]
        force: bool,
    },

    /// Print every record of a sorted file
    Scan {
        file: String,
    },

    /// Print records of a sorted file whose field equals a value
    Find {
        file: String,

        field: Field,

        value: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blocksort=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::debug!("blocksort v{}", blocksort::VERSION);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Engine config from the flags; unset flags keep the config defaults
fn build_config(args: &Args) -> Config {
    let mut builder = Config::builder().data_dir(&args.data_dir);
    if args.verify_runs {
        builder = builder.verify_runs(true);
    }
    builder.build()
}

fn run(args: Args) -> Result<()> {
    let engine = Engine::open(build_config(&args))?;

    match args.command {
        Commands::Create { file } => {
            engine.create_file(&file)?;
            println!("Created {}", file);
        }
        Commands::Load { file, csv } => {
            if !engine.file_exists(&file) {
                engine.create_file(&file)?;
            }
            let mut heap = engine.open_file(&file)?;
            let count = blocksort::ingest::load_csv(&mut heap, &csv)?;
            heap.close()?;
            println!("Inserted {} records into {}", count, file);
        }
        Commands::Sort { file, field } => match engine.sort_file(&file, field)? {
            SortOutcome::AlreadySorted { file } => {
                println!("{} is already sorted by {}. Nothing to do", file, field);
            }
            SortOutcome::Sorted(report) => {
                println!(
                    "Sorted {} records into {} ({} runs, {} merge passes)",
                    report.records, report.output, report.initial_runs, report.merge_passes
                );
            }
        },
        Commands::Check { file, field, force } => {
            let policy = if force {
                MismatchPolicy::ProceedAnyway
            } else {
                MismatchPolicy::Abort
            };
            match engine.check_sorted_with(&file, field, policy)? {
                SortCheck::Sorted => println!("{} is sorted by {}", file, field),
                SortCheck::NotSorted { block, slot } => {
                    println!(
                        "{} is NOT sorted by {} (block {}, slot {})",
                        file, field, block, slot
                    );
                }
            }
        }
        Commands::Scan { file } => {
            let result = engine.get_all_entries(&file, None, None)?;
            for record in &result.records {
                println!("{}", record);
            }
            println!("Read {} records", result.records_read);
        }
        Commands::Find { file, field, value } => {
            let key = SearchKey::parse(field, &value)?;
            let result = engine.get_all_entries(&file, Some(field), Some(key.value()))?;
            for record in &result.records {
                println!("{}", record);
            }
            match result.matches() {
                0 => println!("No records found with {} = {}", field, key.value()),
                1 => println!("Found 1 record"),
                n => println!("Found {} records", n),
            }
            println!("Read {} records", result.records_read);
        }
    }
    Ok(())
}
