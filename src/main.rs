//! tweet-tables: flatten collected search results into warehouse tables.
//!
//! Usage:
//!   tweet-tables --input-dir ./collected --warehouse-dir ./dataset
//!   tweet-tables --input-dir ./collected --warehouse-dir ./dataset --schema legacy-a --resume

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tweet_tables::{Collector, FailurePolicy, LocalWarehouse, SchemaVariant};

#[derive(Parser, Debug)]
#[command(name = "tweet-tables")]
#[command(about = "Flatten archive-search NDJSON into normalized warehouse tables", long_about = None)]
struct Args {
    /// Directory holding the collected .jsonl / .jsonl.zst files
    #[arg(long, value_name = "DIR")]
    input_dir: PathBuf,

    /// Scratch directory for intermediate tables, error traces and completion markers
    #[arg(long, value_name = "DIR", default_value = "./collector_work")]
    work_dir: PathBuf,

    /// Directory the tables are loaded into
    #[arg(long, value_name = "DIR")]
    warehouse_dir: PathBuf,

    /// Output layout: native, legacy-a (tcat) or legacy-b (tweetquery)
    #[arg(long, default_value = "native")]
    schema: SchemaVariant,

    /// Records per processing chunk
    #[arg(long, default_value_t = 50_000, value_parser = clap::value_parser!(u64).range(1..))]
    chunk_size: u64,

    /// Expected number of posts, for percent-complete reporting
    #[arg(long)]
    estimated_total: Option<u64>,

    /// Skip inputs completed by an earlier run
    #[arg(long)]
    resume: bool,

    /// Keep going after a file fails instead of aborting the run
    #[arg(long)]
    continue_on_error: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Search query recorded in the dataset description
    #[arg(long)]
    query: Option<String>,

    /// Search window start, recorded with --query
    #[arg(long, default_value = "")]
    start: String,

    /// Search window end, recorded with --query
    #[arg(long, default_value = "")]
    end: String,

    /// Print the run totals as JSON instead of the summary line
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let policy = if args.continue_on_error { FailurePolicy::SkipFile } else { FailurePolicy::AbortRun };
    let mut collector = Collector::new()
        .input_dir(&args.input_dir)
        .work_dir(&args.work_dir)
        .schema(args.schema)
        .chunk_size(usize::try_from(args.chunk_size).unwrap_or(usize::MAX))
        .estimated_total(args.estimated_total)
        .resume(args.resume)
        .failure_policy(policy)
        .progress(!args.no_progress)
        .progress_label(format!("Flattening ({})", args.schema));
    if let Some(q) = &args.query {
        collector = collector.provenance(q, &args.start, &args.end);
    }

    let mut warehouse = LocalWarehouse::new(&args.warehouse_dir);
    let report = collector.run(&mut warehouse)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.totals)?);
    } else {
        println!(
            "{} files completed, {} resumed, {} failed; {} posts processed, {} rows loaded into {}",
            report.completed.len(),
            report.resumed.len(),
            report.failed.len(),
            report.totals.rows_processed,
            report.totals.rows_loaded,
            warehouse.root().display()
        );
    }
    for f in &report.failed {
        eprintln!("failed: {} ({})", f.path.display(), f.error);
    }
    Ok(())
}
