mod dedup;
mod lsh;
mod shingle;
mod util;

use anyhow::Result;
use clap::Parser;
use sentence_dedup::error::EngineError;
use sentence_dedup::util::read_candidate_file;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Groups near-duplicate sentences from a candidate file with MinHash/LSH.
#[derive(Parser)]
#[command(name = "sentence-dedup-grouper")]
struct Args {
    /// Candidate file (`id,text` csv) produced by sentence-dedup-prepare.
    #[arg(long)]
    candidate_path: PathBuf,
    /// Directory for the per-threshold group files.
    #[arg(long, default_value = "outputs")]
    out_dir: PathBuf,
    /// Similarity of two near duplicates; several values may be given and
    /// each produces its own group file from the same signatures.
    #[arg(long, num_args = 1.., default_values_t = [0.9])]
    sim_thresholds: Vec<f64>,
    /// Shingle width in words; preserves word order to some extent.
    #[arg(long, default_value_t = 2)]
    shingle_size: usize,
    /// A group is kept only when it holds strictly more sentences than this.
    #[arg(long, default_value_t = 5)]
    group_size: usize,
    /// Number of hash permutations per signature.
    #[arg(long, default_value_t = 128)]
    num_perm: usize,
    /// Seed for the hash permutations, fixed for reproducible runs.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Worker threads for signature computation; defaults to all cores.
    #[arg(long)]
    workers: Option<usize>,
}

fn validate(args: &Args) -> Result<(), EngineError> {
    for &threshold in &args.sim_thresholds {
        if threshold <= 0.0 || threshold >= 1.0 {
            return Err(EngineError::invalid_config(format!(
                "sim-threshold {threshold} must lie strictly between 0 and 1"
            )));
        }
    }
    if args.shingle_size < 1 {
        return Err(EngineError::invalid_config("shingle-size must be at least 1"));
    }
    if args.group_size < 1 {
        return Err(EngineError::invalid_config("group-size must be at least 1"));
    }
    if args.num_perm < 1 {
        return Err(EngineError::invalid_config("num-perm must be at least 1"));
    }
    if args.workers == Some(0) {
        return Err(EngineError::invalid_config("workers must be at least 1"));
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();
    let args = Args::parse();
    validate(&args)?;
    if let Some(workers) = args.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()?;
    }
    std::fs::create_dir_all(&args.out_dir)?;

    let start = Instant::now();
    let records = read_candidate_file(&args.candidate_path)?;
    info!(
        records = records.len(),
        secs = start.elapsed().as_secs_f64(),
        "loaded candidate file"
    );

    let permutations = lsh::permutations(args.num_perm, args.seed);
    let start = Instant::now();
    let signature_set = dedup::SignatureSet::build(&records, args.shingle_size, &permutations);
    info!(
        signatures = signature_set.len(),
        excluded = signature_set.excluded(),
        secs = start.elapsed().as_secs_f64(),
        "computed signatures"
    );
    drop(records);
    if signature_set.is_empty() {
        warn!("no usable records, group files will be empty");
    }

    for &threshold in &args.sim_thresholds {
        let start = Instant::now();
        let groups = dedup::group(&signature_set, threshold, args.group_size);
        let path = util::write_group_file(&args.out_dir, threshold, &groups)?;
        info!(
            threshold,
            groups = groups.len(),
            path = %path.display(),
            secs = start.elapsed().as_secs_f64(),
            "grouped near duplicates"
        );
    }
    Ok(())
}
