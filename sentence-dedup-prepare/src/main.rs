mod sentence;

use anyhow::Result;
use clap::Parser;
use sentence_dedup::dto::{Record, Review};
use sentence_dedup::util::write_candidate_file;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Converts a review file into an ordered candidate file for the grouper.
#[derive(Parser)]
#[command(name = "sentence-dedup-prepare")]
struct Args {
    /// Review file, one json object with a `text` field per line.
    #[arg(long)]
    review_path: PathBuf,
    /// Where to write the `id,text` candidate csv.
    #[arg(long)]
    candidate_path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();
    let args = Args::parse();

    let file = File::open(&args.review_path)?;
    let mut reviews = 0usize;
    let mut dropped = 0usize;
    let mut records: Vec<Record> = Vec::new();
    for (line_number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let review: Review = serde_json::from_str(&line).map_err(|err| {
            anyhow::anyhow!("{}:{}: {err}", args.review_path.display(), line_number + 1)
        })?;
        reviews += 1;
        for text in sentence::split_sentences(&review.text) {
            if sentence::has_subject_word(&text) {
                dropped += 1;
                continue;
            }
            records.push(Record {
                id: records.len() as u32,
                text,
            });
        }
    }
    write_candidate_file(&args.candidate_path, &records)?;
    info!(
        reviews,
        candidates = records.len(),
        dropped,
        path = %args.candidate_path.display(),
        "wrote candidate file"
    );
    Ok(())
}
