mod cli;
mod error;
mod fetch;
mod logging;

use std::collections::BTreeSet;
use std::ops::Deref;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use exn::ResultExt;
use futures::StreamExt;
use gridfetch_dates::DateRange;
use gridfetch_plan::{CrosswordType, DownloadTarget};
use tracing::{error, info};

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};

/// Puzzle pipelines in flight at once. Targets are fully independent, so
/// this is purely a politeness bound on the source site.
const CONCURRENT_TARGETS: usize = 4;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(Outcome { saved, failed }) if failed == 0 || saved > 0 => {
            if failed > 0 {
                error!(saved, failed, "finished with failures");
            }
            ExitCode::SUCCESS
        },
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e.deref());
            ExitCode::FAILURE
        },
    }
}

struct Outcome {
    saved: usize,
    failed: usize,
}

async fn run(cli: Cli) -> Result<Outcome> {
    let range =
        gridfetch_dates::resolve(cli.date.as_deref(), gridfetch_dates::DEFAULT_ZONE, chrono::Utc::now())
            .or_raise(|| ErrorKind::Dates)?;
    let kinds: BTreeSet<CrosswordType> = cli.types.iter().copied().collect();
    let output_root = normalize_output(cli.output, &kinds, &range);
    let targets = gridfetch_plan::plan(&kinds, &range, &output_root);
    info!(targets = targets.len(), "planned downloads");

    let client = fetch::client()?;
    let results: Vec<_> = futures::stream::iter(targets)
        .map(|target| {
            let client = client.clone();
            async move {
                let outcome = process(&client, &target).await;
                (target, outcome)
            }
        })
        .buffer_unordered(CONCURRENT_TARGETS)
        .collect()
        .await;

    let mut outcome = Outcome { saved: 0, failed: 0 };
    for (target, result) in results {
        match result {
            Ok(()) => {
                outcome.saved += 1;
                info!(
                    kind = %target.kind,
                    date = %target.date,
                    path = %target.destination.display(),
                    "saved puzzle"
                );
            },
            // One bad target never aborts the others.
            Err(e) => {
                outcome.failed += 1;
                error!(
                    kind = %target.kind,
                    date = %target.date,
                    error = %e.deref(),
                    "failed to process puzzle"
                );
            },
        }
    }
    Ok(outcome)
}

/// Fetch → extract → encode → write, for one target.
async fn process(client: &reqwest::Client, target: &DownloadTarget) -> Result<()> {
    let html = fetch::page(client, target.kind, target.date).await?;
    let payload = gridfetch_extract::extract(&html).or_raise(|| ErrorKind::Extract)?;
    let puzzle = payload.into_puzzle(target.kind, target.date).or_raise(|| ErrorKind::Extract)?;
    let bytes = puzzle.encode().or_raise(|| ErrorKind::Encode)?;

    if let Some(parent) = target.destination.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .or_raise(|| ErrorKind::OutputDir(parent.to_path_buf()))?;
    }
    tokio::fs::write(&target.destination, &bytes)
        .await
        .or_raise(|| ErrorKind::Write(target.destination.clone()))
}

/// The planner treats a lone target's output path as the destination file
/// itself; an extensionless path was almost certainly meant as a directory,
/// so the derived filename is appended before planning.
fn normalize_output(output: PathBuf, kinds: &BTreeSet<CrosswordType>, range: &DateRange) -> PathBuf {
    if kinds.len() == 1
        && range.num_days() == 1
        && output.extension().is_none()
        && let Some(kind) = kinds.iter().next()
    {
        return output.join(format!("{}-{kind}.puz", range.start()));
    }
    output
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lone_target_with_filename_passes_through() {
        let kinds = BTreeSet::from([CrosswordType::Mini]);
        let range = DateRange::single(date(2025, 2, 1));
        let output = normalize_output(PathBuf::from("monday.puz"), &kinds, &range);
        assert_eq!(output, PathBuf::from("monday.puz"));
    }

    #[test]
    fn lone_target_with_directory_gains_a_filename() {
        let kinds = BTreeSet::from([CrosswordType::Mini]);
        let range = DateRange::single(date(2025, 2, 1));
        let output = normalize_output(PathBuf::from("puzzles"), &kinds, &range);
        assert_eq!(output, PathBuf::from("puzzles/2025-02-01-mini.puz"));
    }

    #[test]
    fn multi_target_output_is_left_alone() {
        let kinds = BTreeSet::from([CrosswordType::Cryptic, CrosswordType::Quick]);
        let range = DateRange::single(date(2025, 2, 1));
        let output = normalize_output(PathBuf::from("puzzles"), &kinds, &range);
        assert_eq!(output, PathBuf::from("puzzles"));
    }
}
