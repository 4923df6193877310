use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gridfetch_dates::DateRange;
use tracing::instrument;

use crate::CrosswordType;

/// One unit of work for the fetcher: which puzzle, which day, and where
/// the encoded file lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub kind: CrosswordType,
    pub date: NaiveDate,
    pub destination: PathBuf,
}

/// Crosses the requested types with the resolved dates.
///
/// Dates enumerate ascending; within a date, types follow their declared
/// order (the `BTreeSet` iterates in [`CrosswordType`]'s `Ord`), so the
/// plan is identical across runs for the same request.
///
/// Path policy: a lone type on a lone date treats `output_root` as the
/// destination file itself, filename included. Every other shape derives
/// `<date>-<type>.puz` filenames under `output_root`, inside a per-type
/// subdirectory only when more than one type was requested.
#[instrument(skip_all, fields(kinds = kinds.len(), days = range.num_days()))]
pub fn plan(
    kinds: &BTreeSet<CrosswordType>,
    range: &DateRange,
    output_root: &Path,
) -> Vec<DownloadTarget> {
    if kinds.len() == 1
        && range.num_days() == 1
        && let Some(&kind) = kinds.iter().next()
    {
        return vec![DownloadTarget {
            kind,
            date: range.start(),
            destination: output_root.to_path_buf(),
        }];
    }

    let per_type_dirs = kinds.len() > 1;
    let mut targets = Vec::with_capacity(kinds.len() * range.num_days() as usize);
    for date in range.days() {
        for &kind in kinds {
            let filename = format!("{date}-{kind}.puz");
            let destination = match per_type_dirs {
                true => output_root.join(kind.as_str()).join(filename),
                false => output_root.join(filename),
            };
            targets.push(DownloadTarget { kind, date, destination });
        }
    }
    targets
}
