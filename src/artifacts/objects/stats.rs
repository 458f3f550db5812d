//! Per-file change statistics of a commit
//!
//! ## Format
//!
//! The input is what `git diff-tree --numstat --shortstat` prints:
//!
//! ```text
//! 12\t3\tsrc/lib.rs
//! -\t-\tassets/logo.png
//!  2 files changed, 12 insertions(+), 3 deletions(-)
//! ```
//!
//! Binary files report `-` instead of line counts. They are kept as files
//! with zero counts and the `binary` flag set, so they still count toward the
//! number of changed files.

use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::BufRead;

static SUMMARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\d+) files? changed(?:, (\d+) insertions?\(\+\))?(?:, (\d+) deletions?\(-\))?\s*$",
    )
    .expect("summary regex is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub insertions: usize,
    pub deletions: usize,
    /// insertions + deletions
    pub lines: usize,
    pub binary: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalStats {
    pub insertions: usize,
    pub deletions: usize,
    pub lines: usize,
    pub files: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    files: BTreeMap<String, FileStats>,
    total: TotalStats,
}

impl Stats {
    pub fn files(&self) -> &BTreeMap<String, FileStats> {
        &self.files
    }

    pub fn total(&self) -> &TotalStats {
        &self.total
    }

    pub fn parse_str(text: &str) -> Result<Self> {
        Self::parse(text.as_bytes())
    }

    /// Parse a numstat block, validating the summary line if there is one
    pub fn parse(reader: impl BufRead) -> Result<Self> {
        let mut stats = Stats::default();
        let mut summary = None;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() {
                continue;
            }

            if let Some(caps) = SUMMARY_REGEX.captures(line) {
                let count = |i: usize| -> Result<usize> {
                    caps.get(i)
                        .map_or(Ok(0), |m| m.as_str().parse())
                        .map_err(|_| Error::parse(line_no, "summary count out of range"))
                };
                summary = Some((line_no, count(1)?, count(2)?, count(3)?));
                continue;
            }

            let (path, file_stats) = Self::parse_numstat_line(line_no, line)?;
            stats.add(path, file_stats);
        }

        if let Some((line_no, files, insertions, deletions)) = summary {
            let total = &stats.total;
            if (files, insertions, deletions) != (total.files, total.insertions, total.deletions) {
                return Err(Error::format(
                    line_no,
                    format!(
                        "summary reports {files} files, {insertions} insertions, {deletions} deletions \
                         but the listing adds up to {} files, {} insertions, {} deletions",
                        total.files, total.insertions, total.deletions
                    ),
                ));
            }
        }

        Ok(stats)
    }

    fn parse_numstat_line(line_no: usize, line: &str) -> Result<(String, FileStats)> {
        let mut parts = line.splitn(3, '\t');
        let (Some(insertions), Some(deletions), Some(path)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::format(
                line_no,
                format!("expected numstat or summary line, got {line:?}"),
            ));
        };
        if path.is_empty() {
            return Err(Error::format(line_no, "numstat line without a path"));
        }

        let count = |value: &str| -> Result<Option<usize>> {
            if value == "-" {
                return Ok(None);
            }
            value.parse().map(Some).map_err(|_| {
                Error::format(line_no, format!("expected a line count or '-', got {value:?}"))
            })
        };
        let insertions = count(insertions)?;
        let deletions = count(deletions)?;

        let binary = insertions.is_none() || deletions.is_none();
        let insertions = insertions.unwrap_or(0);
        let deletions = deletions.unwrap_or(0);

        Ok((
            path.to_string(),
            FileStats {
                insertions,
                deletions,
                lines: insertions + deletions,
                binary,
            },
        ))
    }

    fn add(&mut self, path: String, file_stats: FileStats) {
        if !self.files.contains_key(&path) {
            self.total.files += 1;
        }
        let entry = self.files.entry(path).or_default();
        entry.insertions += file_stats.insertions;
        entry.deletions += file_stats.deletions;
        entry.lines += file_stats.lines;
        entry.binary |= file_stats.binary;

        self.total.insertions += file_stats.insertions;
        self.total.deletions += file_stats.deletions;
        self.total.lines += file_stats.lines;
    }
}
