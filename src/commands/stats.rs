use crate::areas::repository::Repository;
use crate::artifacts::objects::stats::TotalStats;
use anyhow::Context;
use colored::Colorize;
use std::io::Write;

/// Print `--numstat`-style lines for one commit followed by the total
pub fn stats(repository: &Repository, revision: &str, writer: &mut dyn Write) -> anyhow::Result<()> {
    let commit = repository
        .resolve(revision)
        .with_context(|| format!("cannot resolve {revision}"))?;
    let stats = commit
        .stats()
        .with_context(|| format!("cannot compute stats of {commit}"))?;

    for (path, file) in stats.files() {
        if file.binary {
            writeln!(writer, "-\t-\t{path}")?;
        } else {
            writeln!(
                writer,
                "{}\t{}\t{path}",
                file.insertions.to_string().green(),
                file.deletions.to_string().red()
            )?;
        }
    }
    writeln!(writer, "{}", summary(stats.total()))?;

    Ok(())
}

fn summary(total: &TotalStats) -> String {
    let plural = |count: usize, word: &str| {
        if count == 1 {
            format!("{count} {word}")
        } else {
            format!("{count} {word}s")
        }
    };

    if total.files == 0 {
        return " 0 files changed".to_string();
    }

    // Like `git diff --shortstat`: zero counts are left out unless both are zero
    let mut line = format!(" {} changed", plural(total.files, "file"));
    if total.insertions > 0 || total.deletions == 0 {
        line.push_str(&format!(", {}(+)", plural(total.insertions, "insertion")));
    }
    if total.deletions > 0 || total.insertions == 0 {
        line.push_str(&format!(", {}(-)", plural(total.deletions, "deletion")));
    }
    line
}
