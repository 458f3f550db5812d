use crate::areas::repository::Repository;
use crate::artifacts::log::log_format::LogFormat;
use crate::artifacts::log::log_query::LogQuery;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LogOptions {
    pub revision: String,
    pub format: LogFormat,
    pub max_count: Option<usize>,
    pub skip: usize,
    pub first_parent: bool,
    pub bisect_all: bool,
    pub paths: Vec<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            revision: "HEAD".to_string(),
            format: LogFormat::Default,
            max_count: None,
            skip: 0,
            first_parent: false,
            bisect_all: false,
            paths: Vec::new(),
        }
    }
}

impl LogOptions {
    fn query(&self) -> LogQuery {
        let mut query = LogQuery::new(self.revision.as_str())
            .skip(self.skip)
            .first_parent(self.first_parent)
            .bisect_all(self.bisect_all)
            .paths(self.paths.iter().cloned());
        if let Some(max_count) = self.max_count {
            query = query.max_count(max_count);
        }
        query
    }
}

pub fn log(repository: &Repository, opts: &LogOptions, writer: &mut dyn Write) -> anyhow::Result<()> {
    let commits = repository
        .iter_commits(&opts.query(), opts.format.clone())
        .with_context(|| format!("cannot list history of {}", opts.revision))?;

    for (index, commit) in commits.enumerate() {
        let commit = commit.with_context(|| format!("failed to decode commit #{}", index + 1))?;

        if index > 0 {
            writeln!(writer)?;
        }
        show_commit_medium(&commit, writer)?;
    }

    Ok(())
}

fn show_commit_medium(commit: &Commit<'_>, writer: &mut dyn Write) -> anyhow::Result<()> {
    let data = commit.data()?;

    writeln!(writer, "{}", format!("commit {}", commit.id()).yellow())?;
    if data.parent_ids().len() > 1 {
        let parents: Vec<_> = data.parent_ids().iter().map(|id| id.to_short_oid()).collect();
        writeln!(writer, "Merge:  {}", parents.join(" "))?;
    }
    writeln!(writer, "Author: {}", data.author().actor())?;
    writeln!(writer, "Date:   {}", data.author().readable_timestamp())?;
    for (key, value) in data.annotations().iter() {
        writeln!(writer, "{key}: {value}")?;
    }

    writeln!(writer)?;
    for message_line in data.message().lines() {
        writeln!(writer, "    {message_line}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::memory::MemoryBackend;
    use crate::commands::render;
    use crate::errors::Error;
    use crate::test_support::{oid, raw_record};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> Repository {
        let mut backend = MemoryBackend::new();
        backend.insert_record(oid("merge"), raw_record("merge", &["left", "right"], "Merge"));
        backend.insert_record(oid("left"), raw_record("left", &[], "Left\n\nbody"));
        Repository::new(backend)
    }

    #[rstest]
    fn prints_commits_in_medium_layout(repository: Repository) {
        let output = render(|out| log(&repository, &LogOptions::default(), out)).unwrap();

        let expected = format!(
            "commit {merge}\n\
             Merge:  {left_short} {right_short}\n\
             Author: Michael Trier <mtrier@gmail.com>\n\
             Date:   Wed May 7 16:49:48 2008 -0400\n\
             \n    Merge\n\
             \n\
             commit {left}\n\
             Author: Michael Trier <mtrier@gmail.com>\n\
             Date:   Wed May 7 16:49:48 2008 -0400\n\
             \n    Left\n    \n    body\n",
            merge = oid("merge"),
            left = oid("left"),
            left_short = oid("left").to_short_oid(),
            right_short = oid("right").to_short_oid(),
        );
        assert_eq!(output, expected);
    }

    #[rstest]
    fn max_count_limits_output(repository: Repository) {
        let opts = LogOptions {
            max_count: Some(1),
            ..LogOptions::default()
        };
        let output = render(|out| log(&repository, &opts, out)).unwrap();

        assert_eq!(output.matches("commit ").count(), 1);
    }

    #[rstest]
    fn pretty_format_is_rejected(repository: Repository) {
        let opts = LogOptions {
            format: LogFormat::Pretty("oneline".into()),
            ..LogOptions::default()
        };
        let err = render(|out| log(&repository, &opts, out)).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidMode(_))
        ));
    }
}
