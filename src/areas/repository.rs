use crate::areas::backend::{LogBackend, LogReader};
use crate::areas::git_binary::GitBinary;
use crate::artifacts::log::commit_stream::CommitStream;
use crate::artifacts::log::log_format::LogFormat;
use crate::artifacts::log::log_query::LogQuery;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use std::io::BufRead;
use std::iter::FusedIterator;
use std::path::Path;

/// Entry point tying a [`LogBackend`] to commit construction and log parsing
pub struct Repository {
    backend: Box<dyn LogBackend>,
}

impl Repository {
    pub fn new(backend: impl LogBackend + 'static) -> Self {
        Repository {
            backend: Box::new(backend),
        }
    }

    /// Repository backed by the `git` executable
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(GitBinary::open(path)?))
    }

    pub fn backend(&self) -> &dyn LogBackend {
        self.backend.as_ref()
    }

    /// Unbaked commit for a full object id
    pub fn commit(&self, id: &str) -> Result<Commit<'_>> {
        Ok(Commit::new(self, ObjectId::try_parse(id)?))
    }

    /// Commit a revision name (branch, `HEAD`, `main~2`, ...) points at
    pub fn resolve(&self, revision: &str) -> Result<Commit<'_>> {
        let query = LogQuery::new(revision).max_count(1);
        self.iter_commits(&query, LogFormat::Raw)?
            .next()
            .unwrap_or_else(|| Err(Error::Resolution(revision.to_string())))
    }

    /// Lazily decoded commits matching `query`
    ///
    /// Unsupported formats are rejected before the backend is asked for anything.
    pub fn iter_commits(&self, query: &LogQuery, format: LogFormat) -> Result<Commits<'_, LogReader>> {
        format.ensure_parsable()?;

        let reader = self.backend.log(query, &format)?;
        self.parse_commits(reader, format)
    }

    /// Decode commits from a caller supplied stream
    pub fn parse_commits<R: BufRead>(&self, reader: R, format: LogFormat) -> Result<Commits<'_, R>> {
        Ok(Commits {
            repository: self,
            stream: CommitStream::new(reader, format)?,
        })
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").finish_non_exhaustive()
    }
}

/// Baked commits decoded from a log stream, in stream order
pub struct Commits<'r, R> {
    repository: &'r Repository,
    stream: CommitStream<R>,
}

impl<'r, R: BufRead> Iterator for Commits<'r, R> {
    type Item = Result<Commit<'r>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.stream.next()?;
        Some(record.map(|record| Commit::from_record(self.repository, record)))
    }
}

impl<R: BufRead> FusedIterator for Commits<'_, R> {}
