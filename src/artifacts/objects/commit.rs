//! Commit entity
//!
//! A commit is known by its id from the moment it is created. Everything else
//! is fetched lazily: the first metadata access asks the backend for the
//! commit's record, decodes it, and stores all fields at once ("baking").
//! Stats are a second, independent group since they need a diff.
//!
//! ## Format
//!
//! The record a commit is baked from:
//! ```text
//! commit <id> [<parent>...]
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//!     <commit message>
//! ```

use crate::areas::repository::Repository;
use crate::artifacts::log::commit_stream::{CommitRecord, CommitStream};
use crate::artifacts::log::log_format::LogFormat;
use crate::artifacts::log::log_query::LogQuery;
use crate::artifacts::log::rev_list::{RevList, Visit};
use crate::artifacts::objects::actor::{Actor, Signature};
use crate::artifacts::objects::annotations::Annotations;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::stats::Stats;
use crate::errors::{Error, Result};
use derive_new::new;
use once_cell::sync::OnceCell;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Everything a single log record says about a commit
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct CommitData {
    /// Tree object ID representing the directory snapshot
    tree: ObjectId,
    /// Parent commit IDs (empty for a root commit, several for merges)
    parents: Vec<ObjectId>,
    author: Signature,
    committer: Signature,
    message: String,
    annotations: Annotations,
}

impl CommitData {
    pub fn tree(&self) -> &ObjectId {
        &self.tree
    }

    pub fn parent_ids(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> &Signature {
        &self.author
    }

    pub fn committer(&self) -> &Signature {
        &self.committer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// A commit in the history of a [`Repository`]
///
/// Equality and hashing only look at the id. Clones share the lazily
/// populated fields, so baking one clone bakes all of them.
#[derive(Clone)]
pub struct Commit<'r> {
    repository: &'r Repository,
    id: ObjectId,
    data: Arc<OnceCell<CommitData>>,
    stats: Arc<OnceCell<Stats>>,
}

impl<'r> Commit<'r> {
    /// Unbaked commit; nothing is fetched until a field is read
    pub fn new(repository: &'r Repository, id: ObjectId) -> Self {
        Self {
            repository,
            id,
            data: Arc::new(OnceCell::new()),
            stats: Arc::new(OnceCell::new()),
        }
    }

    /// Commit baked from an already decoded record
    pub fn from_record(repository: &'r Repository, record: CommitRecord) -> Self {
        Self {
            repository,
            id: record.id,
            data: Arc::new(OnceCell::with_value(record.data)),
            stats: Arc::new(OnceCell::new()),
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn repository(&self) -> &'r Repository {
        self.repository
    }

    pub fn is_baked(&self) -> bool {
        self.data.get().is_some()
    }

    /// All record fields, baking the commit on first use
    pub fn data(&self) -> Result<&CommitData> {
        self.data.get_or_try_init(|| self.bake())
    }

    pub fn author(&self) -> Result<&Actor> {
        Ok(self.data()?.author().actor())
    }

    pub fn committer(&self) -> Result<&Actor> {
        Ok(self.data()?.committer().actor())
    }

    pub fn authored_date(&self) -> Result<i64> {
        Ok(self.data()?.author().timestamp())
    }

    pub fn author_tz_offset(&self) -> Result<i32> {
        Ok(self.data()?.author().tz_offset())
    }

    pub fn committed_date(&self) -> Result<i64> {
        Ok(self.data()?.committer().timestamp())
    }

    pub fn committer_tz_offset(&self) -> Result<i32> {
        Ok(self.data()?.committer().tz_offset())
    }

    pub fn message(&self) -> Result<&str> {
        Ok(self.data()?.message())
    }

    /// First line of the message
    pub fn summary(&self) -> Result<&str> {
        Ok(self.message()?.lines().next().unwrap_or(""))
    }

    pub fn tree(&self) -> Result<&ObjectId> {
        Ok(self.data()?.tree())
    }

    pub fn parent_ids(&self) -> Result<&[ObjectId]> {
        Ok(self.data()?.parent_ids())
    }

    /// Parents as unbaked commits, in parent order
    pub fn parents(&self) -> Result<Vec<Commit<'r>>> {
        Ok(self
            .parent_ids()?
            .iter()
            .map(|parent_id| Commit::new(self.repository, parent_id.clone()))
            .collect())
    }

    pub fn annotations(&self) -> Result<&Annotations> {
        Ok(self.data()?.annotations())
    }

    /// Per-file changes against the first parent (or the empty tree for a root)
    pub fn stats(&self) -> Result<&Stats> {
        self.stats.get_or_try_init(|| {
            let parent = self.parent_ids()?.first();
            debug!(id = %self.id, parent = ?parent.map(ObjectId::to_short_oid), "loading commit stats");

            let reader = self.repository.backend().numstat(&self.id, parent)?;
            Stats::parse(reader)
        })
    }

    /// Traversal of the history reachable from this commit
    pub fn traverse(&self) -> RevList<'r> {
        RevList::new(self.clone())
    }

    /// Ancestors as listed by the backend for `query`, this commit left out
    ///
    /// The listing starts at this commit whatever revision `query` names.
    /// A `skip` of 0 or 1 only drops the commit itself, so the first item is
    /// the first parent; larger values skip further ancestors as well. Path
    /// limited queries may not list this commit at all, so it is dropped by
    /// id rather than by position.
    pub fn iter_parents(
        &self,
        query: LogQuery,
    ) -> Result<impl Iterator<Item = Result<Commit<'r>>> + use<'r>> {
        let skip = query.skipped().saturating_sub(1);
        let limit = query.limit();

        let mut query = query.starting_at(self.id.to_string()).skip(0);
        if let Some(limit) = limit {
            query = query.max_count(limit.saturating_add(skip + 1));
        }

        let id = self.id.clone();
        Ok(self
            .repository
            .iter_commits(&query, LogFormat::Default)?
            .filter(move |commit| !matches!(commit, Ok(commit) if commit.id() == &id))
            .skip(skip)
            .take(limit.unwrap_or(usize::MAX)))
    }

    /// Number of commits reachable from this one, itself included
    pub fn count(&self) -> Result<usize> {
        self.traverse()
            .ignore_self(false)
            .into_iter()
            .try_fold(0, |count, visit| visit.map(|_: Visit<'r>| count + 1))
    }

    /// Number of commits reachable from this one that touch any of `paths`
    pub fn count_touching<P: Into<PathBuf>>(
        &self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<usize> {
        let query = LogQuery::new(self.id.to_string()).paths(paths);

        self.repository
            .iter_commits(&query, LogFormat::Raw)?
            .try_fold(0, |count, commit| commit.map(|_| count + 1))
    }

    fn bake(&self) -> Result<CommitData> {
        debug!(id = %self.id, "baking commit");

        let reader = self.repository.backend().show(&self.id)?;
        let mut records = CommitStream::new(reader, LogFormat::Default)?;

        match records.next() {
            Some(Ok(record)) if record.id == self.id => Ok(record.data),
            Some(Ok(record)) => Err(Error::parse(
                1,
                format!("expected record for {}, got {}", self.id, record.id),
            )),
            Some(Err(err)) => Err(err),
            None => Err(Error::Resolution(self.id.to_string())),
        }
    }
}

impl PartialEq for Commit<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Commit<'_> {}

impl Hash for Commit<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Commit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl std::fmt::Debug for Commit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Commit").field(&self.id.as_ref()).finish()
    }
}
