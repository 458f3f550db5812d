use std::path::PathBuf;

/// Which commits a backend should list
///
/// Mirrors the subset of `git rev-list` options the crate needs. Paths
/// restrict the listing to commits touching any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    revision: String,
    paths: Vec<PathBuf>,
    max_count: Option<usize>,
    skip: usize,
    first_parent: bool,
    bisect_all: bool,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self::new("HEAD")
    }
}

impl LogQuery {
    pub fn new(revision: impl Into<String>) -> Self {
        Self {
            revision: revision.into(),
            paths: Vec::new(),
            max_count: None,
            skip: 0,
            first_parent: false,
            bisect_all: false,
        }
    }

    /// Same options, listing from another revision
    pub fn starting_at(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn paths<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn first_parent(mut self, first_parent: bool) -> Self {
        self.first_parent = first_parent;
        self
    }

    pub fn bisect_all(mut self, bisect_all: bool) -> Self {
        self.bisect_all = bisect_all;
        self
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn path_filters(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn limit(&self) -> Option<usize> {
        self.max_count
    }

    pub fn skipped(&self) -> usize {
        self.skip
    }

    pub fn is_first_parent(&self) -> bool {
        self.first_parent
    }

    pub fn is_bisect_all(&self) -> bool {
        self.bisect_all
    }
}
