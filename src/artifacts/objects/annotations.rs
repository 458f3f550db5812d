//! Auxiliary key/value data attached to a log record
//!
//! Records can carry more than the commit object itself: `--bisect-all`
//! decorates the header with `(dist=N)`, some producers emit `key: value`
//! lines before the author, and raw output keeps extra headers such as
//! `encoding` or `gpgsig` after the committer. All of them end up here, in
//! the order they were read. Unknown keys are kept.

/// Key used by `git rev-list --bisect-all` for the remaining bisection distance
pub const BISECT_DISTANCE_KEY: &str = "dist";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    entries: Vec<(String, String)>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Append a continuation line to the most recent value
    ///
    /// Returns false if there is nothing to continue.
    pub fn continue_last(&mut self, line: &str) -> bool {
        match self.entries.last_mut() {
            Some((_, value)) => {
                value.push('\n');
                value.push_str(line);
                true
            }
            None => false,
        }
    }

    /// First value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of bisection steps left, as reported by `--bisect-all`
    pub fn bisect_distance(&self) -> Option<u64> {
        self.get(BISECT_DISTANCE_KEY)?.parse().ok()
    }
}
