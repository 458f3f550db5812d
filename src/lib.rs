//! Lazily loaded commit graphs on top of `git log` output
//!
//! A [`Repository`] hands out [`Commit`]s that only know their id until a
//! field is read. Histories are decoded incrementally from raw log streams,
//! and [`RevList`] walks the parent relation depth-first or branch-first.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

#[cfg(test)]
mod test_support;

pub use areas::backend::{LogBackend, LogReader};
pub use areas::git_binary::GitBinary;
pub use areas::memory::MemoryBackend;
pub use areas::repository::{Commits, Repository};
pub use artifacts::log::log_format::LogFormat;
pub use artifacts::log::log_query::LogQuery;
pub use artifacts::log::rev_list::{RevList, TraversalOrder, Visit};
pub use artifacts::objects::actor::{Actor, Signature};
pub use artifacts::objects::commit::Commit;
pub use artifacts::objects::object_id::ObjectId;
pub use artifacts::objects::stats::{FileStats, Stats, TotalStats};
pub use errors::{Error, Result};
