use crate::artifacts::log::log_format::LogFormat;
use crate::artifacts::log::log_query::LogQuery;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::io::BufRead;

/// Stream handed out by a backend; dropping it releases whatever produces it
pub type LogReader = Box<dyn BufRead + Send>;

/// Source of raw history text
///
/// The crate never looks at repository storage itself. Everything it knows
/// about commits comes through these three queries, decoded by the stream
/// and stats parsers.
pub trait LogBackend: Send + Sync {
    /// Multi-record log for a revision/path query, in the requested format
    fn log(&self, query: &LogQuery, format: &LogFormat) -> Result<LogReader>;

    /// Single record describing one commit
    fn show(&self, id: &ObjectId) -> Result<LogReader>;

    /// Numstat block (plus summary line) of a commit against `parent`, or
    /// against the empty tree when there is none
    fn numstat(&self, id: &ObjectId, parent: Option<&ObjectId>) -> Result<LogReader>;
}
