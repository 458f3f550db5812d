//! Data structures and algorithms
//!
//! - `log`: Log stream decoding and history traversal
//! - `objects`: Commits, signatures, ids and stats

pub mod log;
pub mod objects;
