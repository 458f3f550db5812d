//! Commit model
//!
//! - `object_id`: 40 character hexadecimal object names
//! - `actor`: Identities and signatures (`Name <email> <timestamp> <tz>`)
//! - `annotations`: Extra key/value data attached to a log record
//! - `commit`: Lazily baked commit entity
//! - `stats`: Per-file and total change counts from `--numstat` output

pub mod actor;
pub mod annotations;
pub mod commit;
pub mod object_id;
pub mod stats;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of an abbreviated object id
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
