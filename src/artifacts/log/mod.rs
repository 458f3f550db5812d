//! Reading and walking commit history
//!
//! - `log_format`: Output modes a log stream can be requested in
//! - `log_query`: Revision, paths and limits of a log request
//! - `commit_stream`: Incremental decoder for raw log records
//! - `rev_list`: Depth-first and branch-first walks over parents

pub mod commit_stream;
pub mod log_format;
pub mod log_query;
pub mod rev_list;
