//! Where commit data comes from
//!
//! - `backend`: The `LogBackend` trait every source implements
//! - `git_binary`: Backend spawning the `git` executable
//! - `memory`: Backend replaying captured log text
//! - `repository`: Entry point tying a backend to commit construction

pub mod backend;
pub mod git_binary;
pub mod memory;
pub mod repository;
