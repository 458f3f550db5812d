#![allow(dead_code)]

pub mod command;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";

/// 2023-01-01 12:00:00 UTC
pub const BASE_TIMESTAMP: i64 = 1672574400;
