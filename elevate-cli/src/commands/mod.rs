//! CLI subcommands.

pub mod common;
pub mod config;
pub mod init;
pub mod query;
pub mod serve;
