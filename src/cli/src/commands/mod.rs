//! CLI subcommands.

pub mod config;
pub mod health;
pub mod workspace;
