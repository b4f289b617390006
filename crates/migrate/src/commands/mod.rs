//! Subcommands

pub mod export;
pub mod seed_demo;
pub mod summary;
pub mod validate;
