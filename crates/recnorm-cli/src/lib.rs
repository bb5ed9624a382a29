//! CLI components for the record normalizer.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
