//! Library components of the trade CSV importer CLI.

pub mod config;
pub mod logging;
pub mod summary;
