//! Common functionality for rental-explorer.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod dataset;
pub mod input;
pub mod listing;
pub mod log;
pub mod output;
pub mod query;
pub mod settings;
pub mod view;

#[cfg(test)]
mod fixture;

/// Get the directory in which the program's configuration files are stored
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push(env!("CARGO_PKG_NAME"));

    path
}
