//! Deterministic patient-volume forecasting and capacity gap analysis for healthcare planning.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod comparison;
pub mod forecast;
pub mod id;
pub mod input;
pub mod log;
pub mod metrics;
pub mod model;
pub mod output;
pub mod random;
pub mod runner;
pub mod scenario;
pub mod settings;
pub mod units;
pub mod utils;

#[cfg(test)]
mod fixture;

/// Get the path to the folder where program configuration files are stored.
///
/// Falls back to the current directory if the platform has no configuration folder.
pub fn get_capfore_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("capfore");

    path
}
