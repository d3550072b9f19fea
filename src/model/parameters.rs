//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::forecast::{ALL_CATEGORIES, BaseParams, ForecastConfig};
use crate::input::{input_err_msg, read_toml};
use crate::utils::find_duplicate;
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_horizon, u32, 10);

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The years covered by the forecast
    #[serde(flatten)]
    pub config: ForecastConfig,
    /// The number of forecast years to show after the history cutoff
    #[serde(default = "default_horizon")]
    pub horizon: u32,
    /// Baseline volumes and capacity
    pub base_params: BaseParams,
    /// Hospitals and services which series can be filtered by
    #[serde(default)]
    pub filters: FilterOptions,
}

/// The hospitals and service lines that can be selected when generating series
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct FilterOptions {
    /// Hospital names
    #[serde(default)]
    pub hospitals: Vec<String>,
    /// Service line names
    #[serde(default)]
    pub services: Vec<String>,
}

/// Check that the forecast years are valid
fn check_forecast_config(config: &ForecastConfig) -> Result<()> {
    ensure!(
        config.start_year <= config.end_year,
        "start_year ({}) must not be after end_year ({})",
        config.start_year,
        config.end_year
    );
    ensure!(
        (config.start_year - 1..=config.end_year).contains(&config.history_cutoff),
        "history_cutoff ({}) must be between {} and {}",
        config.history_cutoff,
        config.start_year - 1,
        config.end_year
    );

    Ok(())
}

/// Check that the `horizon` parameter is valid
fn check_horizon(value: u32) -> Result<()> {
    ensure!(value > 0, "horizon cannot be zero");

    Ok(())
}

/// Check a list of filter options (e.g. hospitals)
fn check_filter_list(kind: &str, names: &[String]) -> Result<()> {
    for name in names {
        ensure!(!name.trim().is_empty(), "Empty name in {kind}");
        ensure!(
            !name.eq_ignore_ascii_case(ALL_CATEGORIES),
            "\"{ALL_CATEGORIES}\" is reserved and cannot be listed in {kind}"
        );
    }
    if let Some(duplicate) = find_duplicate(names) {
        anyhow::bail!("{duplicate} is listed more than once in {kind}");
    }

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_forecast_config(&self.config)?;
        if self.config.history_cutoff == self.config.end_year {
            warn!(
                "history_cutoff is the same as end_year ({}), so there are no forecast years",
                self.config.end_year
            );
        }

        check_horizon(self.horizon)?;

        // base_params already validated with deserialise_non_negative

        check_filter_list("hospitals", &self.filters.hospitals)?;
        check_filter_list("services", &self.filters.services)?;

        Ok(())
    }
}
