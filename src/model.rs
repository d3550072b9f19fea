//! The model represents the static input data provided by the user.
use crate::forecast::{ALL_CATEGORIES, BaseParams, ForecastConfig, SeriesFilter};
use crate::scenario::ScenarioStore;
use anyhow::{Result, ensure};

pub mod parameters;
pub use parameters::{FilterOptions, ModelParameters};

/// Model definition
#[derive(Debug)]
pub struct Model {
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// The scenarios defined for this model
    pub scenarios: ScenarioStore,
}

/// Parse a filter argument, where "all" (or nothing) means no filter
fn parse_filter_str(value: Option<&str>, kind: &str, options: &[String]) -> Result<Option<String>> {
    let Some(value) = value.map(str::trim) else {
        return Ok(None);
    };
    if value.eq_ignore_ascii_case(ALL_CATEGORIES) {
        return Ok(None);
    }

    let option = options.iter().find(|option| option.eq_ignore_ascii_case(value));
    ensure!(option.is_some(), "Unknown {kind}: {value}");

    Ok(option.cloned())
}

impl Model {
    /// The years covered by the forecast
    pub fn config(&self) -> &ForecastConfig {
        &self.parameters.config
    }

    /// Baseline volumes and capacity
    pub fn base_params(&self) -> &BaseParams {
        &self.parameters.base_params
    }

    /// Build a series filter from user-supplied hospital and service names.
    ///
    /// Names are matched case-insensitively against those listed in the model file and the
    /// canonical spelling is used in the filter.
    pub fn series_filter(&self, hospital: Option<&str>, service: Option<&str>) -> Result<SeriesFilter> {
        let filters = &self.parameters.filters;
        Ok(SeriesFilter {
            hospital: parse_filter_str(hospital, "hospital", &filters.hospitals)?,
            service: parse_filter_str(service, "service", &filters.services)?,
        })
    }
}
