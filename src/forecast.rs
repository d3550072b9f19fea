//! The forecasting engine: yearly series generation and capacity gap analysis.
use crate::input::deserialise_non_negative;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub mod gap;
pub use gap::calculate_gap;
pub mod projection;
pub use projection::{ProjectionYear, ScenarioProjection};
pub mod series;
pub use series::{SeriesProfile, generate_series, year_over_year_growth};

/// A yearly series of values, where index 0 corresponds to the first year of the forecast
pub type Series = Vec<i64>;

/// Label used when no hospital or service filter is applied
pub const ALL_CATEGORIES: &str = "all";

/// Seeds containing this marker are generated without a volume adjustment
pub const ALL_CATEGORIES_SENTINEL: &str = "all_all";

/// The years covered by a forecast and where history ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// First year of the series
    pub start_year: i32,
    /// Last year of the series (inclusive)
    pub end_year: i32,
    /// The last year treated as observed history; later years are projected
    pub history_cutoff: i32,
}

impl ForecastConfig {
    /// The number of years covered, or zero if the end year precedes the start year
    pub fn total_years(&self) -> usize {
        usize::try_from(self.end_year - self.start_year + 1).unwrap_or(0)
    }

    /// Iterate over the years covered by the forecast
    pub fn iter_years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    /// The first year in which newly added capacity is available
    pub fn activation_year(&self) -> i32 {
        self.history_cutoff + 1
    }

    /// Whether the given year is part of the historical reconstruction
    pub fn is_historical(&self, year: i32) -> bool {
        year <= self.history_cutoff
    }

    /// The number of series points to show for a horizon of `horizon` forecast years.
    ///
    /// All historical years are always included. The result never exceeds
    /// [`ForecastConfig::total_years`].
    pub fn points_for_horizon(&self, horizon: u32) -> usize {
        let history_len = i64::from(self.history_cutoff) - i64::from(self.start_year) + 1;
        let points = usize::try_from(history_len.max(0) + i64::from(horizon)).unwrap_or(0);
        points.min(self.total_years())
    }
}

/// Baseline volumes and capacity shared by all scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseParams {
    /// Starting inpatient volume
    #[serde(deserialize_with = "deserialise_non_negative")]
    pub inpatient: f64,
    /// Starting outpatient volume
    #[serde(deserialize_with = "deserialise_non_negative")]
    pub outpatient: f64,
    /// Baseline bed capacity
    #[serde(deserialize_with = "deserialise_non_negative")]
    pub bed_capacity: f64,
}

/// The hospital and service line that a dashboard series is generated for.
///
/// `None` means no filter, i.e. all hospitals or all services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesFilter {
    /// The selected hospital
    pub hospital: Option<String>,
    /// The selected service line
    pub service: Option<String>,
}

impl SeriesFilter {
    /// The salt appended to scenario IDs to form series seeds (e.g. `all_all`)
    pub fn salt(&self) -> String {
        let hospital = self.hospital.as_deref().unwrap_or(ALL_CATEGORIES);
        let service = self.service.as_deref().unwrap_or(ALL_CATEGORIES);
        format!("{hospital}_{service}")
    }
}

/// The seed for a scenario's dashboard series under the given filter
pub fn series_seed(scenario_id: &str, filter: &SeriesFilter) -> String {
    format!("{scenario_id}_{}", filter.salt())
}

/// The seed used when calculating report metrics for a scenario
pub fn report_seed(scenario_id: &str) -> String {
    format!("{scenario_id}_report")
}

/// The seed used when comparing scenarios without precomputed terminal values
pub fn comparison_seed(scenario_id: &str) -> String {
    format!("{scenario_id}_compare")
}

/// The seed used for exported series
pub fn export_seed(scenario_id: &str) -> String {
    format!("{scenario_id}_export")
}
