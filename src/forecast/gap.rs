//! Capacity gap analysis.
use super::{ForecastConfig, Series};
use crate::utils::round_half_up;

/// Calculate the yearly gap between demand and bed capacity.
///
/// Added beds only count from the activation year (the year after the history cutoff) onwards.
///
/// # Arguments
///
/// * `demand` - Yearly demand, starting at `config.start_year`
/// * `base_capacity` - Capacity available in every year
/// * `added_beds` - Extra capacity available from the activation year
/// * `config` - Forecast configuration
///
/// # Returns
///
/// One value per element of `demand`. Positive values are shortfalls (demand exceeds capacity) and
/// negative values are surpluses.
pub fn calculate_gap(
    demand: &[i64],
    base_capacity: f64,
    added_beds: f64,
    config: &ForecastConfig,
) -> Series {
    let activation_year = config.activation_year();
    demand
        .iter()
        .zip(config.start_year..)
        .map(|(&demand, year)| {
            let capacity = if year >= activation_year {
                base_capacity + added_beds
            } else {
                base_capacity
            };

            round_half_up(demand as f64 - capacity) as i64
        })
        .collect()
}
