//! Generation of yearly volume series.
//!
//! Historical years are reconstructed as noisy data: the year-on-year noise is amplified and the
//! target growth rate is halved. Forecast years follow the full target rate, perturbed by bounded
//! noise and, for some seeds, a sinusoidal seasonal cycle.
use super::{ALL_CATEGORIES_SENTINEL, ForecastConfig, Series};
use crate::random::pseudo_random;
use crate::units::Percent;
use crate::utils::{round_half_up, round_to_one_decimal};
use std::f64::consts::PI;

/// Smallest volume scalar applied to the base value
const MIN_VOLUME_SCALAR: f64 = 0.4;

/// Width of the range of volume scalars
const VOLUME_SCALAR_RANGE: f64 = 1.2;

/// Smallest yearly volatility (as a fraction)
const MIN_VOLATILITY: f64 = 0.02;

/// Width of the range of volatilities
const VOLATILITY_RANGE: f64 = 0.05;

/// Amplitude of the seasonal effect in percentage points
const SEASONAL_AMPLITUDE: f64 = 1.5;

/// Angular step of the seasonal cycle per year
const SEASONAL_FREQUENCY: f64 = 0.5;

/// Factor applied to noise in historical years
const HISTORY_NOISE_FACTOR: f64 = 1.5;

/// Factor applied to the target growth rate in historical years
const HISTORY_TREND_FACTOR: f64 = 0.5;

/// The characteristics of a series which depend only on its seed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesProfile {
    /// Multiplier applied once to the base value
    pub volume_scalar: f64,
    /// Maximum yearly noise, as a fraction
    pub volatility: f64,
    /// Phase of the seasonal cycle, if the series is seasonal
    pub season_phase: Option<f64>,
}

impl SeriesProfile {
    /// Derive the profile for a seed
    pub fn from_seed(seed: &str) -> Self {
        let volume_scalar = if seed.contains(ALL_CATEGORIES_SENTINEL) {
            1.0
        } else {
            MIN_VOLUME_SCALAR + pseudo_random(seed) * VOLUME_SCALAR_RANGE
        };
        let volatility = MIN_VOLATILITY + pseudo_random(&format!("{seed}_vol")) * VOLATILITY_RANGE;
        let is_seasonal = pseudo_random(&format!("{seed}_seas")) > 0.5;
        let season_phase =
            is_seasonal.then(|| pseudo_random(&format!("{seed}_phase")) * PI);

        Self {
            volume_scalar,
            volatility,
            season_phase,
        }
    }

    /// The noise for a given year, in percentage points.
    ///
    /// Lies within `[-volatility * 100, volatility * 100]`.
    fn variance(&self, seed: &str, year: i32) -> Percent {
        let draw = pseudo_random(&format!("{seed}_{year}"));
        Percent((draw - 0.5) * 2.0 * (self.volatility * 100.0))
    }

    /// The seasonal adjustment to the growth rate for the `index`th year of the series
    fn seasonal_effect(&self, index: usize) -> Percent {
        self.season_phase.map_or(Percent(0.0), |phase| {
            Percent((index as f64 * SEASONAL_FREQUENCY + phase).sin() * SEASONAL_AMPLITUDE)
        })
    }
}

/// Apply a compounding percentage change to a value
fn compound(value: f64, rate: Percent) -> f64 {
    value * (1.0 + rate.as_fraction())
}

/// Generate a yearly series for one metric.
///
/// # Arguments
///
/// * `base_value` - The value before the volume scalar is applied
/// * `target_growth_rate` - The yearly growth rate for forecast years
/// * `config` - The years to cover and the history cutoff
/// * `seed` - Seed from which all noise, scaling and seasonality are derived
///
/// # Returns
///
/// One rounded value per year from `config.start_year` to `config.end_year`. The series is empty if
/// the configuration covers no years. The same arguments always give the same series.
pub fn generate_series(
    base_value: f64,
    target_growth_rate: Percent,
    config: &ForecastConfig,
    seed: &str,
) -> Series {
    let profile = SeriesProfile::from_seed(seed);
    let mut value = round_half_up(base_value * profile.volume_scalar);

    config
        .iter_years()
        .enumerate()
        .map(|(index, year)| {
            let variance = profile.variance(seed, year);
            if config.is_historical(year) {
                // The first year is the scaled base value
                if index > 0 {
                    let rate =
                        variance * HISTORY_NOISE_FACTOR + target_growth_rate * HISTORY_TREND_FACTOR;
                    value = compound(value, rate);
                }
            } else {
                let rate = target_growth_rate + variance + profile.seasonal_effect(index);
                value = compound(value, rate);
            }

            round_half_up(value) as i64
        })
        .collect()
}

/// Year-on-year growth for a series, in percent, rounded to one decimal place.
///
/// The first element is always zero, as is any element following a zero value.
pub fn year_over_year_growth(series: &[i64]) -> Vec<Percent> {
    let mut growth = Vec::with_capacity(series.len());
    if series.is_empty() {
        return growth;
    }

    growth.push(Percent(0.0));
    growth.extend(series.windows(2).map(|pair| {
        let (previous, current) = (pair[0] as f64, pair[1] as f64);
        if previous == 0.0 {
            Percent(0.0)
        } else {
            Percent(round_to_one_decimal((current - previous) / previous * 100.0))
        }
    }));

    growth
}
