//! The yearly projection shown for a scenario: volumes, growth and capacity gap.
use super::{
    BaseParams, ForecastConfig, Series, SeriesFilter, calculate_gap, generate_series,
    series_seed, year_over_year_growth,
};
use crate::scenario::{Scenario, ScenarioID};
use crate::units::Percent;

/// Yearly inpatient and outpatient series for one scenario, with derived growth and gap series.
///
/// All series have the same length and start at `config.start_year`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioProjection {
    /// The scenario projected
    pub scenario_id: ScenarioID,
    /// The first year of the series
    pub start_year: i32,
    /// Inpatient volumes
    pub inpatient: Series,
    /// Outpatient volumes
    pub outpatient: Series,
    /// Year-on-year inpatient growth
    pub inpatient_growth: Vec<Percent>,
    /// Inpatient demand minus bed capacity
    pub capacity_gap: Series,
}

/// A single year of a [`ScenarioProjection`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionYear {
    /// The calendar year
    pub year: i32,
    /// Inpatient volume
    pub inpatient: i64,
    /// Outpatient volume
    pub outpatient: i64,
    /// Inpatient growth since the previous year
    pub inpatient_growth: Percent,
    /// Capacity shortfall (positive) or surplus (negative)
    pub capacity_gap: i64,
}

impl ScenarioProjection {
    /// Project a scenario for the selected hospital and service.
    ///
    /// Series are truncated to the history plus `horizon` forecast years. The capacity gap is
    /// calculated on the truncated inpatient series.
    pub fn generate(
        scenario: &Scenario,
        base_params: &BaseParams,
        config: &ForecastConfig,
        filter: &SeriesFilter,
        horizon: u32,
    ) -> Self {
        let seed = series_seed(scenario.id.as_str(), filter);
        let points = config.points_for_horizon(horizon);
        let series_for = |base_value, rate| {
            let mut series = generate_series(base_value, rate, config, &seed);
            series.truncate(points);
            series
        };

        let inpatient = series_for(base_params.inpatient, scenario.data.inpatient_growth);
        let outpatient = series_for(base_params.outpatient, scenario.data.outpatient_growth);
        let inpatient_growth = year_over_year_growth(&inpatient);
        let capacity_gap = calculate_gap(
            &inpatient,
            base_params.bed_capacity,
            f64::from(scenario.data.add_beds),
            config,
        );

        Self {
            scenario_id: scenario.id.clone(),
            start_year: config.start_year,
            inpatient,
            outpatient,
            inpatient_growth,
            capacity_gap,
        }
    }

    /// The number of years in the projection
    pub fn len(&self) -> usize {
        self.inpatient.len()
    }

    /// Whether the projection covers no years
    pub fn is_empty(&self) -> bool {
        self.inpatient.is_empty()
    }

    /// Iterate over the projection year by year
    pub fn iter_years(&self) -> impl Iterator<Item = ProjectionYear> + '_ {
        (self.start_year..)
            .zip(&self.inpatient)
            .zip(&self.outpatient)
            .zip(&self.inpatient_growth)
            .zip(&self.capacity_gap)
            .map(
                |((((year, &inpatient), &outpatient), &inpatient_growth), &capacity_gap)| {
                    ProjectionYear {
                        year,
                        inpatient,
                        outpatient,
                        inpatient_growth,
                        capacity_gap,
                    }
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{base_params, forecast_config, scenario_store};
    use crate::scenario::ScenarioStore;
    use rstest::rstest;

    #[rstest]
    fn test_generate(
        scenario_store: ScenarioStore,
        base_params: BaseParams,
        forecast_config: ForecastConfig,
    ) {
        let scenario = scenario_store.get("aggressive").unwrap();
        let projection = ScenarioProjection::generate(
            scenario,
            &base_params,
            &forecast_config,
            &SeriesFilter::default(),
            10,
        );

        assert_eq!(projection.len(), 15);
        assert_eq!(
            projection.inpatient,
            [
                1200, 1279, 1361, 1450, 1543, 1642, 1783, 1949, 2148, 2382, 2595, 2827, 3072, 3319,
                3564
            ]
        );
        assert_eq!(projection.outpatient[0], 4500);
        assert_eq!(projection.outpatient[14], 20287);
        assert_eq!(projection.inpatient_growth[1], Percent(6.6));

        // 25 beds are added from 2026
        assert_eq!(projection.capacity_gap[0], -50);
        assert_eq!(projection.capacity_gap[5], 1642 - 1250);
        assert_eq!(projection.capacity_gap[6], 1783 - 1275);
    }

    #[rstest]
    fn test_generate_horizon(
        scenario_store: ScenarioStore,
        base_params: BaseParams,
        forecast_config: ForecastConfig,
    ) {
        let scenario = scenario_store.get("aggressive").unwrap();
        let projection = ScenarioProjection::generate(
            scenario,
            &base_params,
            &forecast_config,
            &SeriesFilter::default(),
            3,
        );

        // Six historical years plus three forecast years
        assert_eq!(projection.len(), 9);
        assert_eq!(projection.outpatient.len(), 9);
        assert_eq!(projection.capacity_gap.len(), 9);
        assert_eq!(projection.inpatient[8], 2148);

        let last = projection.iter_years().last().unwrap();
        assert_eq!(last.year, 2028);
        assert_eq!(last.inpatient, 2148);
        assert_eq!(last.capacity_gap, 873);
    }

    #[rstest]
    fn test_generate_filtered(
        scenario_store: ScenarioStore,
        base_params: BaseParams,
        forecast_config: ForecastConfig,
    ) {
        let scenario = scenario_store.get("aggressive").unwrap();
        let filter = SeriesFilter {
            hospital: Some("General Hospital".into()),
            service: None,
        };
        let unfiltered = ScenarioProjection::generate(
            scenario,
            &base_params,
            &forecast_config,
            &SeriesFilter::default(),
            10,
        );
        let filtered =
            ScenarioProjection::generate(scenario, &base_params, &forecast_config, &filter, 10);

        assert_eq!(filtered.len(), unfiltered.len());
        assert_ne!(filtered.inpatient, unfiltered.inpatient);
    }
}
