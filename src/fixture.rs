//! Fixtures for tests

use crate::forecast::{BaseParams, ForecastConfig};
use crate::scenario::{Scenario, ScenarioData, ScenarioStore};
use crate::units::Percent;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn forecast_config() -> ForecastConfig {
    ForecastConfig {
        start_year: 2020,
        end_year: 2034,
        history_cutoff: 2025,
    }
}

#[fixture]
pub fn base_params() -> BaseParams {
    BaseParams {
        inpatient: 1200.0,
        outpatient: 4500.0,
        bed_capacity: 1250.0,
    }
}

#[fixture]
pub fn scenario_data() -> ScenarioData {
    ScenarioData {
        inpatient_growth: Percent(3.5),
        outpatient_growth: Percent(4.0),
        new_patient_growth: Percent(3.0),
        market_share: Percent(40.0),
        referral_growth: Percent(20.0),
        apply_capacity_limits: true,
        add_beds: 20,
        add_chairs: 0,
        programs: ["Oncology".to_string()].into_iter().collect(),
    }
}

#[fixture]
pub fn scenario(scenario_data: ScenarioData) -> Scenario {
    Scenario {
        id: "scenario1".into(),
        name: "Scenario 1".into(),
        data: scenario_data,
        terminal: None,
    }
}

#[fixture]
pub fn scenario_store() -> ScenarioStore {
    ScenarioStore::default()
}
