//! Headline metrics reported for a scenario.
use crate::comparison::terminal_values;
use crate::forecast::{BaseParams, ForecastConfig, report_seed};
use crate::scenario::{Scenario, ScenarioID};
use crate::units::Percent;
use crate::utils::round_half_up;
use serde::{Deserialize, Serialize};

/// Growth of a scenario over the whole forecast, relative to the base volumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    /// The scenario these metrics describe
    pub scenario_id: ScenarioID,
    /// Inpatient volume in the final year
    pub terminal_inpatient: i64,
    /// Outpatient volume in the final year
    pub terminal_outpatient: i64,
    /// Total inpatient growth relative to the base volume
    pub inpatient_growth_pct: Percent,
    /// Total outpatient growth relative to the base volume
    pub outpatient_growth_pct: Percent,
    /// Combined change in inpatient and outpatient volume
    pub total_patient_delta: i64,
}

impl ScenarioMetrics {
    /// Calculate metrics for a scenario.
    ///
    /// Uses the scenario's own terminal values if it has them, otherwise generates series with the
    /// scenario's report seed.
    pub fn calculate(scenario: &Scenario, base_params: &BaseParams, config: &ForecastConfig) -> Self {
        let terminal = terminal_values(
            scenario,
            base_params,
            config,
            &report_seed(scenario.id.as_str()),
        );
        let inpatient_delta = terminal.inpatient as f64 - base_params.inpatient;
        let outpatient_delta = terminal.outpatient as f64 - base_params.outpatient;

        Self {
            scenario_id: scenario.id.clone(),
            terminal_inpatient: terminal.inpatient,
            terminal_outpatient: terminal.outpatient,
            inpatient_growth_pct: Percent::change(base_params.inpatient, terminal.inpatient as f64),
            outpatient_growth_pct: Percent::change(
                base_params.outpatient,
                terminal.outpatient as f64,
            ),
            total_patient_delta: round_half_up(inpatient_delta + outpatient_delta) as i64,
        }
    }
}
