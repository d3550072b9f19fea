//! Side-by-side comparison of two scenarios' terminal-year projections.
use crate::forecast::{BaseParams, ForecastConfig, comparison_seed, generate_series};
use crate::scenario::{Scenario, TerminalValues};
use crate::units::Percent;
use serde::Serialize;

/// Differences between two scenarios' terminal values (second minus first)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonDeltas {
    /// Difference in inpatient volume
    pub inpatient_diff: i64,
    /// Difference in inpatient volume relative to the first scenario
    pub inpatient_pct: Percent,
    /// Difference in outpatient volume
    pub outpatient_diff: i64,
    /// Difference in outpatient volume relative to the first scenario
    pub outpatient_pct: Percent,
}

/// The result of comparing scenario A with scenario B
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    /// Terminal values for scenario A
    pub terminal_a: TerminalValues,
    /// Terminal values for scenario B
    pub terminal_b: TerminalValues,
    /// Differences from A to B
    pub deltas: ComparisonDeltas,
}

impl Comparison {
    /// Whether B projects at least as much inpatient volume as A
    pub fn is_favourable(&self) -> bool {
        self.deltas.inpatient_diff >= 0
    }
}

/// Get the terminal values for a scenario.
///
/// Terminal values supplied with the scenario are used if present. Otherwise they are taken from
/// the last year of freshly generated series, using `seed`.
pub fn terminal_values(
    scenario: &Scenario,
    base_params: &BaseParams,
    config: &ForecastConfig,
    seed: &str,
) -> TerminalValues {
    if let Some(terminal) = scenario.terminal {
        return terminal;
    }

    let last = |base_value, rate| {
        generate_series(base_value, rate, config, seed)
            .last()
            .copied()
            .unwrap_or(0)
    };

    TerminalValues {
        inpatient: last(base_params.inpatient, scenario.data.inpatient_growth),
        outpatient: last(base_params.outpatient, scenario.data.outpatient_growth),
    }
}

/// Compare the terminal-year projections of two scenarios.
pub fn compare(
    scenario_a: &Scenario,
    scenario_b: &Scenario,
    base_params: &BaseParams,
    config: &ForecastConfig,
) -> Comparison {
    let terminal_of = |scenario: &Scenario| {
        terminal_values(
            scenario,
            base_params,
            config,
            &comparison_seed(scenario.id.as_str()),
        )
    };
    let terminal_a = terminal_of(scenario_a);
    let terminal_b = terminal_of(scenario_b);

    let inpatient_diff = terminal_b.inpatient - terminal_a.inpatient;
    let outpatient_diff = terminal_b.outpatient - terminal_a.outpatient;
    let deltas = ComparisonDeltas {
        inpatient_diff,
        inpatient_pct: Percent::change(terminal_a.inpatient as f64, terminal_b.inpatient as f64),
        outpatient_diff,
        outpatient_pct: Percent::change(
            terminal_a.outpatient as f64,
            terminal_b.outpatient as f64,
        ),
    };

    Comparison {
        terminal_a,
        terminal_b,
        deltas,
    }
}

/// A row of the parameter comparison table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRow {
    /// Parameter description
    pub label: &'static str,
    /// Value for scenario A
    pub value_a: String,
    /// Value for scenario B
    pub value_b: String,
}

/// The table of parameters shown alongside a comparison
pub fn parameter_rows(scenario_a: &Scenario, scenario_b: &Scenario) -> Vec<ParameterRow> {
    let constraints = |scenario: &Scenario| {
        if scenario.data.apply_capacity_limits {
            "Active".to_string()
        } else {
            "None".to_string()
        }
    };
    let row = |label, get: fn(&Scenario) -> String| ParameterRow {
        label,
        value_a: get(scenario_a),
        value_b: get(scenario_b),
    };

    vec![
        row("Outpatient Growth Rate", |s: &Scenario| s.data.outpatient_growth.to_string()),
        row("New Patient Growth", |s: &Scenario| s.data.new_patient_growth.to_string()),
        row("Inpatient Growth Rate", |s: &Scenario| s.data.inpatient_growth.to_string()),
        ParameterRow {
            label: "Capacity Constraints",
            value_a: constraints(scenario_a),
            value_b: constraints(scenario_b),
        },
    ]
}
