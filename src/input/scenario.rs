//! Code for reading in the scenarios CSV file.
use super::{input_err_msg, read_csv};
use crate::scenario::{Scenario, ScenarioData, ScenarioID, ScenarioStore, TerminalValues};
use crate::units::Percent;
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use serde::Deserialize;
use std::path::Path;

const SCENARIOS_FILE_NAME: &str = "scenarios.csv";

/// A row of the scenarios CSV file
#[derive(Debug, Clone, Deserialize, PartialEq)]
struct ScenarioRaw {
    id: String,
    name: String,
    inpatient_growth: Percent,
    outpatient_growth: Percent,
    new_patient_growth: Percent,
    market_share: Percent,
    referral_growth: Percent,
    apply_capacity_limits: bool,
    add_beds: u32,
    add_chairs: u32,
    programs: Option<String>,
    terminal_inpatient: Option<i64>,
    terminal_outpatient: Option<i64>,
}

/// Parse a semicolon-separated list of programmes (e.g. "Cardiology; Neurology")
fn parse_programs(s: &str) -> Result<IndexSet<String>> {
    let mut programs = IndexSet::new();
    for program in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        ensure!(
            programs.insert(program.to_string()),
            "Programme {program} listed more than once"
        );
    }

    Ok(programs)
}

impl ScenarioRaw {
    /// Validate the row and convert it into a [`Scenario`]
    fn into_scenario(self) -> Result<Scenario> {
        let id = self.id.trim();
        ensure!(!id.is_empty(), "Scenario ID cannot be empty");
        // IDs are used in output file names
        ensure!(
            id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "Invalid scenario ID {id}: only letters, digits, '-' and '_' are allowed"
        );
        ensure!(
            !self.name.trim().is_empty(),
            "Scenario {id} has an empty name"
        );

        for (field, value) in [
            ("inpatient_growth", self.inpatient_growth),
            ("outpatient_growth", self.outpatient_growth),
            ("new_patient_growth", self.new_patient_growth),
            ("market_share", self.market_share),
            ("referral_growth", self.referral_growth),
        ] {
            ensure!(
                value.is_finite(),
                "Scenario {id}: {field} must be a finite number"
            );
        }

        let terminal = match (self.terminal_inpatient, self.terminal_outpatient) {
            (Some(inpatient), Some(outpatient)) => Some(TerminalValues {
                inpatient,
                outpatient,
            }),
            (None, None) => None,
            _ => anyhow::bail!(
                "Scenario {id}: terminal_inpatient and terminal_outpatient must be provided together"
            ),
        };

        let programs = parse_programs(self.programs.as_deref().unwrap_or_default())
            .with_context(|| format!("Invalid programmes for scenario {id}"))?;

        Ok(Scenario {
            id: ScenarioID::new(id),
            name: self.name.trim().to_string(),
            data: ScenarioData {
                inpatient_growth: self.inpatient_growth,
                outpatient_growth: self.outpatient_growth,
                new_patient_growth: self.new_patient_growth,
                market_share: self.market_share,
                referral_growth: self.referral_growth,
                apply_capacity_limits: self.apply_capacity_limits,
                add_beds: self.add_beds,
                add_chairs: self.add_chairs,
                programs,
            },
            terminal,
        })
    }
}

/// Create a scenario store from an iterator of raw rows
fn read_scenarios_from_iter<I>(iter: I) -> Result<ScenarioStore>
where
    I: Iterator<Item = ScenarioRaw>,
{
    let scenarios = iter
        .map(ScenarioRaw::into_scenario)
        .collect::<Result<Vec<_>>>()?;

    Ok(ScenarioStore::new(scenarios)?)
}

/// Read scenarios from the scenarios CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A [`ScenarioStore`] with the first scenario in the file active.
pub fn read_scenarios(model_dir: &Path) -> Result<ScenarioStore> {
    let file_path = model_dir.join(SCENARIOS_FILE_NAME);
    let rows = read_csv::<ScenarioRaw>(&file_path)?;
    read_scenarios_from_iter(rows.into_iter()).with_context(|| input_err_msg(&file_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::{fixture, rstest};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[fixture]
    fn raw() -> ScenarioRaw {
        ScenarioRaw {
            id: "base-case".into(),
            name: "Base Case".into(),
            inpatient_growth: Percent(4.5),
            outpatient_growth: Percent(6.0),
            new_patient_growth: Percent(5.0),
            market_share: Percent(45.0),
            referral_growth: Percent(25.0),
            apply_capacity_limits: true,
            add_beds: 10,
            add_chairs: 5,
            programs: Some("Cardiology;Neurology".into()),
            terminal_inpatient: None,
            terminal_outpatient: None,
        }
    }

    #[rstest]
    #[case("", &[])]
    #[case("Cardiology", &["Cardiology"])]
    #[case("Cardiology; Neurology ;", &["Cardiology", "Neurology"])]
    fn test_parse_programs(#[case] input: &str, #[case] expected: &[&str]) {
        let programs = parse_programs(input).unwrap();
        assert!(programs.iter().map(String::as_str).eq(expected.iter().copied()));
    }

    #[test]
    fn test_parse_programs_duplicate() {
        assert_error!(
            parse_programs("Cardiology;Cardiology"),
            "Programme Cardiology listed more than once"
        );
    }

    #[rstest]
    fn test_into_scenario(raw: ScenarioRaw) {
        let scenario = raw.into_scenario().unwrap();
        assert_eq!(scenario.id.as_str(), "base-case");
        assert_eq!(scenario.data.add_beds, 10);
        assert_eq!(scenario.data.programs.len(), 2);
        assert_eq!(scenario.terminal, None);
    }

    #[rstest]
    #[case("../../escaped")]
    #[case("winter/spring")]
    #[case("base.case")]
    #[case("base case")]
    fn test_into_scenario_bad_id(mut raw: ScenarioRaw, #[case] id: &str) {
        raw.id = id.into();
        assert_error!(
            raw.into_scenario(),
            format!("Invalid scenario ID {id}: only letters, digits, '-' and '_' are allowed")
        );
    }

    #[rstest]
    fn test_into_scenario_terminal(mut raw: ScenarioRaw) {
        raw.terminal_inpatient = Some(1500);
        raw.terminal_outpatient = Some(6000);
        assert_eq!(
            raw.into_scenario().unwrap().terminal,
            Some(TerminalValues {
                inpatient: 1500,
                outpatient: 6000
            })
        );
    }

    #[rstest]
    fn test_into_scenario_partial_terminal(mut raw: ScenarioRaw) {
        raw.terminal_inpatient = Some(1500);
        assert_error!(
            raw.into_scenario(),
            "Scenario base-case: terminal_inpatient and terminal_outpatient must be provided together"
        );
    }

    #[rstest]
    fn test_into_scenario_bad_rate(mut raw: ScenarioRaw) {
        raw.market_share = Percent(f64::NAN);
        assert_error!(
            raw.into_scenario(),
            "Scenario base-case: market_share must be a finite number"
        );
    }

    #[rstest]
    fn test_into_scenario_empty_name(mut raw: ScenarioRaw) {
        raw.name = "  ".into();
        assert_error!(raw.into_scenario(), "Scenario base-case has an empty name");
    }

    #[rstest]
    fn test_read_scenarios_duplicate_name(raw: ScenarioRaw) {
        let mut other = raw.clone();
        other.id = "other".into();
        other.name = "BASE CASE".into();
        assert_error!(
            read_scenarios_from_iter([raw, other].into_iter()),
            "Duplicate scenario name: BASE CASE"
        );
    }

    #[test]
    fn test_read_scenarios() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(SCENARIOS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "id,name,inpatient_growth,outpatient_growth,new_patient_growth,market_share,\
                referral_growth,apply_capacity_limits,add_beds,add_chairs,programs,\
                terminal_inpatient,terminal_outpatient\n\
                conservative,Conservative,2.0,3.0,2.5,35,15,false,0,0,,,\n\
                base-case,Base Case,4.5,6.0,5.0,45,25,true,10,5,Cardiology,1470,6300"
            )
            .unwrap();
        }

        let store = read_scenarios(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.active_id().as_str(), "conservative");

        let conservative = store.get("conservative").unwrap();
        assert_eq!(conservative.data.inpatient_growth, Percent(2.0));
        assert!(conservative.data.programs.is_empty());
        assert_eq!(conservative.terminal, None);

        let base_case = store.get("base-case").unwrap();
        assert_eq!(base_case.data.market_share, Percent(45.0));
        assert_eq!(
            base_case.terminal,
            Some(TerminalValues {
                inpatient: 1470,
                outpatient: 6300
            })
        );
    }
}
