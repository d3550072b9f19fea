//! Scenarios are named sets of growth and capacity assumptions.
//!
//! The [`ScenarioStore`] holds every scenario for a session along with which one is active. It is
//! an ordinary value owned by the [`Model`](crate::model::Model) and passed to whatever needs it.
use crate::id::define_id_type;
use crate::units::Percent;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use unicase::UniCase;

define_id_type! {ScenarioID}

/// A map of [`Scenario`]s, keyed by scenario ID
pub type ScenarioMap = IndexMap<ScenarioID, Scenario>;

/// An error raised by a [`ScenarioStore`] operation
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    /// The request was malformed, e.g. a blank or duplicate scenario name
    #[error("{0}")]
    Validation(String),
    /// No scenario exists with the given ID
    #[error("Scenario not found: {0}")]
    NotFound(String),
    /// The operation would leave the store in an invalid state
    #[error("{0}")]
    Invariant(String),
}

/// The adjustable parameters of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioData {
    /// Yearly inpatient growth
    pub inpatient_growth: Percent,
    /// Yearly outpatient growth
    pub outpatient_growth: Percent,
    /// Yearly growth in new patients
    pub new_patient_growth: Percent,
    /// Target market share
    pub market_share: Percent,
    /// Growth in referrals
    pub referral_growth: Percent,
    /// Whether capacity limits constrain the scenario
    pub apply_capacity_limits: bool,
    /// Beds added from the activation year
    pub add_beds: u32,
    /// Treatment chairs added from the activation year
    pub add_chairs: u32,
    /// New clinical programmes
    pub programs: IndexSet<String>,
}

/// Inpatient and outpatient volumes in the final year of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalValues {
    /// Inpatient volume
    pub inpatient: i64,
    /// Outpatient volume
    pub outpatient: i64,
}

/// A named scenario
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Unique identifier, derived from the name when created interactively
    pub id: ScenarioID,
    /// Display name, unique ignoring case
    pub name: String,
    /// The scenario parameters
    pub data: ScenarioData,
    /// Terminal values supplied with the scenario, if any
    pub terminal: Option<TerminalValues>,
}

/// Derive a scenario ID from a scenario name (e.g. "Base Case" becomes "base-case")
pub fn slugify(name: &str) -> String {
    name.to_lowercase().split_whitespace().join("-")
}

/// Holds all scenarios and tracks which one is active.
///
/// A store is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioStore {
    scenarios: ScenarioMap,
    active_id: ScenarioID,
}

impl ScenarioStore {
    /// Create a store from a list of scenarios. The first scenario becomes active.
    ///
    /// Fails if the list is empty or if IDs or names (ignoring case) are repeated.
    pub fn new<I>(scenarios: I) -> Result<Self, ScenarioError>
    where
        I: IntoIterator<Item = Scenario>,
    {
        let mut map = ScenarioMap::new();
        let mut names = HashSet::new();
        for scenario in scenarios {
            if !names.insert(UniCase::new(scenario.name.clone())) {
                return Err(ScenarioError::Validation(format!(
                    "Duplicate scenario name: {}",
                    scenario.name
                )));
            }

            let id = scenario.id.clone();
            if map.insert(id.clone(), scenario).is_some() {
                return Err(ScenarioError::Validation(format!(
                    "Duplicate scenario ID: {id}"
                )));
            }
        }

        let active_id = map
            .keys()
            .next()
            .cloned()
            .ok_or_else(|| ScenarioError::Invariant("At least one scenario is required".into()))?;

        Ok(Self {
            scenarios: map,
            active_id,
        })
    }

    /// The number of scenarios
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Always false, as a store holds at least one scenario
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Whether a scenario with the given ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.scenarios.contains_key(id)
    }

    /// Get a scenario by ID
    pub fn get(&self, id: &str) -> Result<&Scenario, ScenarioError> {
        self.scenarios
            .get(id)
            .ok_or_else(|| ScenarioError::NotFound(id.to_string()))
    }

    /// Iterate over scenarios in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    /// The ID of the active scenario
    pub fn active_id(&self) -> &ScenarioID {
        &self.active_id
    }

    /// The active scenario
    pub fn active(&self) -> &Scenario {
        &self.scenarios[&self.active_id]
    }

    /// Whether another scenario already uses this name (ignoring case)
    fn is_name_taken(&self, name: &str) -> bool {
        let name = UniCase::new(name);
        self.scenarios
            .values()
            .any(|scenario| UniCase::new(scenario.name.as_str()) == name)
    }

    /// Create a new scenario by copying the parameters of an existing one.
    ///
    /// The new scenario's ID is derived from its name and it becomes the active scenario.
    ///
    /// # Arguments
    ///
    /// * `name` - Name for the new scenario. Surrounding whitespace is removed.
    /// * `template_id` - ID of the scenario whose parameters are copied
    ///
    /// # Returns
    ///
    /// The ID of the new scenario, or an error if the name is blank or already taken or the
    /// template doesn't exist.
    pub fn create(&mut self, name: &str, template_id: &str) -> Result<ScenarioID, ScenarioError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScenarioError::Validation(
                "Scenario name cannot be empty".into(),
            ));
        }
        if self.is_name_taken(name) {
            return Err(ScenarioError::Validation(format!(
                "A scenario named \"{name}\" already exists"
            )));
        }

        let id = ScenarioID::from(slugify(name));
        if self.contains(id.as_str()) {
            return Err(ScenarioError::Validation(format!(
                "Scenario ID \"{id}\" is already in use"
            )));
        }

        let data = self.get(template_id)?.data.clone();
        debug!("Creating scenario {id} from template {template_id}");
        self.scenarios.insert(
            id.clone(),
            Scenario {
                id: id.clone(),
                name: name.to_string(),
                data,
                terminal: None,
            },
        );
        self.active_id = id.clone();

        Ok(id)
    }

    /// Replace all parameters of a scenario.
    ///
    /// Any terminal values supplied with the scenario are discarded, as they no longer apply.
    pub fn update(&mut self, id: &str, data: ScenarioData) -> Result<(), ScenarioError> {
        let scenario = self
            .scenarios
            .get_mut(id)
            .ok_or_else(|| ScenarioError::NotFound(id.to_string()))?;
        scenario.data = data;
        scenario.terminal = None;
        debug!("Updated scenario {id}");

        Ok(())
    }

    /// Delete a scenario, returning it.
    ///
    /// The last remaining scenario cannot be deleted. If the active scenario is deleted, the first
    /// remaining scenario becomes active.
    pub fn delete(&mut self, id: &str) -> Result<Scenario, ScenarioError> {
        if self.scenarios.len() <= 1 {
            return Err(ScenarioError::Invariant(
                "Cannot delete the last scenario".into(),
            ));
        }

        let scenario = self
            .scenarios
            .shift_remove(id)
            .ok_or_else(|| ScenarioError::NotFound(id.to_string()))?;
        if scenario.id == self.active_id {
            self.active_id = self
                .scenarios
                .keys()
                .next()
                .expect("Store has at least one scenario")
                .clone();
        }
        debug!("Deleted scenario {id}; active scenario is {}", self.active_id);

        Ok(scenario)
    }

    /// Make the given scenario active
    pub fn set_active(&mut self, id: &str) -> Result<(), ScenarioError> {
        self.active_id = self.get(id)?.id.clone();

        Ok(())
    }
}

impl Default for ScenarioStore {
    /// The stock scenarios: Conservative, Base Case and Aggressive
    fn default() -> Self {
        let scenario = |name: &str, growth: [f64; 5], limits: bool, beds, chairs, programs: &[&str]| {
            Scenario {
                id: slugify(name).into(),
                name: name.into(),
                data: ScenarioData {
                    inpatient_growth: Percent(growth[0]),
                    outpatient_growth: Percent(growth[1]),
                    new_patient_growth: Percent(growth[2]),
                    market_share: Percent(growth[3]),
                    referral_growth: Percent(growth[4]),
                    apply_capacity_limits: limits,
                    add_beds: beds,
                    add_chairs: chairs,
                    programs: programs.iter().map(ToString::to_string).collect(),
                },
                terminal: None,
            }
        };

        Self::new([
            scenario("Conservative", [2.0, 3.0, 2.5, 35.0, 15.0], false, 0, 0, &[]),
            scenario("Base Case", [4.5, 6.0, 5.0, 45.0, 25.0], true, 10, 5, &["Cardiology"]),
            scenario(
                "Aggressive",
                [8.0, 12.0, 10.0, 60.0, 40.0],
                true,
                25,
                15,
                &["Cardiology", "Neurology"],
            ),
        ])
        .expect("Stock scenarios are valid")
    }
}
