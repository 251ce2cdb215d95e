//! Persona definitions and the personas instantiated from them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::compose::assemble_input_data;
use super::elements::{
    DescriptionElement, InputElement, PersonaElement, PidElement, TargetElement,
};
use super::linspace::{LinspaceGrid, LinspaceParameter};
use super::period::{parse_date, ActivePeriod};
use super::validation;
use crate::broadcast;
use crate::data::{unflatten_from_qnames, DataTree, TargetTree};
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// A persona at one policy date: input data plus the targets to compute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Persona {
    pub description: String,
    pub policy_date: NaiveDate,
    pub evaluation_date: NaiveDate,
    pub input_data_tree: DataTree,
    pub tt_targets_tree: TargetTree,
}

impl Persona {
    /// Copy this persona with `data` updated or inserted into its input data.
    ///
    /// The length of `data` must be a multiple of the persona size; every other
    /// column is broadcast so each copy keeps the original household structure.
    pub fn upsert_input_data(&self, data: &DataTree) -> Result<Persona> {
        Ok(Persona {
            input_data_tree: broadcast::upsert_input_data(&self.input_data_tree, data)?,
            ..self.clone()
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Active Elements
// ─────────────────────────────────────────────────────────────────

/// Elements of a definition that apply at one policy date.
#[derive(Debug, Clone)]
pub struct ActiveElements<'a> {
    pub p_id: &'a PidElement,
    pub description: &'a DescriptionElement,
    pub inputs: Vec<&'a InputElement>,
    pub targets: Vec<&'a TargetElement>,
}

impl ActiveElements<'_> {
    pub fn targets_tree(&self) -> Result<TargetTree> {
        unflatten_from_qnames(self.targets.iter().map(|t| (t.qname.clone(), ())))
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Definition
// ─────────────────────────────────────────────────────────────────

/// A persona over time: its elements and the period it exists in.
#[derive(Debug, Clone)]
pub struct PersonaDefinition {
    name: String,
    elements: Vec<PersonaElement>,
    period: ActivePeriod,
    not_implemented: String,
}

impl PersonaDefinition {
    /// Create a definition. Exactly one p_id element is required.
    pub fn new(name: impl Into<String>, elements: Vec<PersonaElement>) -> Result<Self> {
        let name = name.into();
        let found = elements
            .iter()
            .filter(|el| matches!(el, PersonaElement::Pid(_)))
            .count();
        if found != 1 {
            return Err(Error::PidElementCount {
                persona: name,
                found,
            });
        }
        let not_implemented = format!("Persona {} is not implemented at this date.", name);
        Ok(Self {
            name,
            elements,
            period: ActivePeriod::default(),
            not_implemented,
        })
    }

    /// Restrict the definition to `period`.
    pub fn with_period(mut self, period: ActivePeriod) -> Self {
        self.period = period;
        self
    }

    /// Message reported when instantiated outside its period.
    pub fn with_not_implemented(mut self, message: impl Into<String>) -> Self {
        self.not_implemented = message.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &[PersonaElement] {
        &self.elements
    }

    pub fn period(&self) -> ActivePeriod {
        self.period
    }

    pub fn not_implemented_message(&self) -> &str {
        &self.not_implemented
    }

    pub fn is_implemented_at(&self, date: NaiveDate) -> bool {
        self.period.is_active(date)
    }

    pub fn p_id(&self) -> Result<&PidElement> {
        self.elements
            .iter()
            .find_map(|el| match el {
                PersonaElement::Pid(pid) => Some(pid),
                _ => None,
            })
            .ok_or_else(|| Error::PidElementCount {
                persona: self.name.clone(),
                found: 0,
            })
    }

    pub fn persona_size(&self) -> Result<usize> {
        Ok(self.p_id()?.persona_size())
    }

    /// Build an earnings grid sized for this persona.
    pub fn linspace_grid(
        &self,
        parameters: Vec<LinspaceParameter>,
        n_points: usize,
    ) -> Result<LinspaceGrid> {
        let grid = LinspaceGrid::new(parameters, n_points);
        grid.validate(self.persona_size()?)?;
        Ok(grid)
    }

    /// Elements active at `policy_date`, checked for overlapping qnames and a
    /// single description.
    pub fn active_elements(&self, policy_date: NaiveDate) -> Result<ActiveElements<'_>> {
        let active: Vec<&PersonaElement> = self
            .elements
            .iter()
            .filter(|el| el.is_active(policy_date))
            .collect();

        validation::fail_if_active_qnames_overlap(&self.name, &active)?;
        validation::fail_if_not_exactly_one_description(&self.name, &active)?;

        let mut p_id = None;
        let mut description = None;
        let mut inputs = Vec::new();
        let mut targets = Vec::new();
        for el in active {
            match el {
                PersonaElement::Pid(e) => p_id = Some(e),
                PersonaElement::Description(e) => description = Some(e),
                PersonaElement::Input(e) => inputs.push(e),
                PersonaElement::Target(e) => targets.push(e),
            }
        }

        let (Some(p_id), Some(description)) = (p_id, description) else {
            return Err(Error::Internal(format!(
                "{} lost its p_id or description while resolving",
                self.name
            )));
        };
        Ok(ActiveElements {
            p_id,
            description,
            inputs,
            targets,
        })
    }

    /// Instantiate from dashed ISO date strings.
    ///
    /// The evaluation date defaults to the policy date.
    pub fn instantiate(
        &self,
        policy_date: &str,
        evaluation_date: Option<&str>,
        grid: Option<&LinspaceGrid>,
    ) -> Result<Persona> {
        let policy_date = parse_date(policy_date)?;
        let evaluation_date = match evaluation_date {
            Some(date) => parse_date(date)?,
            None => policy_date,
        };
        self.instantiate_at(policy_date, evaluation_date, grid)
    }

    pub fn instantiate_at(
        &self,
        policy_date: NaiveDate,
        evaluation_date: NaiveDate,
        grid: Option<&LinspaceGrid>,
    ) -> Result<Persona> {
        if !self.is_implemented_at(policy_date) {
            return Err(Error::not_implemented(self.not_implemented.clone()));
        }

        let active = self.active_elements(policy_date)?;
        debug!(
            persona = %self.name,
            %policy_date,
            inputs = active.inputs.len(),
            targets = active.targets.len(),
            "Resolved active persona elements"
        );

        let mut data: BTreeMap<_, _> =
            assemble_input_data(active.p_id, &active.inputs, evaluation_date)?;
        if let Some(grid) = grid {
            grid.validate(active.p_id.persona_size())?;
            data = grid.upsert_into(&data)?;
        }

        info!(persona = %self.name, %policy_date, %evaluation_date, "Instantiated persona");
        Ok(Persona {
            description: active.description.text.clone(),
            policy_date,
            evaluation_date,
            input_data_tree: unflatten_from_qnames(data)?,
            tt_targets_tree: active.targets_tree()?,
        })
    }
}
