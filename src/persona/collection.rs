//! A persona whose definition changes over time.
//!
//! Each variant is a [`PersonaDefinition`] valid for its own period. Periods
//! must not overlap, so at most one variant applies at any date.

use chrono::NaiveDate;

use super::definition::{Persona, PersonaDefinition};
use super::linspace::LinspaceGrid;
use super::period::parse_date;
use super::validation::fail_if_variants_overlap;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct PersonaCollection {
    path: String,
    variants: Vec<PersonaDefinition>,
    not_implemented: String,
}

impl PersonaCollection {
    pub fn new(
        path: impl Into<String>,
        variants: Vec<PersonaDefinition>,
        not_implemented: impl Into<String>,
    ) -> Result<Self> {
        fail_if_variants_overlap(&variants)?;
        Ok(Self {
            path: path.into(),
            variants,
            not_implemented: not_implemented.into(),
        })
    }

    /// Collection with a single variant; its own message is reused.
    pub fn single(path: impl Into<String>, definition: PersonaDefinition) -> Self {
        let not_implemented = definition.not_implemented_message().to_string();
        Self {
            path: path.into(),
            variants: vec![definition],
            not_implemented,
        }
    }

    /// Dotted path, e.g. `grundsicherung_für_erwerbsfähige.couple_1_child`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn variants(&self) -> &[PersonaDefinition] {
        &self.variants
    }

    pub fn not_implemented_message(&self) -> &str {
        &self.not_implemented
    }

    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.variants.iter().any(|v| v.is_implemented_at(date))
    }

    /// The variant whose period contains `date`.
    pub fn variant_at(&self, date: NaiveDate) -> Result<&PersonaDefinition> {
        self.variants
            .iter()
            .find(|v| v.is_implemented_at(date))
            .ok_or_else(|| Error::not_implemented(self.not_implemented.clone()))
    }

    /// Instantiate the variant in force at the policy date.
    pub fn instantiate(
        &self,
        policy_date: &str,
        evaluation_date: Option<&str>,
        grid: Option<&LinspaceGrid>,
    ) -> Result<Persona> {
        let policy = parse_date(policy_date)?;
        self.variant_at(policy)?
            .instantiate(policy_date, evaluation_date, grid)
    }
}
