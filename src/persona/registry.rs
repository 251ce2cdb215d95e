//! Registry of persona collections, keyed by dotted path.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::collection::PersonaCollection;
use super::definition::PersonaDefinition;
use super::period::ActivePeriod;
use crate::catalog;
use crate::error::{Error, Result};

/// All known personas.
#[derive(Debug, Clone, Default)]
pub struct PersonaRegistry {
    collections: BTreeMap<String, PersonaCollection>,
}

impl PersonaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every persona shipped with this crate.
    pub fn bundled() -> Result<Self> {
        let mut registry = Self::new();
        for collection in catalog::all()? {
            registry.register(collection)?;
        }
        debug!(personas = registry.len(), "Loaded bundled personas");
        Ok(registry)
    }

    pub fn register(&mut self, collection: PersonaCollection) -> Result<()> {
        if self.collections.contains_key(collection.path()) {
            return Err(Error::DuplicatePersona {
                path: collection.path().to_string(),
            });
        }
        self.collections
            .insert(collection.path().to_string(), collection);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Result<&PersonaCollection> {
        self.collections
            .get(path)
            .ok_or_else(|| Error::PersonaNotFound {
                path: path.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn collections(&self) -> impl Iterator<Item = &PersonaCollection> {
        self.collections.values()
    }

    /// Summary of every persona and its variants.
    pub fn list(&self) -> Vec<PersonaListing> {
        self.collections
            .values()
            .map(|collection| PersonaListing {
                path: collection.path().to_string(),
                variants: collection
                    .variants()
                    .iter()
                    .map(|v| VariantListing {
                        name: v.name().to_string(),
                        period: v.period(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Personas that can be instantiated at `date`.
    pub fn active_at(&self, date: NaiveDate) -> ActivePersonas<'_> {
        let personas = self
            .collections
            .iter()
            .filter_map(|(path, c)| c.variant_at(date).ok().map(|v| (path.clone(), v)))
            .collect();
        ActivePersonas { date, personas }
    }

    /// Every `(year, persona)` pair where the persona exists on January 1st.
    ///
    /// Both bounds are inclusive: `end_year` itself is checked.
    pub fn persona_year_pairs(
        &self,
        start_year: i32,
        end_year: i32,
    ) -> Vec<(i32, &PersonaCollection)> {
        (start_year..=end_year)
            .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1).map(|d| (year, d)))
            .flat_map(move |(year, jan_1)| {
                self.collections
                    .values()
                    .filter(move |c| c.is_active(jan_1))
                    .map(move |c| (year, c))
            })
            .collect()
    }
}

/// Personas active at one date, each resolved to its variant.
#[derive(Debug, Clone)]
pub struct ActivePersonas<'a> {
    pub date: NaiveDate,
    personas: BTreeMap<String, &'a PersonaDefinition>,
}

impl<'a> ActivePersonas<'a> {
    pub fn get(&self, path: &str) -> Option<&'a PersonaDefinition> {
        self.personas.get(path).copied()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.personas.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a PersonaDefinition)> + '_ {
        self.personas.iter().map(|(p, d)| (p.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

/// Summary of a persona collection.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaListing {
    pub path: String,
    pub variants: Vec<VariantListing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantListing {
    pub name: String,
    pub period: ActivePeriod,
}
