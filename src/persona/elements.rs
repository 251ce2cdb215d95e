//! Building blocks of a persona: person ids, inputs, targets and descriptions.
//!
//! Elements are declared with small builders:
//!
//! ```
//! use gettsim_personas::data::Column;
//! use gettsim_personas::persona::elements::{description, input, p_id, target};
//!
//! # fn main() -> gettsim_personas::Result<()> {
//! let elements = vec![
//!     p_id([0, 1])?,
//!     description("couple", "A couple without children.").build()?,
//!     input("alter").qname("familie__alter").constant(Column::int([30, 30]))?,
//!     target("kindergeld__betrag_m").start_date("2005-01-01").build()?,
//! ];
//! # assert_eq!(elements.len(), 4);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::NaiveDate;

use super::compose::EvalContext;
use super::period::ActivePeriod;
use crate::data::Column;
use crate::error::{Error, Result};

/// Qualified name of the person identifier column.
pub const P_ID: &str = "p_id";

/// Argument name under which derived inputs receive the evaluation date.
pub const EVALUATION_DATE: &str = "evaluation_date";

/// Function computing a derived input column.
pub type DeriveFn = fn(&EvalContext<'_>) -> Result<Column>;

// ─────────────────────────────────────────────────────────────────
// Element Types
// ─────────────────────────────────────────────────────────────────

/// The person identifier column. Always active.
#[derive(Debug, Clone, PartialEq)]
pub struct PidElement {
    values: Vec<i64>,
}

impl PidElement {
    /// Values must be exactly `0, 1, ..., n-1`.
    pub fn new(values: Vec<i64>) -> Result<Self> {
        if !is_consecutive_from_zero(&values) {
            return Err(Error::PidNotConsecutive { values });
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Number of persons in the household.
    pub fn persona_size(&self) -> usize {
        self.values.len()
    }

    pub fn column(&self) -> Column {
        Column::Int(self.values.clone())
    }
}

pub(crate) fn is_consecutive_from_zero(values: &[i64]) -> bool {
    values
        .iter()
        .enumerate()
        .all(|(i, v)| i64::try_from(i).map_or(false, |i| i == *v))
}

/// Where the values of an input come from.
#[derive(Clone)]
pub enum InputSource {
    Constant(Column),
    Derived { args: Vec<String>, func: DeriveFn },
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Constant(column) => f.debug_tuple("Constant").field(column).finish(),
            InputSource::Derived { args, .. } => {
                f.debug_struct("Derived").field("args", args).finish_non_exhaustive()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputElement {
    pub orig_name: String,
    pub qname: String,
    pub period: ActivePeriod,
    pub source: InputSource,
}

impl InputElement {
    /// Names this input needs before it can be evaluated.
    pub fn args(&self) -> &[String] {
        match &self.source {
            InputSource::Constant(_) => &[],
            InputSource::Derived { args, .. } => args,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetElement {
    pub orig_name: String,
    pub qname: String,
    pub period: ActivePeriod,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionElement {
    pub orig_name: String,
    pub text: String,
    pub period: ActivePeriod,
}

/// Any element a persona definition is made of.
#[derive(Debug, Clone)]
pub enum PersonaElement {
    Pid(PidElement),
    Input(InputElement),
    Target(TargetElement),
    Description(DescriptionElement),
}

impl PersonaElement {
    pub fn orig_name(&self) -> &str {
        match self {
            PersonaElement::Pid(_) => P_ID,
            PersonaElement::Input(e) => &e.orig_name,
            PersonaElement::Target(e) => &e.orig_name,
            PersonaElement::Description(e) => &e.orig_name,
        }
    }

    /// Qualified name; descriptions have none.
    pub fn qname(&self) -> Option<&str> {
        match self {
            PersonaElement::Pid(_) => Some(P_ID),
            PersonaElement::Input(e) => Some(&e.qname),
            PersonaElement::Target(e) => Some(&e.qname),
            PersonaElement::Description(_) => None,
        }
    }

    pub fn period(&self) -> ActivePeriod {
        match self {
            PersonaElement::Pid(_) => ActivePeriod::default(),
            PersonaElement::Input(e) => e.period,
            PersonaElement::Target(e) => e.period,
            PersonaElement::Description(e) => e.period,
        }
    }

    pub fn is_active(&self, date: NaiveDate) -> bool {
        match self {
            PersonaElement::Pid(_) => true,
            other => other.period().is_active(date),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PersonaElement::Pid(_) => "p_id",
            PersonaElement::Input(_) => "input",
            PersonaElement::Target(_) => "target",
            PersonaElement::Description(_) => "description",
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Builders
// ─────────────────────────────────────────────────────────────────

/// Declare the person identifier column.
pub fn p_id(values: impl IntoIterator<Item = i64>) -> Result<PersonaElement> {
    PidElement::new(values.into_iter().collect()).map(PersonaElement::Pid)
}

/// Start declaring an input. The qname defaults to `name`.
pub fn input(name: impl Into<String>) -> InputBuilder {
    InputBuilder {
        name: name.into(),
        qname: None,
        dates: DateBounds::default(),
    }
}

/// Start declaring a target. Its qname is `name`.
pub fn target(name: impl Into<String>) -> TargetBuilder {
    TargetBuilder {
        name: name.into(),
        dates: DateBounds::default(),
    }
}

/// Start declaring a description.
pub fn description(name: impl Into<String>, text: impl Into<String>) -> DescriptionBuilder {
    DescriptionBuilder {
        name: name.into(),
        text: text.into(),
        dates: DateBounds::default(),
    }
}

#[derive(Debug, Clone, Default)]
struct DateBounds {
    start: Option<String>,
    end: Option<String>,
}

impl DateBounds {
    fn period(&self) -> Result<ActivePeriod> {
        ActivePeriod::from_strs(self.start.as_deref(), self.end.as_deref())
    }
}

#[derive(Debug, Clone)]
#[must_use]
pub struct InputBuilder {
    name: String,
    qname: Option<String>,
    dates: DateBounds,
}

impl InputBuilder {
    /// Override the qualified name (defaults to the element name).
    pub fn qname(mut self, qname: impl Into<String>) -> Self {
        self.qname = Some(qname.into());
        self
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.dates.start = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.dates.end = Some(date.into());
        self
    }

    /// Finish with fixed values.
    pub fn constant(self, values: impl Into<Column>) -> Result<PersonaElement> {
        self.finish(InputSource::Constant(values.into()))
    }

    /// Finish with a function of other inputs and/or `evaluation_date`.
    pub fn derived(self, args: &[&str], func: DeriveFn) -> Result<PersonaElement> {
        self.finish(InputSource::Derived {
            args: args.iter().map(|a| a.to_string()).collect(),
            func,
        })
    }

    fn finish(self, source: InputSource) -> Result<PersonaElement> {
        let period = self.dates.period()?;
        let qname = self.qname.unwrap_or_else(|| self.name.clone());
        Ok(PersonaElement::Input(InputElement {
            orig_name: self.name,
            qname,
            period,
            source,
        }))
    }
}

#[derive(Debug, Clone)]
#[must_use]
pub struct TargetBuilder {
    name: String,
    dates: DateBounds,
}

impl TargetBuilder {
    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.dates.start = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.dates.end = Some(date.into());
        self
    }

    pub fn build(self) -> Result<PersonaElement> {
        let period = self.dates.period()?;
        Ok(PersonaElement::Target(TargetElement {
            qname: self.name.clone(),
            orig_name: self.name,
            period,
        }))
    }
}

#[derive(Debug, Clone)]
#[must_use]
pub struct DescriptionBuilder {
    name: String,
    text: String,
    dates: DateBounds,
}

impl DescriptionBuilder {
    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.dates.start = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.dates.end = Some(date.into());
        self
    }

    pub fn build(self) -> Result<PersonaElement> {
        let period = self.dates.period()?;
        Ok(PersonaElement::Description(DescriptionElement {
            orig_name: self.name,
            text: self.text,
            period,
        }))
    }
}
