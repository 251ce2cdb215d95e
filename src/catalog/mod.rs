//! Personas shipped with the crate.
//!
//! Paths follow `<policy area>.<household>`, e.g.
//! `einkommensteuer_sozialabgaben.couple_1_child`.

pub mod einkommensteuer_sozialabgaben;
pub mod grundsicherung;

use crate::data::Column;
use crate::error::Result;
use crate::persona::elements::{input, target, PersonaElement};
use crate::persona::EvalContext;
use crate::persona::PersonaCollection;

/// Every bundled persona collection.
pub fn all() -> Result<Vec<PersonaCollection>> {
    Ok(vec![
        einkommensteuer_sozialabgaben::couple_1_child()?,
        grundsicherung::couple_1_child()?,
        grundsicherung::couple_1_child_in_karenzzeit()?,
        grundsicherung::single_adult()?,
    ])
}

// ─────────────────────────────────────────────────────────────────
// Element Shorthands
// ─────────────────────────────────────────────────────────────────

pub(crate) fn int_input<const N: usize>(qname: &str, values: [i64; N]) -> Result<PersonaElement> {
    input(qname).constant(Column::int(values))
}

pub(crate) fn float_input<const N: usize>(
    qname: &str,
    values: [f64; N],
) -> Result<PersonaElement> {
    input(qname).constant(Column::float(values))
}

pub(crate) fn bool_input<const N: usize>(
    qname: &str,
    values: [bool; N],
) -> Result<PersonaElement> {
    input(qname).constant(Column::bool(values))
}

/// Targets active for the whole lifetime of the persona.
pub(crate) fn targets(qnames: &[&str]) -> Result<Vec<PersonaElement>> {
    qnames.iter().map(|q| target(*q).build()).collect()
}

// ─────────────────────────────────────────────────────────────────
// Derived Inputs
// ─────────────────────────────────────────────────────────────────

pub(crate) fn geburtsjahr(ctx: &EvalContext<'_>) -> Result<Column> {
    let year = ctx.evaluation_year();
    Ok(Column::int(ctx.int("alter")?.iter().map(|alter| year - alter)))
}

pub(crate) fn alter_monate(ctx: &EvalContext<'_>) -> Result<Column> {
    Ok(Column::int(ctx.int("alter")?.iter().map(|alter| alter * 12)))
}

/// Retirement at 65.
pub(crate) fn jahr_renteneintritt(ctx: &EvalContext<'_>) -> Result<Column> {
    let year = ctx.evaluation_year();
    Ok(Column::int(
        ctx.int("alter")?.iter().map(|alter| year - alter + 65),
    ))
}
