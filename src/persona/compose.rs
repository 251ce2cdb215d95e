//! Assembly of input data from active input elements.
//!
//! Derived inputs name their arguments; those are either qualified names of
//! other active inputs, `p_id`, or `evaluation_date`. Inputs are evaluated in
//! dependency order (Kahn's algorithm, sorted for determinism) and every
//! resulting column must be as long as the `p_id` column.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::elements::{InputElement, InputSource, PidElement, EVALUATION_DATE, P_ID};
use crate::data::Column;
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────
// Evaluation Context
// ─────────────────────────────────────────────────────────────────

/// What a derived input can see while it is being computed.
pub struct EvalContext<'a> {
    evaluation_date: NaiveDate,
    columns: &'a BTreeMap<String, Column>,
}

impl<'a> EvalContext<'a> {
    pub fn new(evaluation_date: NaiveDate, columns: &'a BTreeMap<String, Column>) -> Self {
        Self {
            evaluation_date,
            columns,
        }
    }

    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    pub fn evaluation_year(&self) -> i64 {
        i64::from(self.evaluation_date.year())
    }

    /// A column computed earlier in the evaluation order.
    pub fn column(&self, qname: &str) -> Result<&'a Column> {
        self.columns.get(qname).ok_or_else(|| Error::ColumnNotFound {
            qname: qname.to_string(),
        })
    }

    pub fn int(&self, qname: &str) -> Result<&'a [i64]> {
        self.column(qname)?.as_int(qname)
    }
}

// ─────────────────────────────────────────────────────────────────
// Assembly
// ─────────────────────────────────────────────────────────────────

/// Evaluate all inputs and return `qname -> column`, including `p_id`.
pub fn assemble_input_data(
    p_id: &PidElement,
    inputs: &[&InputElement],
    evaluation_date: NaiveDate,
) -> Result<BTreeMap<String, Column>> {
    let by_qname: BTreeMap<&str, &InputElement> =
        inputs.iter().map(|el| (el.qname.as_str(), *el)).collect();

    fail_if_free_arguments(&by_qname)?;
    let order = evaluation_order(&by_qname)?;
    debug!(inputs = order.len(), %evaluation_date, "Evaluating persona inputs");

    let expected = p_id.persona_size();
    let mut columns = BTreeMap::new();
    columns.insert(P_ID.to_string(), p_id.column());

    for qname in order {
        let Some(element) = by_qname.get(qname.as_str()) else {
            return Err(Error::Internal(format!("{qname} vanished from the input set")));
        };
        let column = match &element.source {
            InputSource::Constant(column) => column.clone(),
            InputSource::Derived { func, .. } => {
                func(&EvalContext::new(evaluation_date, &columns))?
            }
        };
        if column.len() != expected {
            return Err(Error::LengthMismatch {
                qname,
                expected,
                actual: column.len(),
            });
        }
        columns.insert(qname, column);
    }

    Ok(columns)
}

fn fail_if_free_arguments(by_qname: &BTreeMap<&str, &InputElement>) -> Result<()> {
    let free: BTreeSet<&str> = by_qname
        .values()
        .copied()
        .flat_map(|el| el.args())
        .map(String::as_str)
        .filter(|arg| *arg != EVALUATION_DATE && *arg != P_ID && !by_qname.contains_key(arg))
        .collect();

    if free.is_empty() {
        return Ok(());
    }
    Err(Error::MissingArguments {
        arguments: free.into_iter().map(str::to_string).collect(),
    })
}

/// Order inputs so every one comes after the inputs it depends on.
fn evaluation_order(by_qname: &BTreeMap<&str, &InputElement>) -> Result<Vec<String>> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (qname, element) in by_qname {
        let deps: BTreeSet<&str> = element
            .args()
            .iter()
            .map(String::as_str)
            .filter(|arg| by_qname.contains_key(arg))
            .collect();
        in_degree.insert(*qname, deps.len());
        for dep in deps {
            dependents.entry(dep).or_default().push(*qname);
        }
    }

    let mut order = Vec::with_capacity(by_qname.len());
    let mut current_level: Vec<&str> = in_degree
        .iter()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(q, _)| *q)
        .collect();

    while !current_level.is_empty() {
        current_level.sort_unstable();
        let mut next_level = Vec::new();
        for qname in &current_level {
            order.push(qname.to_string());
            for dependent in dependents.get(qname).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        next_level.push(*dependent);
                    }
                }
            }
        }
        current_level = next_level;
    }

    if order.len() != by_qname.len() {
        let stuck: Vec<&str> = in_degree
            .iter()
            .filter(|&(_, &deg)| deg > 0)
            .map(|(q, _)| *q)
            .collect();
        return Err(Error::CyclicDependency {
            cycle: trace_cycle(&stuck, by_qname),
        });
    }

    Ok(order)
}

/// Follow dependencies among the stuck nodes until one repeats: `a -> b -> a`.
fn trace_cycle(stuck: &[&str], by_qname: &BTreeMap<&str, &InputElement>) -> Vec<String> {
    let stuck_set: HashSet<&str> = stuck.iter().copied().collect();
    let Some(start) = stuck.first() else {
        return Vec::new();
    };

    let mut path = vec![start.to_string()];
    let mut visited = HashSet::from([*start]);
    let mut current = *start;

    while let Some(next) = by_qname.get(current).copied().and_then(|el| {
        el.args()
            .iter()
            .map(String::as_str)
            .find(|arg| stuck_set.contains(arg))
    }) {
        path.push(next.to_string());
        if !visited.insert(next) {
            break;
        }
        current = next;
    }

    // The walk may enter the loop from a node that only depends on it.
    if let Some(last) = path.last().cloned() {
        if let Some(first) = path.iter().position(|qname| *qname == last) {
            path.drain(..first);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::elements::{input, PersonaElement};
    use crate::persona::period::parse_date;

    fn unwrap_input(el: PersonaElement) -> InputElement {
        match el {
            PersonaElement::Input(e) => e,
            other => panic!("expected input, got {}", other.kind()),
        }
    }

    fn geburtsjahr(ctx: &EvalContext<'_>) -> Result<Column> {
        let year = ctx.evaluation_year();
        Ok(Column::int(ctx.int("alter")?.iter().map(|a| year - a)))
    }

    fn a_from_b(ctx: &EvalContext<'_>) -> Result<Column> {
        Ok(ctx.column("b")?.clone())
    }

    fn b_from_a(ctx: &EvalContext<'_>) -> Result<Column> {
        Ok(ctx.column("a")?.clone())
    }

    fn pid(n: i64) -> PidElement {
        PidElement::new((0..n).collect()).unwrap()
    }

    #[test]
    fn test_assemble_constants_and_derived() {
        let alter = unwrap_input(input("alter").constant(Column::int([30, 30, 10])).unwrap());
        let gj = unwrap_input(
            input("geburtsjahr")
                .derived(&[EVALUATION_DATE, "alter"], geburtsjahr)
                .unwrap(),
        );

        let data = assemble_input_data(
            &pid(3),
            &[&gj, &alter],
            parse_date("2025-06-01").unwrap(),
        )
        .unwrap();

        assert_eq!(data["p_id"], Column::int([0, 1, 2]));
        assert_eq!(data["geburtsjahr"], Column::int([1995, 1995, 2015]));
    }

    #[test]
    fn test_missing_arguments() {
        let gj = unwrap_input(
            input("geburtsjahr")
                .derived(&[EVALUATION_DATE, "alter"], geburtsjahr)
                .unwrap(),
        );
        let err =
            assemble_input_data(&pid(3), &[&gj], parse_date("2025-01-01").unwrap()).unwrap_err();
        assert!(err
            .to_string()
            .contains("The following parameters are needed to create the input data"));
        assert!(err.to_string().contains("alter"));
        assert!(!err.to_string().contains(EVALUATION_DATE));
    }

    #[test]
    fn test_cycle_is_reported() {
        let a = unwrap_input(input("a").derived(&["b"], a_from_b).unwrap());
        let b = unwrap_input(input("b").derived(&["a"], b_from_a).unwrap());
        let err = assemble_input_data(&pid(1), &[&a, &b], parse_date("2025-01-01").unwrap())
            .unwrap_err();
        match err {
            Error::CyclicDependency { cycle } => assert_eq!(cycle, vec!["a", "b", "a"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_excludes_downstream_inputs() {
        let lead = unwrap_input(input("0lead").derived(&["a"], b_from_a).unwrap());
        let a = unwrap_input(input("a").derived(&["b"], a_from_b).unwrap());
        let b = unwrap_input(input("b").derived(&["a"], b_from_a).unwrap());
        let err = assemble_input_data(
            &pid(1),
            &[&lead, &a, &b],
            parse_date("2025-01-01").unwrap(),
        )
        .unwrap_err();
        match err {
            Error::CyclicDependency { cycle } => assert_eq!(cycle, vec!["a", "b", "a"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let hh_id = unwrap_input(input("hh_id").constant(Column::int([0, 0])).unwrap());
        let err = assemble_input_data(&pid(3), &[&hh_id], parse_date("2025-01-01").unwrap())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The input data for hh_id has a different length than the p_id array. \
             The length of hh_id is 2, but the length of p_id is 3."
        );
    }

    #[test]
    fn test_derived_may_read_p_id() {
        fn copy_p_id(ctx: &EvalContext<'_>) -> Result<Column> {
            Ok(ctx.column(P_ID)?.clone())
        }
        let hh_id = unwrap_input(input("hh_id").derived(&[P_ID], copy_p_id).unwrap());
        let data =
            assemble_input_data(&pid(2), &[&hh_id], parse_date("2025-01-01").unwrap()).unwrap();
        assert_eq!(data["hh_id"], Column::int([0, 1]));
    }
}
