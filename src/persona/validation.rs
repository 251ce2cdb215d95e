//! Structural checks on persona definitions and their data.

use std::collections::BTreeSet;

use crate::data::{flatten_to_qnames, leaf_name, Column, DataTree};
use crate::error::{Error, Result};

use super::definition::PersonaDefinition;
use super::elements::{PersonaElement, P_ID};

/// Fail if two active elements share a qualified name.
///
/// Descriptions carry no qname and are skipped.
pub fn fail_if_active_qnames_overlap(persona: &str, active: &[&PersonaElement]) -> Result<()> {
    let mut seen = BTreeSet::new();
    let mut overlapping = BTreeSet::new();
    for qname in active.iter().copied().filter_map(PersonaElement::qname) {
        if !seen.insert(qname) {
            overlapping.insert(qname.to_string());
        }
    }
    if overlapping.is_empty() {
        return Ok(());
    }
    Err(Error::OverlappingQnames {
        persona: persona.to_string(),
        qnames: overlapping.into_iter().collect(),
    })
}

/// Fail unless exactly one description is among the active elements.
pub fn fail_if_not_exactly_one_description(
    persona: &str,
    active: &[&PersonaElement],
) -> Result<()> {
    let found = active
        .iter()
        .filter(|el| matches!(el, PersonaElement::Description(_)))
        .count();
    if found == 1 {
        return Ok(());
    }
    Err(Error::DescriptionCount {
        persona: persona.to_string(),
        found,
    })
}

/// Fail if any two variant periods overlap.
pub fn fail_if_variants_overlap(variants: &[PersonaDefinition]) -> Result<()> {
    for (i, first) in variants.iter().enumerate() {
        for second in &variants[i + 1..] {
            let (a, b) = (first.period(), second.period());
            if a.overlaps(&b) {
                return Err(Error::OverlappingVariants {
                    first_start: a.start,
                    first_end: a.end,
                    second_start: b.start,
                    second_end: b.end,
                });
            }
        }
    }
    Ok(())
}

/// True for ids that start at 0 and never jump by more than one.
///
/// `0, 0, 1` and `0, 1, 2` qualify; `0, 2` and `0, 1, 0` do not.
pub fn is_weakly_consecutive_from_zero(values: &[i64]) -> bool {
    let Some(first) = values.first() else {
        return true;
    };
    *first == 0
        && values
            .windows(2)
            .all(|pair| pair[1] == pair[0] || pair[1] == pair[0] + 1)
}

/// Qualified names of `*_id` columns that are not weakly consecutive from zero.
///
/// Non-integer id columns count as faulty.
pub fn faulty_id_columns(tree: &DataTree) -> Vec<String> {
    flatten_to_qnames(tree)
        .into_iter()
        .filter(|(qname, _)| qname != P_ID && leaf_name(qname).ends_with("_id"))
        .filter(|(_, column)| match column {
            Column::Int(values) => !is_weakly_consecutive_from_zero(values),
            _ => true,
        })
        .map(|(qname, _)| qname)
        .collect()
}

/// Fail if [`faulty_id_columns`] finds anything.
pub fn fail_if_id_columns_invalid(tree: &DataTree) -> Result<()> {
    let qnames = faulty_id_columns(tree);
    if qnames.is_empty() {
        return Ok(());
    }
    Err(Error::InvalidIdColumn { qnames })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::unflatten_from_qnames;
    use crate::persona::elements::{description, input, p_id, target};

    #[test]
    fn test_weakly_consecutive() {
        assert!(is_weakly_consecutive_from_zero(&[0, 1, 2]));
        assert!(is_weakly_consecutive_from_zero(&[0, 0, 0]));
        assert!(is_weakly_consecutive_from_zero(&[0, 1, 1]));
        assert!(is_weakly_consecutive_from_zero(&[]));
        assert!(!is_weakly_consecutive_from_zero(&[0, 1, 3]));
        assert!(!is_weakly_consecutive_from_zero(&[0, 1, 0]));
        assert!(!is_weakly_consecutive_from_zero(&[1, 1]));
    }

    #[test]
    fn test_faulty_id_columns() {
        let tree = unflatten_from_qnames([
            ("p_id".to_string(), Column::int([0, 1, 2])),
            ("hh_id".to_string(), Column::int([0, 0, 0])),
            ("familie__ehe_id".to_string(), Column::int([0, 0, 2])),
            ("familie__p_id_ehepartner".to_string(), Column::int([1, 0, -1])),
            ("wohngeld__wthh_id".to_string(), Column::float([0.0, 0.0, 0.0])),
        ])
        .unwrap();

        assert_eq!(
            faulty_id_columns(&tree),
            vec!["familie__ehe_id", "wohngeld__wthh_id"]
        );
        let err = fail_if_id_columns_invalid(&tree).unwrap_err();
        assert!(err.to_string().contains("familie__ehe_id, wohngeld__wthh_id"));
    }

    #[test]
    fn test_overlapping_qnames() {
        let a = input("input_1").constant(Column::int([0])).unwrap();
        let b = input("input_1_v2")
            .qname("input_1")
            .constant(Column::int([1]))
            .unwrap();
        let t = target("target_1").build().unwrap();
        let pid = p_id([0]).unwrap();

        assert!(fail_if_active_qnames_overlap("p", &[&a, &t, &pid]).is_ok());
        match fail_if_active_qnames_overlap("p", &[&a, &b, &t]).unwrap_err() {
            Error::OverlappingQnames { qnames, .. } => assert_eq!(qnames, vec!["input_1"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_description_count() {
        let d1 = description("d1", "one").build().unwrap();
        let d2 = description("d2", "two").build().unwrap();
        let pid = p_id([0]).unwrap();

        assert!(fail_if_not_exactly_one_description("p", &[&d1, &pid]).is_ok());

        let err = fail_if_not_exactly_one_description("p", &[&pid]).unwrap_err();
        assert!(err.to_string().contains("No PersonaDescription found at p"));

        let err = fail_if_not_exactly_one_description("p", &[&d1, &d2]).unwrap_err();
        assert!(err.to_string().contains("More than one PersonaDescription"));
    }
}
