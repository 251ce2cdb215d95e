//! Update or insert input data and broadcast the rest.
//!
//! Upserting data that is `k` times as long as a persona creates `k` copies of
//! the household. Columns not being upserted are replicated so that every copy
//! keeps the household structure of the original:
//!
//! - `p_id` is renumbered `0..len`.
//! - Foreign keys (`p_id_*`) point into their own copy; `-1` stays `-1`.
//! - Group ids (`*_id`) are shifted so copies never share a group.
//! - Everything else is tiled.

use std::collections::BTreeMap;

use tracing::debug;

use crate::data::{flatten_to_qnames, leaf_name, unflatten_from_qnames, Column, DataTree};
use crate::error::{Error, Result};
use crate::persona::elements::{is_consecutive_from_zero, P_ID};

/// How a column not present in the upsert data is replicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastKind {
    PersonId,
    ForeignKey,
    GroupId,
    Tile,
}

impl BroadcastKind {
    pub fn for_qname(qname: &str) -> Self {
        let leaf = leaf_name(qname);
        if qname == P_ID {
            BroadcastKind::PersonId
        } else if leaf.contains("p_id_") {
            BroadcastKind::ForeignKey
        } else if leaf.ends_with("_id") {
            BroadcastKind::GroupId
        } else {
            BroadcastKind::Tile
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Upsert
// ─────────────────────────────────────────────────────────────────

/// Upsert nested data into a persona's nested input data.
pub fn upsert_input_data(base: &DataTree, to_upsert: &DataTree) -> Result<DataTree> {
    let upserted = upsert_qname_data(&flatten_to_qnames(base), &flatten_to_qnames(to_upsert))?;
    unflatten_from_qnames(upserted)
}

/// Upsert on flat `qname -> column` maps.
pub fn upsert_qname_data(
    base: &BTreeMap<String, Column>,
    to_upsert: &BTreeMap<String, Column>,
) -> Result<BTreeMap<String, Column>> {
    let expected_length = upsert_length(to_upsert)?;
    let base_length = base_length(base)?;
    if expected_length % base_length != 0 {
        return Err(Error::UpsertNotMultiple {
            upsert_len: expected_length,
            base_len: base_length,
        });
    }
    let copies = expected_length / base_length;
    debug!(
        upserted = to_upsert.len(),
        base_length, copies, "Broadcasting persona input data"
    );

    let mut out = to_upsert.clone();
    for (qname, column) in base {
        if out.contains_key(qname) {
            continue;
        }
        let broadcast = match BroadcastKind::for_qname(qname) {
            BroadcastKind::PersonId => broadcast_p_id(column.as_int(qname)?, expected_length)?,
            BroadcastKind::ForeignKey => {
                broadcast_foreign_keys(column.as_int(qname)?, expected_length)
            }
            BroadcastKind::GroupId => broadcast_group_ids(column.as_int(qname)?, expected_length),
            BroadcastKind::Tile => column.tile(copies),
        };
        out.insert(qname.clone(), broadcast);
    }
    Ok(out)
}

/// Common length of all upsert leaves.
fn upsert_length(to_upsert: &BTreeMap<String, Column>) -> Result<usize> {
    let Some(expected) = to_upsert.values().next().map(Column::len) else {
        return Err(Error::UpsertEmpty {
            what: "data_to_upsert",
        });
    };

    let differing: Vec<(String, usize)> = to_upsert
        .iter()
        .filter(|(_, col)| col.len() != expected)
        .map(|(qname, col)| (qname.clone(), col.len()))
        .collect();
    if !differing.is_empty() {
        return Err(Error::UpsertLengthsDiffer {
            expected,
            found: differing,
        });
    }
    if expected == 0 {
        return Err(Error::UpsertEmpty {
            what: "data_to_upsert",
        });
    }
    Ok(expected)
}

/// Persona length, taken from `p_id` when present.
fn base_length(base: &BTreeMap<String, Column>) -> Result<usize> {
    let len = base
        .get(P_ID)
        .or_else(|| base.values().next())
        .map(Column::len)
        .unwrap_or(0);
    if len == 0 {
        return Err(Error::UpsertEmpty {
            what: "data_from_persona",
        });
    }
    Ok(len)
}

// ─────────────────────────────────────────────────────────────────
// Broadcasting Rules
// ─────────────────────────────────────────────────────────────────

/// `0..expected_length`, provided the original is `0..n`.
pub fn broadcast_p_id(original: &[i64], expected_length: usize) -> Result<Column> {
    if !is_consecutive_from_zero(original) {
        return Err(Error::InvalidBasePid {
            values: original.to_vec(),
        });
    }
    Ok(Column::int((0..expected_length).map(|i| i as i64)))
}

/// Tile group ids, shifting copy `k` by `k * (max + 1)`.
///
/// `[0, 1, 1]` broadcast to six rows is `[0, 1, 1, 2, 3, 3]`.
pub fn broadcast_group_ids(original: &[i64], expected_length: usize) -> Column {
    let Some(max) = original.iter().max() else {
        return Column::Int(Vec::new());
    };
    let stride = max + 1;
    Column::int(
        replicas(original, expected_length).map(|(copy, id)| id + copy * stride),
    )
}

/// Tile foreign keys, shifting copy `k` by `k * len` except for negative ids.
///
/// `[1, 0, -1]` broadcast to six rows is `[1, 0, -1, 4, 3, -1]`.
pub fn broadcast_foreign_keys(original: &[i64], expected_length: usize) -> Column {
    let stride = original.len() as i64;
    Column::int(replicas(original, expected_length).map(|(copy, id)| {
        if id >= 0 {
            id + copy * stride
        } else {
            id
        }
    }))
}

/// `(copy index, value)` for each row of the tiled column.
fn replicas(original: &[i64], expected_length: usize) -> impl Iterator<Item = (i64, i64)> + '_ {
    let copies = if original.is_empty() {
        0
    } else {
        expected_length / original.len()
    };
    (0..copies).flat_map(move |copy| original.iter().map(move |id| (copy as i64, *id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona_data() -> BTreeMap<String, Column> {
        BTreeMap::from([
            ("p_id".to_string(), Column::int([0, 1, 2])),
            ("hh_id".to_string(), Column::int([0, 0, 0])),
            ("familie__p_id_ehepartner".to_string(), Column::int([1, 0, -1])),
            ("familie__alleinerziehend".to_string(), Column::bool([false, false, false])),
            ("einnahmen__bruttolohn_m".to_string(), Column::float([3000.0, 3000.0, 0.0])),
        ])
    }

    #[test]
    fn test_broadcast_kind() {
        assert_eq!(BroadcastKind::for_qname("p_id"), BroadcastKind::PersonId);
        assert_eq!(
            BroadcastKind::for_qname("familie__p_id_ehepartner"),
            BroadcastKind::ForeignKey
        );
        assert_eq!(BroadcastKind::for_qname("hh_id"), BroadcastKind::GroupId);
        assert_eq!(
            BroadcastKind::for_qname("wohngeld__wthh_id"),
            BroadcastKind::GroupId
        );
        assert_eq!(BroadcastKind::for_qname("alter"), BroadcastKind::Tile);
        // only the leaf decides
        assert_eq!(
            BroadcastKind::for_qname("p_id_stuff__alter"),
            BroadcastKind::Tile
        );
    }

    #[test]
    fn test_broadcast_group_ids() {
        assert_eq!(
            broadcast_group_ids(&[0, 1, 1], 6),
            Column::int([0, 1, 1, 2, 3, 3])
        );
        assert_eq!(broadcast_group_ids(&[0, 0], 6), Column::int([0, 0, 1, 1, 2, 2]));
    }

    #[test]
    fn test_broadcast_foreign_keys() {
        assert_eq!(
            broadcast_foreign_keys(&[1, 0, -1], 6),
            Column::int([1, 0, -1, 4, 3, -1])
        );
    }

    #[test]
    fn test_broadcast_p_id() {
        assert_eq!(broadcast_p_id(&[0, 1], 4).unwrap(), Column::int([0, 1, 2, 3]));

        let err = broadcast_p_id(&[1, 2], 4).unwrap_err();
        assert!(err
            .to_string()
            .contains("Persona p_id does not start with 0 or increment in steps of 1"));
    }

    #[test]
    fn test_upsert_replicates_household() {
        let to_upsert = BTreeMap::from([(
            "einnahmen__bruttolohn_m".to_string(),
            Column::float([4.0, 5.0, 6.0, 7.0, 8.0, 9.0]),
        )]);
        let out = upsert_qname_data(&persona_data(), &to_upsert).unwrap();

        assert_eq!(out["p_id"], Column::int([0, 1, 2, 3, 4, 5]));
        assert_eq!(out["hh_id"], Column::int([0, 0, 0, 1, 1, 1]));
        assert_eq!(
            out["familie__p_id_ehepartner"],
            Column::int([1, 0, -1, 4, 3, -1])
        );
        assert_eq!(
            out["familie__alleinerziehend"],
            Column::bool([false; 6])
        );
        assert_eq!(out["einnahmen__bruttolohn_m"], to_upsert["einnahmen__bruttolohn_m"]);
    }

    #[test]
    fn test_upsert_can_insert_new_columns() {
        let to_upsert = BTreeMap::from([("neu".to_string(), Column::int([7, 7, 7]))]);
        let out = upsert_qname_data(&persona_data(), &to_upsert).unwrap();
        assert_eq!(out.len(), 6);
        assert_eq!(out["p_id"], Column::int([0, 1, 2]));
    }

    #[test]
    fn test_upsert_length_not_multiple() {
        let to_upsert = BTreeMap::from([("alter".to_string(), Column::int([1, 2, 3, 4]))]);
        let err = upsert_qname_data(&persona_data(), &to_upsert).unwrap_err();
        assert!(err.to_string().contains("is not a multiple of the length"));
        assert!(err.to_string().contains("data_to_upsert: 4, data_from_persona: 3"));
    }

    #[test]
    fn test_upsert_lengths_differ() {
        let to_upsert = BTreeMap::from([
            ("a".to_string(), Column::int([1, 2, 3])),
            ("b".to_string(), Column::int([1, 2, 3, 4, 5, 6])),
        ]);
        let err = upsert_qname_data(&persona_data(), &to_upsert).unwrap_err();
        match err {
            Error::UpsertLengthsDiffer { expected, found } => {
                assert_eq!(expected, 3);
                assert_eq!(found, vec![("b".to_string(), 6)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_upsert_rejects_empty_data() {
        let err = upsert_qname_data(&persona_data(), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, Error::UpsertEmpty { .. }));
    }

    #[test]
    fn test_id_columns_must_be_integers() {
        let mut base = persona_data();
        base.insert("hh_id".to_string(), Column::float([0.0, 0.0, 0.0]));
        let to_upsert = BTreeMap::from([("alter".to_string(), Column::int([1; 6]))]);
        let err = upsert_qname_data(&base, &to_upsert).unwrap_err();
        assert!(matches!(err, Error::ColumnType { .. }));
    }

    #[test]
    fn test_upsert_nested_trees() {
        let base = unflatten_from_qnames(persona_data()).unwrap();
        let to_upsert = unflatten_from_qnames([(
            "einnahmen__bruttolohn_m".to_string(),
            Column::float([1.0; 6]),
        )])
        .unwrap();

        let out = flatten_to_qnames(&upsert_input_data(&base, &to_upsert).unwrap());
        assert_eq!(out["hh_id"], Column::int([0, 0, 0, 1, 1, 1]));
    }
}
