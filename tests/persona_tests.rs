//! Persona library integration tests
//!
//! Exercises the bundled registry, instantiation over time and upserting

use std::collections::BTreeMap;

use gettsim_personas::data::{flatten_to_qnames, unflatten_from_qnames, Column};
use gettsim_personas::persona::validation::faulty_id_columns;
use gettsim_personas::persona::{parse_date, LinspaceParameter, PersonaRegistry};
use gettsim_personas::Error;

fn registry() -> PersonaRegistry {
    PersonaRegistry::bundled().unwrap()
}

#[test]
fn test_bundled_registry() {
    let registry = registry();
    assert_eq!(registry.len(), 4);
    assert_eq!(
        registry
            .get("grundsicherung_für_erwerbsfähige.couple_1_child")
            .unwrap()
            .variants()
            .len(),
        2
    );
}

#[test]
fn test_every_persona_year_pair_instantiates() {
    let registry = registry();
    let pairs = registry.persona_year_pairs(2005, 2026);
    assert!(!pairs.is_empty());

    for (year, collection) in pairs {
        let persona = collection
            .instantiate(&format!("{year}-01-01"), None, None)
            .unwrap_or_else(|e| panic!("{} in {year}: {e}", collection.path()));
        let data = flatten_to_qnames(&persona.input_data_tree);

        let size = data["p_id"].len();
        for (qname, column) in &data {
            assert_eq!(column.len(), size, "{qname} of {}", collection.path());
        }
        assert!(faulty_id_columns(&persona.input_data_tree).is_empty());
    }
}

#[test]
fn test_active_personas_change_with_reform() {
    let registry = registry();

    let before = registry.active_at(parse_date("2022-06-01").unwrap());
    assert_eq!(before.len(), 3);
    assert_eq!(
        before
            .get("grundsicherung_für_erwerbsfähige.couple_1_child")
            .unwrap()
            .name(),
        "alg_2"
    );

    let after = registry.active_at(parse_date("2023-06-01").unwrap());
    assert_eq!(after.len(), 4);
    assert_eq!(
        after
            .get("grundsicherung_für_erwerbsfähige.couple_1_child")
            .unwrap()
            .name(),
        "bürgergeld"
    );
}

#[test]
fn test_nothing_before_2005() {
    let registry = registry();
    assert!(registry
        .active_at(parse_date("2004-12-31").unwrap())
        .is_empty());

    let err = registry
        .get("einkommensteuer_sozialabgaben.couple_1_child")
        .unwrap()
        .instantiate("2004-12-31", None, None)
        .unwrap_err();
    assert!(matches!(err, Error::PersonaNotImplemented { .. }));
}

#[test]
fn test_upsert_keeps_household_structure() {
    let persona = registry()
        .get("grundsicherung_für_erwerbsfähige.single_adult")
        .unwrap()
        .instantiate("2024-01-01", None, None)
        .unwrap();

    let to_upsert = unflatten_from_qnames([(
        "einnahmen__bruttolohn_m".to_string(),
        Column::int([1000, 2000, 3000]),
    )])
    .unwrap();
    let upserted = persona.upsert_input_data(&to_upsert).unwrap();
    let data = flatten_to_qnames(&upserted.input_data_tree);

    assert_eq!(data["p_id"], Column::int([0, 1, 2]));
    assert_eq!(data["hh_id"], Column::int([0, 1, 2]));
    assert_eq!(data["familie__p_id_ehepartner"], Column::int([-1, -1, -1]));
    assert_eq!(data["alter"], Column::int([30, 30, 30]));
    assert_eq!(upserted.tt_targets_tree, persona.tt_targets_tree);
}

#[test]
fn test_linspace_grid_on_couple() {
    let registry = registry();
    let collection = registry
        .get("grundsicherung_für_erwerbsfähige.couple_1_child")
        .unwrap();
    let variant = collection
        .variant_at(parse_date("2024-01-01").unwrap())
        .unwrap();
    let grid = variant
        .linspace_grid(
            vec![
                LinspaceParameter::range(0.0, 2000.0),
                LinspaceParameter::Constant(0.0),
                LinspaceParameter::Constant(0.0),
            ],
            5,
        )
        .unwrap();

    let persona = collection
        .instantiate("2024-01-01", None, Some(&grid))
        .unwrap();
    let data: BTreeMap<String, Column> = flatten_to_qnames(&persona.input_data_tree);

    assert_eq!(data["p_id"].len(), 15);
    assert_eq!(
        data["einnahmen__bruttolohn_m"],
        Column::float([
            0.0, 0.0, 0.0, 500.0, 0.0, 0.0, 1000.0, 0.0, 0.0, 1500.0, 0.0, 0.0, 2000.0, 0.0,
            0.0,
        ])
    );
    assert_eq!(
        data["familie__p_id_elternteil_2"],
        Column::int([-1, -1, 1, -1, -1, 4, -1, -1, 7, -1, -1, 10, -1, -1, 13])
    );
    assert!(faulty_id_columns(&persona.input_data_tree).is_empty());
}
