//! Personas for income taxes and social insurance contributions.

use super::{bool_input, float_input, geburtsjahr, int_input, targets};
use crate::error::Result;
use crate::persona::elements::{description, input, p_id, EVALUATION_DATE};
use crate::persona::{ActivePeriod, PersonaCollection, PersonaDefinition};

pub const COUPLE_1_CHILD: &str = "einkommensteuer_sozialabgaben.couple_1_child";

const NOT_IMPLEMENTED: &str =
    "Currently, GETTSIM does not support the calculation of income taxes before 2005.";

/// Jointly taxed married couple with one child, both parents working full time.
pub fn couple_1_child() -> Result<PersonaCollection> {
    let mut elements = vec![
        description(
            "description",
            "Persona to compute income taxes and social insurance contributions. Jointly \
             taxed married couple with one child. All transfers are set to zero; don't use \
             this persona for low- to mid-income households, as they may be eligible for \
             (means-tested) transfers.",
        )
        .build()?,
        p_id([0, 1, 2])?,
        int_input("hh_id", [0, 0, 0])?,
        int_input("alter", [30, 30, 10])?,
        int_input("arbeitsstunden_w", [39, 39, 0])?,
        int_input("behinderungsgrad", [0, 0, 0])?,
        input("geburtsjahr").derived(&[EVALUATION_DATE, "alter"], geburtsjahr)?,
        bool_input("wohnort_ost_hh", [false, false, false])?,
        int_input("einnahmen__bruttolohn_m", [3000, 3000, 0])?,
        float_input("einnahmen__kapitalerträge_y", [500.0, 0.0, 0.0])?,
        int_input("einkommensteuer__einkünfte__sonstige__rente__betrag_m", [0, 0, 0])?,
        int_input(
            "sozialversicherung__kranken__beitrag__bemessungsgrundlage_rente_m",
            [0, 0, 0],
        )?,
        bool_input(
            "einkommensteuer__einkünfte__ist_hauptberuflich_selbstständig",
            [false, false, false],
        )?,
        int_input("einkommensteuer__einkünfte__aus_gewerbebetrieb__betrag_m", [0, 0, 0])?,
        int_input(
            "einkommensteuer__einkünfte__aus_vermietung_und_verpachtung__betrag_m",
            [0, 0, 0],
        )?,
        int_input(
            "einkommensteuer__einkünfte__aus_forst_und_landwirtschaft__betrag_m",
            [0, 0, 0],
        )?,
        int_input(
            "einkommensteuer__einkünfte__aus_selbstständiger_arbeit__betrag_m",
            [0, 0, 0],
        )?,
        int_input("einkommensteuer__einkünfte__sonstige__alle_weiteren_m", [0, 0, 0])?,
        int_input(
            "einkommensteuer__abzüge__beitrag_private_rentenversicherung_m",
            [0, 0, 0],
        )?,
        float_input(
            "einkommensteuer__abzüge__kinderbetreuungskosten_m",
            [0.0, 0.0, 100.0],
        )?,
        int_input(
            "einkommensteuer__abzüge__p_id_kinderbetreuungskostenträger",
            [-1, -1, 0],
        )?,
        bool_input("einkommensteuer__gemeinsam_veranlagt", [true, true, false])?,
        bool_input(
            "sozialversicherung__kranken__beitrag__privat_versichert",
            [false, false, false],
        )?,
        bool_input(
            "sozialversicherung__pflege__beitrag__hat_kinder",
            [true, true, false],
        )?,
        bool_input("familie__alleinerziehend", [false, false, false])?,
        int_input("familie__p_id_ehepartner", [1, 0, -1])?,
        int_input("familie__p_id_elternteil_1", [-1, -1, 0])?,
        int_input("familie__p_id_elternteil_2", [-1, -1, 1])?,
        bool_input("kindergeld__in_ausbildung", [false, false, false])?,
        int_input("kindergeld__p_id_empfänger", [-1, -1, 0])?,
    ];
    elements.extend(targets(&[
        "einkommensteuer__betrag_y_sn",
        "sozialversicherung__pflege__beitrag__betrag_versicherter_y",
        "sozialversicherung__kranken__beitrag__betrag_versicherter_y",
        "sozialversicherung__rente__beitrag__betrag_versicherter_y",
        "sozialversicherung__arbeitslosen__beitrag__betrag_versicherter_y",
        "kindergeld__betrag_y",
    ])?);

    let definition = PersonaDefinition::new("couple_1_child", elements)?
        .with_period(ActivePeriod::from_strs(Some("2005-01-01"), None)?)
        .with_not_implemented(NOT_IMPLEMENTED);
    Ok(PersonaCollection::single(COUPLE_1_CHILD, definition))
}
