//! Personas for basic income support for job seekers (Arbeitslosengeld II,
//! Bürgergeld from 2023) and the transfers interacting with it.

use super::{
    alter_monate, bool_input, float_input, geburtsjahr, int_input, jahr_renteneintritt, targets,
};
use crate::data::Column;
use crate::error::Result;
use crate::persona::elements::{description, input, p_id, target, PersonaElement, EVALUATION_DATE};
use crate::persona::{ActivePeriod, PersonaCollection, PersonaDefinition};

pub const COUPLE_1_CHILD: &str = "grundsicherung_für_erwerbsfähige.couple_1_child";
pub const COUPLE_1_CHILD_IN_KARENZZEIT: &str =
    "grundsicherung_für_erwerbsfähige.couple_1_child_in_karenzzeit";
pub const SINGLE_ADULT: &str = "grundsicherung_für_erwerbsfähige.single_adult";

const NOT_IMPLEMENTED: &str = "Personas are available from 2005. Basic income support is not \
                               implemented in GETTSIM before 2005.";

const KARENZZEIT_NOT_IMPLEMENTED: &str = "Karenzzeit for Bürgergeld is not relevant before \
    2023. Use the 'grundsicherung_für_erwerbsfähige.couple_1_child' persona instead.";

const COUPLE_DESCRIPTION: &str = "Persona to compute mean-tested transfers for low-income \
    households. Jointly taxed married couple with one child. Income from pensions, parental \
    leave benefits and subsistence benefits for the elderly are set to zero.";

// ─────────────────────────────────────────────────────────────────
// Couple With One Child
// ─────────────────────────────────────────────────────────────────

/// Which benefit regime a couple variant is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regime {
    Arbeitslosengeld2,
    Buergergeld,
}

/// Couple with one child and a part-time earner. Two variants: Arbeitslosengeld II
/// until 2022, Bürgergeld from 2023 on.
pub fn couple_1_child() -> Result<PersonaCollection> {
    let alg_2 = PersonaDefinition::new("alg_2", couple_elements(Regime::Arbeitslosengeld2)?)?
        .with_period(ActivePeriod::from_strs(Some("2005-01-01"), Some("2022-12-31"))?)
        .with_not_implemented(NOT_IMPLEMENTED);
    let buergergeld = PersonaDefinition::new("bürgergeld", couple_elements(Regime::Buergergeld)?)?
        .with_period(ActivePeriod::from_strs(Some("2023-01-01"), None)?)
        .with_not_implemented(NOT_IMPLEMENTED);

    PersonaCollection::new(COUPLE_1_CHILD, vec![alg_2, buergergeld], NOT_IMPLEMENTED)
}

fn couple_elements(regime: Regime) -> Result<Vec<PersonaElement>> {
    let (rent, heating, living_space) = match regime {
        Regime::Arbeitslosengeld2 => (0, 0, 0),
        Regime::Buergergeld => (400, 80, 50),
    };

    let mut elements = vec![
        description("description", COUPLE_DESCRIPTION).build()?,
        p_id([0, 1, 2])?,
        int_input("hh_id", [0, 0, 0])?,
        int_input("alter", [30, 30, 6])?,
        int_input("alter_monate", [360, 360, 60])?,
        int_input("arbeitslosengeld_2__p_id_einstandspartner", [1, 0, -1])?,
        int_input("arbeitsstunden_w", [15, 0, 0])?,
        int_input("behinderungsgrad", [0, 0, 0])?,
        int_input(
            "einkommensteuer__abzüge__beitrag_private_rentenversicherung_m",
            [0, 0, 0],
        )?,
        int_input("einkommensteuer__abzüge__kinderbetreuungskosten_m", [0, 0, 100])?,
        int_input(
            "einkommensteuer__abzüge__p_id_kinderbetreuungskostenträger",
            [-1, -1, 0],
        )?,
        int_input(
            "einkommensteuer__einkünfte__aus_forst_und_landwirtschaft__betrag_y",
            [0, 0, 0],
        )?,
        int_input("einkommensteuer__einkünfte__aus_gewerbebetrieb__betrag_y", [0, 0, 0])?,
        int_input(
            "einkommensteuer__einkünfte__aus_selbstständiger_arbeit__betrag_y",
            [0, 0, 0],
        )?,
        int_input(
            "einkommensteuer__einkünfte__aus_vermietung_und_verpachtung__betrag_y",
            [0, 0, 0],
        )?,
        bool_input(
            "einkommensteuer__einkünfte__ist_hauptberuflich_selbstständig",
            [false, false, false],
        )?,
        int_input("einkommensteuer__einkünfte__sonstige__alle_weiteren_y", [0, 0, 0])?,
        bool_input("einkommensteuer__gemeinsam_veranlagt", [true, true, false])?,
        int_input("einnahmen__bruttolohn_m", [1000, 0, 0])?,
        float_input("einnahmen__kapitalerträge_y", [0.0, 0.0, 0.0])?,
        int_input("einnahmen__renten__gesetzliche_m", [0, 0, 0])?,
        int_input("einnahmen__renten__betriebliche_altersvorsorge_m", [0, 0, 0])?,
        int_input("einnahmen__renten__geförderte_private_vorsorge_m", [0, 0, 0])?,
        int_input("einnahmen__renten__sonstige_private_vorsorge_m", [0, 0, 0])?,
        int_input("elterngeld__betrag_m", [0, 0, 0])?,
        bool_input("familie__alleinerziehend", [false, false, false])?,
        int_input("familie__p_id_ehepartner", [1, 0, -1])?,
        int_input("familie__p_id_elternteil_1", [-1, -1, 0])?,
        int_input("familie__p_id_elternteil_2", [-1, -1, 1])?,
        int_input("geburtsjahr", [1995, 1995, 2015])?,
        int_input("geburtsmonat", [1, 1, 1])?,
        int_input("grundsicherung__im_alter__betrag_m_eg", [0, 0, 0])?,
        bool_input("kindergeld__in_ausbildung", [false, false, false])?,
        int_input("kindergeld__p_id_empfänger", [-1, -1, 0])?,
        bool_input(
            "sozialversicherung__arbeitslosen__arbeitssuchend",
            [false, false, false],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__mean_nettoeinkommen_in_12_monaten_vor_arbeitslosigkeit_m",
            [0, 0, 0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_beitragspflichtig_versichert_in_letzten_30_monaten",
            [0, 0, 0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_durchgängigen_bezugs_von_arbeitslosengeld",
            [0, 0, 0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_sozialversicherungspflichtiger_beschäftigung_in_letzten_5_jahren",
            [0, 0, 0],
        )?,
        bool_input(
            "sozialversicherung__kranken__beitrag__privat_versichert",
            [false, false, false],
        )?,
        bool_input(
            "sozialversicherung__pflege__beitrag__hat_kinder",
            [true, true, false],
        )?,
        bool_input("sozialversicherung__rente__bezieht_rente", [false, false, false])?,
        int_input("sozialversicherung__rente__jahr_renteneintritt", [2070, 2070, 2090])?,
        int_input("unterhalt__tatsächlich_erhaltener_betrag_m", [0, 0, 0])?,
        int_input("unterhaltsvorschuss__betrag_m", [0, 0, 0])?,
        int_input("vermögen", [0, 0, 0])?,
        bool_input("wohnen__bewohnt_eigentum_hh", [false, false, false])?,
        int_input("wohnen__bruttokaltmiete_m_hh", [rent; 3])?,
        int_input("wohnen__heizkosten_m_hh", [heating; 3])?,
        int_input("wohnen__wohnfläche_hh", [living_space; 3])?,
        int_input("wohnen__baujahr_immobilie_hh", [2000, 2000, 2000])?,
        int_input("wohngeld__mietstufe_hh", [5, 5, 5])?,
        bool_input("wohnort_ost_hh", [false, false, false])?,
    ];
    if regime == Regime::Buergergeld {
        elements.push(bool_input(
            "arbeitslosengeld_2__bezug_im_vorjahr",
            [true, true, true],
        )?);
    }
    elements.extend(targets(&[
        "einkommensteuer__betrag_m_sn",
        "sozialversicherung__rente__beitrag__betrag_versicherter_m",
        "sozialversicherung__kranken__beitrag__betrag_versicherter_m",
        "sozialversicherung__pflege__beitrag__betrag_versicherter_m",
        "sozialversicherung__arbeitslosen__beitrag__betrag_versicherter_m",
        "sozialversicherung__arbeitslosen__betrag_m",
        "arbeitslosengeld_2__betrag_m_bg",
        "wohngeld__betrag_m_wthh",
        "kinderzuschlag__betrag_m_bg",
        "kindergeld__betrag_m",
    ])?);
    Ok(elements)
}

// ─────────────────────────────────────────────────────────────────
// Couple With One Child In Karenzzeit
// ─────────────────────────────────────────────────────────────────

/// Couple in the Bürgergeld grace period, where asset and rent limits are
/// less strict. Available from 2023.
pub fn couple_1_child_in_karenzzeit() -> Result<PersonaCollection> {
    let mut elements = vec![
        description(
            "description",
            "Persona to compute mean-tested transfers for low-income households. Jointly \
             taxed married couple with one child. Income from pensions, parental leave \
             benefits and subsistence benefits for the elderly are set to zero. The \
             household is in the grace period, meaning that the limits on assets and rent \
             are less strict.",
        )
        .build()?,
        p_id([0, 1, 2])?,
        int_input("hh_id", [0, 0, 0])?,
        int_input("alter", [30, 30, 6])?,
        input("alter_monate").derived(&["alter"], alter_monate)?,
        int_input("bürgergeld__p_id_einstandspartner", [1, 0, -1])?,
        bool_input("bürgergeld__bezug_im_vorjahr", [false, false, false])?,
        int_input("arbeitsstunden_w", [15, 0, 0])?,
        int_input("behinderungsgrad", [0, 0, 0])?,
        int_input(
            "einkommensteuer__abzüge__beitrag_private_rentenversicherung_m",
            [0, 0, 0],
        )?,
        int_input("einkommensteuer__abzüge__kinderbetreuungskosten_m", [0, 0, 100])?,
        int_input(
            "einkommensteuer__abzüge__p_id_kinderbetreuungskostenträger",
            [-1, -1, 0],
        )?,
        int_input(
            "einkommensteuer__einkünfte__aus_forst_und_landwirtschaft__betrag_y",
            [0, 0, 0],
        )?,
        int_input("einkommensteuer__einkünfte__aus_gewerbebetrieb__betrag_y", [0, 0, 0])?,
        int_input(
            "einkommensteuer__einkünfte__aus_selbstständiger_arbeit__betrag_y",
            [0, 0, 0],
        )?,
        int_input(
            "einkommensteuer__einkünfte__aus_vermietung_und_verpachtung__betrag_y",
            [0, 0, 0],
        )?,
        bool_input(
            "einkommensteuer__einkünfte__ist_hauptberuflich_selbstständig",
            [false, false, false],
        )?,
        int_input("einkommensteuer__einkünfte__sonstige__alle_weiteren_y", [0, 0, 0])?,
        bool_input("einkommensteuer__gemeinsam_veranlagt", [true, true, false])?,
        int_input("einnahmen__bruttolohn_m", [1000, 0, 0])?,
        float_input("einnahmen__kapitalerträge_y", [0.0, 0.0, 0.0])?,
        int_input("einnahmen__renten__gesetzliche_m", [0, 0, 0])?,
        int_input("einnahmen__renten__geförderte_private_vorsorge_m", [0, 0, 0])?,
        int_input("einnahmen__renten__sonstige_private_vorsorge_m", [0, 0, 0])?,
        int_input("einnahmen__renten__betriebliche_altersvorsorge_m", [0, 0, 0])?,
        int_input("elterngeld__betrag_m", [0, 0, 0])?,
        bool_input("familie__alleinerziehend", [false, false, false])?,
        int_input("familie__p_id_ehepartner", [1, 0, -1])?,
        int_input("familie__p_id_elternteil_1", [-1, -1, 0])?,
        int_input("familie__p_id_elternteil_2", [-1, -1, 1])?,
        input("geburtsjahr").derived(&[EVALUATION_DATE, "alter"], geburtsjahr)?,
        bool_input("kindergeld__in_ausbildung", [false, false, false])?,
        int_input("kindergeld__p_id_empfänger", [-1, -1, 0])?,
        bool_input(
            "sozialversicherung__arbeitslosen__arbeitssuchend",
            [false, false, false],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__mean_nettoeinkommen_in_12_monaten_vor_arbeitslosigkeit_m",
            [0, 0, 0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_beitragspflichtig_versichert_in_letzten_30_monaten",
            [0, 0, 0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_durchgängigen_bezugs_von_arbeitslosengeld",
            [0, 0, 0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_sozialversicherungspflichtiger_beschäftigung_in_letzten_5_jahren",
            [0, 0, 0],
        )?,
        bool_input(
            "sozialversicherung__kranken__beitrag__privat_versichert",
            [false, false, false],
        )?,
        bool_input(
            "sozialversicherung__pflege__beitrag__hat_kinder",
            [true, true, false],
        )?,
        bool_input("sozialversicherung__rente__bezieht_rente", [false, false, false])?,
        input("sozialversicherung__rente__jahr_renteneintritt")
            .derived(&[EVALUATION_DATE, "alter"], jahr_renteneintritt)?,
        int_input("unterhalt__tatsächlich_erhaltener_betrag_m", [0, 0, 0])?,
        int_input("unterhaltsvorschuss__betrag_m", [0, 0, 0])?,
        int_input("vermögen", [0, 0, 0])?,
        bool_input("wohnen__bewohnt_eigentum_hh", [false, false, false])?,
        int_input("wohnen__bruttokaltmiete_m_hh", [0, 0, 0])?,
        int_input("wohnen__heizkosten_m_hh", [0, 0, 0])?,
        int_input("wohnen__wohnfläche_hh", [0, 0, 0])?,
        int_input("wohngeld__mietstufe_hh", [5, 5, 5])?,
        input("wohnort_ost_hh")
            .end_date("2024-01-01")
            .constant(Column::bool([false, false, false]))?,
    ];
    elements.extend(targets(&[
        "einkommensteuer__betrag_m_sn",
        "sozialversicherung__rente__beitrag__betrag_versicherter_y",
        "sozialversicherung__kranken__beitrag__betrag_versicherter_y",
        "sozialversicherung__pflege__beitrag__betrag_versicherter_y",
        "sozialversicherung__arbeitslosen__beitrag__betrag_versicherter_y",
        "sozialversicherung__arbeitslosen__betrag_m",
        "bürgergeld__betrag_m_bg",
        "wohngeld__betrag_m_wthh",
        "kinderzuschlag__betrag_m_bg",
        "kindergeld__betrag_m",
    ])?);

    let definition = PersonaDefinition::new("couple_1_child_in_karenzzeit", elements)?
        .with_period(ActivePeriod::from_strs(Some("2023-01-01"), None)?)
        .with_not_implemented(KARENZZEIT_NOT_IMPLEMENTED);
    Ok(PersonaCollection::single(COUPLE_1_CHILD_IN_KARENZZEIT, definition))
}

// ─────────────────────────────────────────────────────────────────
// Single Adult
// ─────────────────────────────────────────────────────────────────

/// Low-income single adult. Several inputs and targets switch with the
/// Bürgergeld reform in 2023.
pub fn single_adult() -> Result<PersonaCollection> {
    let mut elements = vec![
        description(
            "description",
            "Persona to compute mean-tested transfers for low-income single adults. Income \
             from pensions, parental leave benefits, child-related transfers, and \
             subsistence benefits for the elderly are set to zero.",
        )
        .start_date("2005-01-01")
        .build()?,
        p_id([0])?,
        int_input("hh_id", [0])?,
        int_input("alter", [30])?,
        int_input("arbeitsstunden_w", [39])?,
        int_input("behinderungsgrad", [0])?,
        input("geburtsjahr").derived(&[EVALUATION_DATE, "alter"], geburtsjahr)?,
        input("wohnort_ost_hh")
            .end_date("2024-12-31")
            .constant(Column::bool([false]))?,
        int_input("einnahmen__bruttolohn_m", [2600])?,
        int_input("einnahmen__kapitalerträge_y", [0])?,
        int_input("einkommensteuer__einkünfte__sonstige__rente__betrag_m", [0])?,
        int_input(
            "sozialversicherung__kranken__beitrag__bemessungsgrundlage_rente_m",
            [0],
        )?,
        bool_input(
            "einkommensteuer__einkünfte__ist_hauptberuflich_selbstständig",
            [false],
        )?,
        int_input("einkommensteuer__einkünfte__aus_gewerbebetrieb__betrag_m", [0])?,
        int_input(
            "einkommensteuer__einkünfte__aus_vermietung_und_verpachtung__betrag_m",
            [0],
        )?,
        int_input(
            "einkommensteuer__einkünfte__aus_forst_und_landwirtschaft__betrag_m",
            [0],
        )?,
        int_input(
            "einkommensteuer__einkünfte__aus_selbstständiger_arbeit__betrag_m",
            [0],
        )?,
        int_input("einkommensteuer__einkünfte__sonstige__alle_weiteren_m", [0])?,
        int_input(
            "einkommensteuer__abzüge__beitrag_private_rentenversicherung_m",
            [0],
        )?,
        bool_input("sozialversicherung__kranken__beitrag__privat_versichert", [false])?,
        bool_input("einkommensteuer__gemeinsam_veranlagt", [false])?,
        int_input("familie__p_id_ehepartner", [-1])?,
        bool_input("sozialversicherung__pflege__beitrag__hat_kinder", [false])?,
        bool_input("familie__alleinerziehend", [false])?,
        input("arbeitslosengeld_2__p_id_einstandspartner")
            .start_date("2005-01-01")
            .end_date("2022-12-31")
            .constant(Column::int([-1]))?,
        input("bürgergeld__p_id_einstandspartner")
            .start_date("2023-01-01")
            .constant(Column::int([-1]))?,
        input("bürgergeld__bezug_im_vorjahr")
            .start_date("2023-01-01")
            .constant(Column::bool([false]))?,
        bool_input("wohnen__bewohnt_eigentum_hh", [false])?,
        int_input("wohnen__bruttokaltmiete_m_hh", [450])?,
        int_input("wohnen__heizkosten_m_hh", [50])?,
        int_input("wohnen__wohnfläche_hh", [45])?,
        input("wohnen__baujahr_immobilie_hh")
            .start_date("2005-01-01")
            .end_date("2008-12-31")
            .constant(Column::int([2000]))?,
        int_input("wohngeld__mietstufe_hh", [3])?,
        int_input("vermögen", [0])?,
        int_input("unterhalt__tatsächlich_erhaltener_betrag_m", [0])?,
        int_input("unterhaltsvorschuss__betrag_m", [0])?,
        bool_input("sozialversicherung__arbeitslosen__arbeitssuchend", [false])?,
        int_input(
            "sozialversicherung__arbeitslosen__mean_nettoeinkommen_in_12_monaten_vor_arbeitslosigkeit_m",
            [0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_beitragspflichtig_versichert_in_letzten_30_monaten",
            [0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_durchgängigen_bezugs_von_arbeitslosengeld",
            [0],
        )?,
        int_input(
            "sozialversicherung__arbeitslosen__monate_sozialversicherungspflichtiger_beschäftigung_in_letzten_5_jahren",
            [0],
        )?,
        int_input("elterngeld__betrag_m", [0])?,
        bool_input("kindergeld__in_ausbildung", [false])?,
        int_input("kindergeld__p_id_empfänger", [-1])?,
        target("arbeitslosengeld_2__betrag_y_bg")
            .start_date("2005-01-01")
            .end_date("2022-12-31")
            .build()?,
        target("bürgergeld__betrag_y_bg")
            .start_date("2023-01-01")
            .build()?,
    ];
    elements.extend(targets(&[
        "einkommensteuer__betrag_y_sn",
        "sozialversicherung__pflege__beitrag__betrag_versicherter_y",
        "sozialversicherung__kranken__beitrag__betrag_versicherter_y",
        "sozialversicherung__rente__beitrag__betrag_versicherter_y",
        "sozialversicherung__arbeitslosen__beitrag__betrag_versicherter_y",
        "sozialversicherung__arbeitslosen__betrag_y",
        "wohngeld__betrag_y_wthh",
    ])?);

    let definition = PersonaDefinition::new("single_adult", elements)?
        .with_period(ActivePeriod::from_strs(Some("2005-01-01"), None)?)
        .with_not_implemented(NOT_IMPLEMENTED);
    Ok(PersonaCollection::single(SINGLE_ADULT, definition))
}
