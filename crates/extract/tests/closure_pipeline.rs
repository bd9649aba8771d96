//! The category-gated closure pipeline against a synthetic substation model.

use gridcarve_extract::{closure, ClosureConfig, ClosureStep};
use gridcarve_model::{Element, Property, ReferenceGraph};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn element(kind: &str, id: Option<&str>, name: Option<&str>, refs: &[(&str, &str)]) -> Element {
    let mut el = Element::new(format!("cim:{kind}"), id.map(str::to_string));
    if let Some(name) = name {
        let mut p = Property::new("cim:IdentifiedObject.name");
        p.text = Some(name.to_string());
        el.properties.push(p);
    }
    for (relation, target) in refs {
        let mut p = Property::new(format!("cim:{relation}"));
        p.attrs
            .push(("rdf:resource".to_string(), format!("#{target}")));
        el.properties.push(p);
    }
    el
}

fn sample_model() -> ReferenceGraph {
    ReferenceGraph::from_elements(vec![
        element(
            "Substation",
            Some("_S1"),
            Some("ALVIN"),
            &[
                ("Substation.Region", "_RGN"),
                ("Substation.Operatorship", "_OWN"),
            ],
        ),
        element("Region", Some("_RGN"), Some("COAST"), &[]),
        element("Operatorship", Some("_OWN"), None, &[]),
        element(
            "VoltageLevel",
            Some("_VL1"),
            None,
            &[("VoltageLevel.MemberOf_Substation", "_S1")],
        ),
        element(
            "ACLineSegment",
            Some("_ACL1"),
            None,
            &[("ACLineSegment.Operatorship", "_OWN")],
        ),
        element(
            "Breaker",
            Some("_BRK1"),
            None,
            &[("Equipment.MemberOf_EquipmentContainer", "_VL1")],
        ),
        element(
            "Terminal",
            Some("_T1"),
            None,
            &[("Terminal.ConductingEquipment", "_ACL1")],
        ),
        element(
            "Terminal",
            Some("_T2"),
            None,
            &[("Terminal.ConductingEquipment", "_BRK1")],
        ),
        element(
            "Disconnector",
            Some("_D1"),
            None,
            &[("Switch.Terminal", "_T1")],
        ),
        // Unrelated substation and its equipment.
        element("Substation", Some("_S9"), Some("FAR"), &[]),
        element(
            "VoltageLevel",
            Some("_VL9"),
            None,
            &[("VoltageLevel.MemberOf_Substation", "_S9")],
        ),
    ])
}

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn ids(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn default_pipeline_collects_all_categories() {
    let graph = sample_model();
    let outcome = closure(&graph, &names(&["ALVIN"]), &ClosureConfig::default());

    assert_eq!(
        outcome.extraction,
        ids(&["_S1", "_OWN", "_VL1", "_ACL1", "_BRK1", "_T1", "_T2", "_D1"])
    );
    assert!(outcome.missing_names.is_empty());
    assert_eq!(outcome.seeds_matched, 1);

    // One count per step, seed resolution first.
    let steps: Vec<&str> = outcome
        .step_counts
        .iter()
        .map(|(s, _)| s.as_str())
        .collect();
    assert_eq!(
        steps,
        vec![
            "Substation",
            "voltage_levels",
            "line_segments",
            "equipment",
            "terminals",
            "disconnectors"
        ]
    );
}

#[test]
fn excluded_relation_keeps_the_region_out() {
    let graph = sample_model();
    let outcome = closure(&graph, &names(&["ALVIN"]), &ClosureConfig::default());
    assert!(!outcome.extraction.contains("_RGN"));

    // Dropping the exclusion pulls the region in through the seed refs.
    let mut config = ClosureConfig::default();
    config.excluded_relations.clear();
    let outcome = closure(&graph, &names(&["ALVIN"]), &config);
    assert!(outcome.extraction.contains("_RGN"));
}

#[test]
fn unmatched_names_are_reported_and_skipped() {
    let graph = sample_model();
    let outcome = closure(
        &graph,
        &names(&["ALVIN", "NOWHERE"]),
        &ClosureConfig::default(),
    );

    assert_eq!(outcome.missing_names, names(&["NOWHERE"]));
    assert_eq!(outcome.seeds_matched, 1);
    assert!(outcome.extraction.contains("_S1"));
}

#[test]
fn result_is_monotonic_in_the_allow_list() {
    let graph = sample_model();
    let small = closure(&graph, &names(&["ALVIN"]), &ClosureConfig::default());
    let large = closure(
        &graph,
        &names(&["ALVIN", "FAR"]),
        &ClosureConfig::default(),
    );

    assert!(small.extraction.is_subset(&large.extraction));
    assert!(large.extraction.contains("_S9"));
    assert!(large.extraction.contains("_VL9"));
}

#[test]
fn anonymous_elements_are_captured_by_categorical_scan() {
    let mut elements = vec![
        element("Substation", Some("_S1"), Some("ALVIN"), &[]),
        element(
            "Terminal",
            None,
            None,
            &[("Terminal.ConductingEquipment", "_S1")],
        ),
    ];
    let anon_position = elements.len() - 1;
    elements.push(element("Terminal", Some("_T1"), None, &[]));
    let graph = ReferenceGraph::from_elements(elements);

    let outcome = closure(&graph, &names(&["ALVIN"]), &ClosureConfig::default());
    assert!(outcome.anonymous.contains(&anon_position));
    // The unreferenced identified terminal is not selected.
    assert!(!outcome.extraction.contains("_T1"));
}

#[test]
fn custom_step_tables_run_independently() {
    let graph = sample_model();
    let config = ClosureConfig {
        seed_kind: "Substation".to_string(),
        excluded_relations: BTreeSet::new(),
        steps: vec![ClosureStep {
            kind: Some("VoltageLevel".to_string()),
            join_with: vec!["seeds".to_string()],
            adopt_from: vec![],
            output: "voltage_levels".to_string(),
        }],
    };

    let outcome = closure(&graph, &names(&["ALVIN"]), &config);
    assert_eq!(outcome.extraction, ids(&["_S1", "_VL1"]));
}

#[test]
fn steps_never_join_against_their_own_output() {
    // Two disconnectors chained off one terminal: selecting the first must
    // not cascade into the second, which only references the first step's
    // own output.
    let graph = ReferenceGraph::from_elements(vec![
        element("Substation", Some("_S1"), Some("ALVIN"), &[]),
        element(
            "Terminal",
            Some("_T1"),
            None,
            &[("Terminal.ConductingEquipment", "_S1")],
        ),
        element(
            "Disconnector",
            Some("_D1"),
            None,
            &[("Switch.Terminal", "_T1")],
        ),
        element(
            "Disconnector",
            Some("_D2"),
            None,
            &[("Switch.Parent", "_D1")],
        ),
    ]);

    let outcome = closure(&graph, &names(&["ALVIN"]), &ClosureConfig::default());
    assert!(outcome.extraction.contains("_D1"));
    assert!(!outcome.extraction.contains("_D2"));
}
