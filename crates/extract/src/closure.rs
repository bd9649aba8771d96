//! Category-gated incremental closure.
//!
//! Unlike ownership labeling this is not a generic graph walk: the source
//! schema has known category-specific containment semantics, and each step
//! only looks one hop from the ids accumulated by prior steps. The step table
//! is evaluated once, in order; a category whose elements reference a
//! category processed later is not revisited. That ordering is assumed
//! acyclic for the CIM categories the default table covers — configurations
//! that reorder or extend the table own that assumption.

use crate::seeds::SeedIndex;
use gridcarve_model::ReferenceGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Register names the engine seeds before any step runs.
pub const SEEDS: &str = "seeds";
pub const SEED_REFS: &str = "seed_refs";

/// One declarative join step.
///
/// A step scans the element sequence, keeps elements passing the category
/// filter, and selects those whose own id sits in any `adopt_from` register
/// or whose references land in any `join_with` register. Selected ids are
/// committed to the `output` register after the scan, so a step never joins
/// against its own output.
#[derive(Debug, Clone)]
pub struct ClosureStep {
    /// Element category to scan; `None` scans every category.
    pub kind: Option<String>,
    /// Registers whose union the element's references are matched against.
    pub join_with: Vec<String>,
    /// Registers whose union the element's own id is matched against.
    pub adopt_from: Vec<String>,
    /// Register receiving the ids selected by this step; doubles as the
    /// step's label in reports.
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct ClosureConfig {
    /// Category resolved against the allow-list names.
    pub seed_kind: String,
    /// Relations (namespace-stripped property tags) excluded when collecting
    /// the seeds' direct references, e.g. a substation's link to its region.
    pub excluded_relations: BTreeSet<String>,
    pub steps: Vec<ClosureStep>,
}

impl Default for ClosureConfig {
    fn default() -> Self {
        let step = |kind: Option<&str>, join: &[&str], adopt: &[&str], output: &str| ClosureStep {
            kind: kind.map(str::to_string),
            join_with: join.iter().map(|s| s.to_string()).collect(),
            adopt_from: adopt.iter().map(|s| s.to_string()).collect(),
            output: output.to_string(),
        };
        Self {
            seed_kind: "Substation".to_string(),
            excluded_relations: ["Substation.Region".to_string()].into(),
            steps: vec![
                step(
                    Some("VoltageLevel"),
                    &[SEEDS, SEED_REFS],
                    &[],
                    "voltage_levels",
                ),
                step(
                    Some("ACLineSegment"),
                    &[SEEDS, SEED_REFS],
                    &[],
                    "line_segments",
                ),
                step(None, &[SEEDS, "voltage_levels"], &[SEED_REFS], "equipment"),
                step(
                    Some("Terminal"),
                    &[SEEDS, "line_segments", "equipment"],
                    &[],
                    "terminals",
                ),
                step(Some("Disconnector"), &["terminals"], &[], "disconnectors"),
            ],
        }
    }
}

/// Result of the closure pipeline.
pub struct ClosureOutcome {
    /// Ids of elements to extract, deduplicated.
    pub extraction: BTreeSet<String>,
    /// Positions of unidentified elements captured by a categorical scan.
    /// They carry no id, so they can be emitted but never joined against.
    pub anonymous: BTreeSet<usize>,
    /// Allow-listed names with no matching seed element.
    pub missing_names: BTreeSet<String>,
    pub seeds_matched: usize,
    /// Elements matched per step, in pipeline order (seed resolution first).
    pub step_counts: Vec<(String, usize)>,
}

/// Run the closure pipeline for the allow-listed seed names.
pub fn closure(
    graph: &ReferenceGraph,
    names: &BTreeSet<String>,
    config: &ClosureConfig,
) -> ClosureOutcome {
    let index = SeedIndex::build(graph, &config.seed_kind);
    let (seed_ids, missing_names) = index.match_names(names);

    // Direct references of the matched seeds, minus excluded relations.
    let mut seed_refs: BTreeSet<String> = BTreeSet::new();
    for id in &seed_ids {
        let Some(element) = graph.get(id) else { continue };
        for property in &element.properties {
            if config.excluded_relations.contains(property.local_tag()) {
                continue;
            }
            if let Some(target) = property.reference() {
                seed_refs.insert(target.to_string());
            }
        }
    }

    let mut extraction = seed_ids.clone();
    let mut anonymous = BTreeSet::new();
    let seeds_matched = seed_ids.len();
    let mut step_counts = vec![(config.seed_kind.clone(), seeds_matched)];

    let mut registers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    registers.insert(SEEDS.to_string(), seed_ids);
    registers.insert(SEED_REFS.to_string(), seed_refs);

    for step in &config.steps {
        let join = register_union(&registers, &step.join_with);
        let adopt = register_union(&registers, &step.adopt_from);

        let mut matched = 0;
        let mut selected_ids = Vec::new();
        for (position, element) in graph.elements().iter().enumerate() {
            if let Some(kind) = &step.kind {
                if element.kind() != kind {
                    continue;
                }
            }
            let adopted = element
                .id
                .as_deref()
                .is_some_and(|id| adopt.contains(id));
            let joined =
                adopted || element.references().iter().any(|t| join.contains(*t));
            if !joined {
                continue;
            }
            matched += 1;
            match &element.id {
                Some(id) => selected_ids.push(id.clone()),
                None => {
                    anonymous.insert(position);
                }
            }
        }

        log::info!(
            "Closure step {:?}: {} elements matched",
            step.output,
            matched
        );
        let output = registers.entry(step.output.clone()).or_default();
        for id in selected_ids {
            extraction.insert(id.clone());
            output.insert(id);
        }
        step_counts.push((step.output.clone(), matched));
    }

    ClosureOutcome {
        extraction,
        anonymous,
        missing_names,
        seeds_matched,
        step_counts,
    }
}

fn register_union(
    registers: &BTreeMap<String, BTreeSet<String>>,
    names: &[String],
) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for name in names {
        if let Some(set) = registers.get(name) {
            out.extend(set.iter().cloned());
        }
    }
    out
}
