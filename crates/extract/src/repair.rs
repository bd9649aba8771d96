use gridcarve_model::{Element, ReferenceGraph};
use std::collections::{BTreeSet, VecDeque};

/// Result of repairing a reduced model against the full source model.
pub struct RepairOutcome {
    /// The partial graph plus every injected element, re-indexed.
    pub repaired: ReferenceGraph,
    /// Ids copied in from the full model.
    pub injected: BTreeSet<String>,
    /// Referenced ids found nowhere in the full model. Terminal: recorded and
    /// reported, never fatal.
    pub unresolved: BTreeSet<String>,
    /// Elements injected per BFS level, for diagnostics.
    pub level_counts: Vec<usize>,
    /// Distinct ids the partial graph referenced.
    pub referenced: usize,
    /// Ids the partial graph already defined, nested definitions included.
    pub existing: usize,
    /// Ids directly missing from the partial graph before repair.
    pub direct_missing: usize,
    /// Directly-missing ids that never got injected.
    pub direct_never_injected: usize,
}

/// Inject every transitively-referenced element the partial graph is missing.
///
/// Level-by-level BFS: each level processes exactly the ids queued when the
/// level began; ids discovered while injecting join the next level. The
/// leveling only serves per-level reporting — a plain work queue computes the
/// same closure. Every missing id terminates in exactly one of existing,
/// injected, or unresolved.
pub fn repair(partial: &ReferenceGraph, full: &ReferenceGraph) -> RepairOutcome {
    // An id defined at any depth satisfies a reference, so nested
    // definitions must not be re-injected.
    let mut existing: BTreeSet<String> = BTreeSet::new();
    for element in partial.elements() {
        existing.extend(element.defined_ids().iter().map(|s| s.to_string()));
    }
    let existing_at_start = existing.len();

    // References are collected from the raw element sequence, not the forward
    // index, so anonymous elements contribute too.
    let mut referenced: BTreeSet<String> = BTreeSet::new();
    for element in partial.elements() {
        referenced.extend(element.references().iter().map(|t| t.to_string()));
    }

    let direct_missing: BTreeSet<String> =
        referenced.difference(&existing).cloned().collect();
    let mut queue: VecDeque<String> = direct_missing.iter().cloned().collect();

    log::info!(
        "Repair start: {existing_at_start} defined, {} referenced, {} directly missing",
        referenced.len(),
        direct_missing.len()
    );

    let mut injected: BTreeSet<String> = BTreeSet::new();
    let mut unresolved: BTreeSet<String> = BTreeSet::new();
    let mut injected_elements: Vec<Element> = Vec::new();
    let mut level_counts = Vec::new();

    while !queue.is_empty() {
        let level_size = queue.len();
        let mut level_injected = 0;

        for _ in 0..level_size {
            let Some(id) = queue.pop_front() else { break };
            if existing.contains(&id) || injected.contains(&id) || unresolved.contains(&id) {
                continue;
            }
            let Some(source) = full.get(&id) else {
                unresolved.insert(id);
                continue;
            };
            let copy = source.clone();
            for target in copy.references() {
                if !existing.contains(target)
                    && !injected.contains(target)
                    && !unresolved.contains(target)
                {
                    queue.push_back(target.to_string());
                }
            }
            injected_elements.push(copy);
            injected.insert(id.clone());
            existing.insert(id);
            level_injected += 1;
        }

        log::info!(
            "Repair level {}: {level_size} ids queued, {level_injected} injected",
            level_counts.len()
        );
        level_counts.push(level_injected);
    }

    if !unresolved.is_empty() {
        log::warn!(
            "{} referenced ids not found anywhere in the source model",
            unresolved.len()
        );
    }

    let direct_never_injected = direct_missing
        .iter()
        .filter(|id| !injected.contains(*id))
        .count();

    let mut elements = partial.elements().to_vec();
    elements.extend(injected_elements);

    RepairOutcome {
        repaired: ReferenceGraph::from_elements(elements),
        injected,
        unresolved,
        level_counts,
        referenced: referenced.len(),
        existing: existing_at_start,
        direct_missing: direct_missing.len(),
        direct_never_injected,
    }
}
