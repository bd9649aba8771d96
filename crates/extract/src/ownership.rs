use gridcarve_model::ReferenceGraph;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Result of ownership labeling.
pub struct OwnershipOutcome {
    /// Ids of elements to extract, deduplicated.
    pub extraction: BTreeSet<String>,
    /// Per-element origin sets: which seeds can reach each element. Kept for
    /// boundary diagnostics; an origin set larger than one marks a
    /// shared-boundary element.
    pub origins: HashMap<String, BTreeSet<String>>,
}

impl OwnershipOutcome {
    /// Extracted elements reachable from more than one seed.
    pub fn boundary_count(&self) -> usize {
        self.extraction
            .iter()
            .filter(|id| self.origins.get(*id).is_some_and(|s| s.len() > 1))
            .count()
    }
}

/// Labeling strategy seam: classifies every element against the seed set and
/// selects the ids belonging to the target owners.
///
/// The production implementation is [`BoundaryBfs`]; a full-reachability
/// labeling can be swapped in without touching callers.
pub trait OwnershipClassifier {
    fn classify(
        &self,
        graph: &ReferenceGraph,
        seeds: &BTreeSet<String>,
        targets: &BTreeSet<String>,
    ) -> OwnershipOutcome;
}

/// Multi-source BFS with the stop-propagating-once-shared rule.
///
/// Every seed floods its own origin label outward over undirected adjacency
/// (forward references plus reverse referencers). An element reachable from
/// two or more origins is frozen as boundary: it keeps the labels it has but
/// propagates none of them further, so boundary regions never grow beyond
/// elements adjacent to the shared frontier. This is a deliberate
/// approximation, not full multi-source reachability labeling.
pub struct BoundaryBfs;

impl OwnershipClassifier for BoundaryBfs {
    fn classify(
        &self,
        graph: &ReferenceGraph,
        seeds: &BTreeSet<String>,
        targets: &BTreeSet<String>,
    ) -> OwnershipOutcome {
        let mut origins: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut queue: VecDeque<(String, String)> = VecDeque::new();

        // Every seed owns itself.
        for seed in seeds {
            origins.entry(seed.clone()).or_default().insert(seed.clone());
            queue.push_back((seed.clone(), seed.clone()));
        }

        while let Some((node, origin)) = queue.pop_front() {
            // Propagation only continues from elements currently single-owned;
            // a node that became boundary after being enqueued is frozen.
            if origins.get(&node).is_some_and(|s| s.len() > 1) {
                continue;
            }
            if graph.get(&node).is_none() {
                // Dangling target: labeled, but contributes no further edges.
                continue;
            }
            for neighbor in graph.neighbors(&node) {
                let set = origins.entry(neighbor.clone()).or_default();
                if set.contains(&origin) {
                    continue;
                }
                set.insert(origin.clone());
                if set.len() == 1 {
                    queue.push_back((neighbor, origin.clone()));
                }
            }
        }

        let mut extraction = BTreeSet::new();
        for (id, origin_set) in &origins {
            let selected = if origin_set.len() == 1 {
                // Exclusive region: in iff its sole owner is a target.
                origin_set.iter().all(|o| targets.contains(o))
            } else {
                // Boundary: in iff it touches any target owner.
                !origin_set.is_disjoint(targets)
            };
            if selected && graph.contains(id) {
                extraction.insert(id.clone());
            }
        }

        log::info!(
            "Ownership labeling: {} elements labeled, {} extracted for {} target seeds",
            origins.len(),
            extraction.len(),
            targets.len()
        );

        OwnershipOutcome {
            extraction,
            origins,
        }
    }
}
