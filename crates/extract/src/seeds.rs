use gridcarve_model::ReferenceGraph;
use std::collections::{BTreeMap, BTreeSet};

/// Name → id lookup over the identified elements of one category.
pub struct SeedIndex {
    kind: String,
    by_name: BTreeMap<String, String>,
}

impl SeedIndex {
    /// Index every identified, named element of `kind`.
    pub fn build(graph: &ReferenceGraph, kind: &str) -> Self {
        let mut by_name = BTreeMap::new();
        for element in graph.elements() {
            if element.kind() != kind {
                continue;
            }
            if let (Some(id), Some(name)) = (element.id.as_deref(), element.name()) {
                by_name.insert(name.to_string(), id.to_string());
            }
        }
        log::info!("Found {} named {kind} elements in the model", by_name.len());
        Self {
            kind: kind.to_string(),
            by_name,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Ids of every indexed element.
    pub fn all_ids(&self) -> BTreeSet<String> {
        self.by_name.values().cloned().collect()
    }

    /// Resolve allow-listed names to element ids.
    ///
    /// Returns the matched ids and the names with no corresponding element;
    /// the latter are a warning, the run continues with the remaining seeds.
    pub fn match_names(&self, names: &BTreeSet<String>) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut matched = BTreeSet::new();
        let mut missing = BTreeSet::new();
        for name in names {
            match self.by_name.get(name) {
                Some(id) => {
                    matched.insert(id.clone());
                }
                None => {
                    missing.insert(name.clone());
                }
            }
        }
        if !missing.is_empty() {
            log::warn!(
                "{} of {} allow-listed {} names not found in the model",
                missing.len(),
                names.len(),
                self.kind
            );
        }
        (matched, missing)
    }
}
