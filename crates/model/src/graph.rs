use crate::element::Element;
use std::collections::{BTreeSet, HashMap};

/// The full element set plus derived forward/reverse reference indices.
///
/// Invariant: the two indices are exact transposes of each other; both are
/// rebuilt together from the raw element data and never mutated afterwards.
pub struct ReferenceGraph {
    elements: Vec<Element>,
    by_id: HashMap<String, usize>,
    forward: HashMap<String, BTreeSet<String>>,
    reverse: HashMap<String, BTreeSet<String>>,
}

impl ReferenceGraph {
    /// Index a parsed element sequence.
    ///
    /// Elements without an identifier stay in the sequence but are excluded
    /// from the id map and from both indices: they cannot be referenced, so
    /// they never contribute graph edges.
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut by_id = HashMap::new();
        let mut forward: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut reverse: HashMap<String, BTreeSet<String>> = HashMap::new();

        for (idx, element) in elements.iter().enumerate() {
            let Some(id) = element.id.as_deref() else {
                continue;
            };
            by_id.insert(id.to_string(), idx);
            for target in element.references() {
                forward
                    .entry(id.to_string())
                    .or_default()
                    .insert(target.to_string());
                reverse
                    .entry(target.to_string())
                    .or_default()
                    .insert(id.to_string());
            }
        }

        log::info!(
            "Indexed reference graph: {} elements ({} identified), {} referencing",
            elements.len(),
            by_id.len(),
            forward.len()
        );

        Self {
            elements,
            by_id,
            forward,
            reverse,
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn identified_count(&self) -> usize {
        self.by_id.len()
    }

    /// Element sequence in document order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.by_id.get(id).map(|&idx| &self.elements[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Ids of all identified elements.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    /// Outgoing reference targets of `id`.
    pub fn forward_refs(&self, id: &str) -> impl Iterator<Item = &str> {
        self.forward
            .get(id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Ids of elements that reference `id`.
    pub fn referencing(&self, id: &str) -> impl Iterator<Item = &str> {
        self.reverse
            .get(id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Undirected adjacency: forward targets plus reverse referencers.
    ///
    /// A boundary element with many incoming references is reachable from any
    /// of its referencers, so traversals treat edges as undirected.
    pub fn neighbors(&self, id: &str) -> BTreeSet<String> {
        let mut out: BTreeSet<String> =
            self.forward_refs(id).map(str::to_string).collect();
        out.extend(self.referencing(id).map(str::to_string));
        out
    }

    /// Verify that the forward and reverse indices are exact transposes.
    pub fn is_transpose_consistent(&self) -> bool {
        let forward_pairs: BTreeSet<(&str, &str)> = self
            .forward
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from.as_str(), to.as_str())))
            .collect();
        let reverse_pairs: BTreeSet<(&str, &str)> = self
            .reverse
            .iter()
            .flat_map(|(to, froms)| froms.iter().map(move |from| (from.as_str(), to.as_str())))
            .collect();
        forward_pairs == reverse_pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Property;
    use pretty_assertions::assert_eq;

    fn element(kind: &str, id: Option<&str>, refs: &[&str]) -> Element {
        let mut el = Element::new(format!("cim:{kind}"), id.map(str::to_string));
        for target in refs {
            let mut p = Property::new("cim:ref");
            p.attrs
                .push(("rdf:resource".to_string(), format!("#{target}")));
            el.properties.push(p);
        }
        el
    }

    #[test]
    fn builds_transposed_indices() {
        let graph = ReferenceGraph::from_elements(vec![
            element("Substation", Some("A"), &["B"]),
            element("VoltageLevel", Some("B"), &["C"]),
            element("Terminal", Some("C"), &[]),
        ]);

        assert!(graph.is_transpose_consistent());
        assert_eq!(graph.ids().count(), 3);
        assert_eq!(graph.forward_refs("A").collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(graph.referencing("B").collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(graph.referencing("C").collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn unidentified_elements_stay_out_of_the_index() {
        let graph = ReferenceGraph::from_elements(vec![
            element("Substation", Some("A"), &[]),
            element("Terminal", None, &["A"]),
        ]);

        assert_eq!(graph.element_count(), 2);
        assert_eq!(graph.identified_count(), 1);
        // The anonymous terminal contributes no edge.
        assert_eq!(graph.referencing("A").count(), 0);
    }

    #[test]
    fn neighbors_union_forward_and_reverse() {
        let graph = ReferenceGraph::from_elements(vec![
            element("Substation", Some("A"), &["B"]),
            element("VoltageLevel", Some("B"), &[]),
            element("Terminal", Some("C"), &["A"]),
        ]);

        let neighbors: Vec<String> = graph.neighbors("A").into_iter().collect();
        assert_eq!(neighbors, vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn dangling_targets_appear_only_in_reverse_index() {
        let graph =
            ReferenceGraph::from_elements(vec![element("Substation", Some("A"), &["GHOST"])]);

        assert!(graph.is_transpose_consistent());
        assert!(!graph.contains("GHOST"));
        assert_eq!(graph.referencing("GHOST").collect::<Vec<_>>(), vec!["A"]);
    }
}
