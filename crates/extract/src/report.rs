use crate::closure::ClosureOutcome;
use crate::ownership::OwnershipOutcome;
use crate::repair::RepairOutcome;
use serde::Serialize;
use std::collections::BTreeSet;

/// Unresolved-id listings are capped so a badly broken input cannot flood the
/// report; the full set stays available on the outcome.
pub const UNRESOLVED_LIST_CAP: usize = 20;

/// First `UNRESOLVED_LIST_CAP` ids plus the count of those omitted.
pub fn capped_listing(ids: &BTreeSet<String>) -> (Vec<String>, usize) {
    let listed: Vec<String> = ids.iter().take(UNRESOLVED_LIST_CAP).cloned().collect();
    (listed, ids.len().saturating_sub(UNRESOLVED_LIST_CAP))
}

/// Run summary for the ownership-labeling pipeline.
#[derive(Debug, Serialize)]
pub struct CarveReport {
    pub allow_list_names: usize,
    pub seeds_total: usize,
    pub targets_matched: usize,
    pub missing_names: Vec<String>,
    pub extracted: usize,
    pub boundary: usize,
}

impl CarveReport {
    pub fn new(
        allow_list_names: usize,
        seeds_total: usize,
        targets_matched: usize,
        missing_names: &BTreeSet<String>,
        outcome: &OwnershipOutcome,
    ) -> Self {
        Self {
            allow_list_names,
            seeds_total,
            targets_matched,
            missing_names: missing_names.iter().cloned().collect(),
            extracted: outcome.extraction.len(),
            boundary: outcome.boundary_count(),
        }
    }
}

/// Run summary for the incremental-closure pipeline.
#[derive(Debug, Serialize)]
pub struct ClosureReport {
    pub allow_list_names: usize,
    pub seeds_matched: usize,
    pub missing_names: Vec<String>,
    pub steps: Vec<StepCount>,
    pub extracted: usize,
}

#[derive(Debug, Serialize)]
pub struct StepCount {
    pub step: String,
    pub matched: usize,
}

impl ClosureReport {
    pub fn new(allow_list_names: usize, outcome: &ClosureOutcome) -> Self {
        Self {
            allow_list_names,
            seeds_matched: outcome.seeds_matched,
            missing_names: outcome.missing_names.iter().cloned().collect(),
            steps: outcome
                .step_counts
                .iter()
                .map(|(step, matched)| StepCount {
                    step: step.clone(),
                    matched: *matched,
                })
                .collect(),
            extracted: outcome.extraction.len() + outcome.anonymous.len(),
        }
    }
}

/// Run summary for the repair pipeline.
#[derive(Debug, Serialize)]
pub struct RepairReport {
    pub existing: usize,
    pub referenced: usize,
    pub direct_missing: usize,
    pub injected: usize,
    pub unresolved: usize,
    /// Capped listing so a human can patch the source model in a follow-up.
    pub unresolved_sample: Vec<String>,
    pub unresolved_omitted: usize,
    pub level_counts: Vec<usize>,
    pub direct_never_injected: usize,
}

impl RepairReport {
    pub fn new(outcome: &RepairOutcome) -> Self {
        let (unresolved_sample, unresolved_omitted) = capped_listing(&outcome.unresolved);
        Self {
            existing: outcome.existing,
            referenced: outcome.referenced,
            direct_missing: outcome.direct_missing,
            injected: outcome.injected.len(),
            unresolved: outcome.unresolved.len(),
            unresolved_sample,
            unresolved_omitted,
            level_counts: outcome.level_counts.clone(),
            direct_never_injected: outcome.direct_never_injected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capped_listing_truncates_past_the_cap() {
        let ids: BTreeSet<String> = (0..25).map(|i| format!("_ID{i:02}")).collect();
        let (listed, omitted) = capped_listing(&ids);
        assert_eq!(listed.len(), UNRESOLVED_LIST_CAP);
        assert_eq!(omitted, 5);
        assert_eq!(listed[0], "_ID00");
    }

    #[test]
    fn capped_listing_small_set_is_complete() {
        let ids: BTreeSet<String> = ["_A".to_string(), "_B".to_string()].into();
        let (listed, omitted) = capped_listing(&ids);
        assert_eq!(listed, vec!["_A".to_string(), "_B".to_string()]);
        assert_eq!(omitted, 0);
    }
}
