//! # Gridcarve Extract
//!
//! The three extraction pipelines that carve a reference-consistent submodel
//! out of a full grid model:
//!
//! - **Ownership labeling** ([`ownership`]) — multi-source BFS that stamps
//!   every element with the seeds that can reach it and classifies exclusive
//!   vs. shared-boundary elements against a target-owner set.
//! - **Incremental closure** ([`closure`]) — ordered category-gated joins
//!   (substations → voltage levels → line segments → equipment → terminals →
//!   disconnectors) driven by a declarative step table.
//! - **Reference repair** ([`repair`]) — leveled BFS that injects elements a
//!   reduced file references but does not contain, pulling them transitively
//!   from the full model.
//!
//! All pipelines run on the read-only [`gridcarve_model::ReferenceGraph`];
//! data-completeness problems (unmatched names, unresolved references) are
//! accumulated on the outcome structs and reported, never fatal.

mod closure;
mod ownership;
mod repair;
mod report;
mod seeds;

pub use closure::{closure, ClosureConfig, ClosureOutcome, ClosureStep, SEEDS, SEED_REFS};
pub use ownership::{BoundaryBfs, OwnershipClassifier, OwnershipOutcome};
pub use repair::{repair, RepairOutcome};
pub use report::{
    capped_listing, CarveReport, ClosureReport, RepairReport, StepCount, UNRESOLVED_LIST_CAP,
};
pub use seeds::SeedIndex;
