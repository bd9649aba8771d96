//! # Gridcarve Model
//!
//! In-memory representation of a flat CIM/RDF grid model and the reference
//! graph derived from it.
//!
//! ## Architecture
//!
//! ```text
//! RDF/XML document
//!     │
//!     ├──> Element[] (one per top-level node, payload kept verbatim)
//!     │      ├─ rdf:ID (optional; unidentified elements stay in sequence)
//!     │      └─ Property children (attributes, text, #-fragment references)
//!     │
//!     └──> ReferenceGraph
//!            ├─ id → element map
//!            ├─ forward index: id → referenced ids
//!            └─ reverse index: id → referencing ids (exact transpose)
//! ```
//!
//! The graph is read-only after construction; every extraction pipeline in
//! `gridcarve-extract` runs on top of these two indices.

mod element;
mod graph;

pub use element::{Element, Property};
pub use graph::ReferenceGraph;
