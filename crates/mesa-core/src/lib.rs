//! # mesa-core: Attribution Enforcement for Discourse Graphs
//!
//! MESA (Machine-Enforceable Schema for Attribution) guarantees that content
//! under a Creative-Commons-family license never leaves the graph without
//! its attribution: license name, source link, and creator.
//!
//! ## Components
//!
//! - [`NodeStore`]: read-only, document-ordered node storage built once
//!   from a `{"@graph": [...]}` document.
//! - [`policy`]: the single definition of "requires attribution" and
//!   "has complete attribution". Nothing else repeats the license check.
//! - [`EnforcedAccessor`]: the choke point. Every read path goes through
//!   [`AttributedNode::new`], which either builds a view carrying a complete
//!   [`AttributionBundle`] or refuses with an [`EnforcementError`].
//! - [`ReferenceBuilder`]: reference creation; CC sources require the
//!   caller to echo attribution and get a bundle copied from the source.
//! - [`presenter`]: HTML/Markdown rendering, JSON export, citations. Works
//!   only on `AttributedNode`s.
//! - [`api`]: `{success, data | error}` envelopes for thin callers.
//!
//! ## Crate Policy
//!
//! - The store is never mutated after construction; every derived value is
//!   built fresh per call.
//! - Enforcement refusals are values, not panics.
//! - No `unsafe` code. No `.unwrap()` outside tests.

pub mod accessor;
pub mod api;
pub mod error;
pub mod identity;
pub mod node;
pub mod policy;
pub mod presenter;
pub mod reference;
pub mod store;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use accessor::{AttributedNode, EnforcedAccessor, NodeWithDependencies};
pub use api::{ApiResponse, DiscourseGraphApi};
pub use error::{AttributionField, EnforcementError, GraphLoadError, MesaError, MissingFields};
pub use identity::{NodeId, EVIDENCE_TYPE, SOURCE_TYPE};
pub use node::Node;
pub use policy::{AttributionBundle, ValidationReport};
pub use presenter::{export_citation, export_json, render_html, render_markdown, CitationStyle};
pub use reference::{Reference, ReferenceBuilder};
pub use store::NodeStore;
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
