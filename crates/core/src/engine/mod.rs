//! Relationship engine for Twig templates
//!
//! The engine answers "who includes me", "who overwrites me", "where is this block
//! implemented" and "which controller renders me" for one template document at a time:
//!
//! - **Injected collaborators**: indexes and scanners are handed in once, at construction
//! - **Pass-scoped state**: every request owns a `ResolutionPass`; its namespace snapshot
//!   dies with it, and a batch shares one snapshot across its passes
//! - **Lazy fields**: each relationship of a document is computed on first access
//! - **Batch mode**: many documents resolve in parallel on a dedicated worker pool

pub mod collaborators;
pub mod document;
pub mod engine;
pub mod pass;

pub use collaborators::Collaborators;
pub use document::{BlockRelations, DocumentRelationships, RelationshipReport};
pub use engine::RelationshipEngine;
pub use pass::ResolutionPass;
