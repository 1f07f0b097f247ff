//! Relationship resolvers.
//!
//! Every resolver takes the request's [`ResolutionPass`](crate::engine::ResolutionPass),
//! checks for cancellation between steps and returns empty collections when there is
//! nothing to find. Collections are deduplicated and keep first-seen order.

pub mod blocks;
pub mod controllers;
pub mod includes;
pub mod overwrites;

pub use blocks::{find_block_implementations, find_block_overrides, find_child_templates};
pub use controllers::{SymfonyControllerConvention, find_controller_usages};
pub use includes::{
    IncludeTarget, find_included_targets, find_including_templates, has_including_templates,
    materialize_include_targets,
};
pub use overwrites::find_overwrite_siblings;
