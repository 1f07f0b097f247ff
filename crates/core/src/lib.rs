pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod logging;
pub mod namespace;
pub mod presentation;
pub mod resolver;

pub use config::ResolverConfig;
pub use engine::{
    Collaborators, DocumentRelationships, RelationshipEngine, RelationshipReport, ResolutionPass,
};
pub use error::{ResolveError, Result, TwigscopeError};
