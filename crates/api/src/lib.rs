pub mod error;
pub mod index;
pub mod models;

// Re-export commonly used types
pub use error::{IndexError, IndexResult};
pub use index::{
    BlockHierarchy, ContentScanner, ControllerIndex, ControllerNamingConvention, TemplateIndex,
};
pub use models::*;
