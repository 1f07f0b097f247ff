use crate::error::TwigscopeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// How many `extends`/`include` levels below a template are searched for block implementations.
    pub max_child_depth: usize,
    /// Worker threads for batch resolution; `None` lets rayon decide.
    pub workers: Option<usize>,
    /// Also match controllers through the template naming convention.
    pub implicit_controllers: bool,
    /// Base for relative paths in labels.
    pub project_root: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_child_depth: 16,
            workers: None,
            implicit_controllers: true,
            project_root: None,
        }
    }
}

impl ResolverConfig {
    pub fn from_file(path: &Path) -> Result<Self, TwigscopeError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
