use crate::corpus::MemoryCorpus;
use crate::resolver::controllers::SymfonyControllerConvention;
use std::fmt;
use std::sync::Arc;
use twigscope_api::{
    BlockHierarchy, ContentScanner, ControllerIndex, ControllerNamingConvention, TemplateIndex,
};

/// The external services a resolution reads from.
///
/// The list is fixed when the engine is built; nothing is discovered at resolution time.
#[derive(Clone)]
pub struct Collaborators {
    pub templates: Arc<dyn TemplateIndex>,
    pub controllers: Arc<dyn ControllerIndex>,
    pub scanner: Arc<dyn ContentScanner>,
    pub hierarchy: Arc<dyn BlockHierarchy>,
    pub conventions: Vec<Arc<dyn ControllerNamingConvention>>,
}

impl Collaborators {
    /// Uses the Symfony controller naming convention.
    pub fn new(
        templates: Arc<dyn TemplateIndex>,
        controllers: Arc<dyn ControllerIndex>,
        scanner: Arc<dyn ContentScanner>,
        hierarchy: Arc<dyn BlockHierarchy>,
    ) -> Self {
        Self {
            templates,
            controllers,
            scanner,
            hierarchy,
            conventions: vec![Arc::new(SymfonyControllerConvention)],
        }
    }

    /// All four services backed by one in-memory corpus.
    pub fn from_corpus(corpus: Arc<MemoryCorpus>) -> Self {
        Self::new(corpus.clone(), corpus.clone(), corpus.clone(), corpus)
    }

    pub fn with_convention(mut self, convention: Arc<dyn ControllerNamingConvention>) -> Self {
        self.conventions.push(convention);
        self
    }

    pub fn without_conventions(mut self) -> Self {
        self.conventions.clear();
        self
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("conventions", &self.conventions)
            .finish_non_exhaustive()
    }
}
