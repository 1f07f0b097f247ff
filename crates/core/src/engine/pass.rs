use super::collaborators::Collaborators;
use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};
use crate::namespace::TemplateFileMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use twigscope_api::{LogicalName, Template};

/// State owned by a single resolution request.
///
/// The namespace snapshot is fetched at most once per pass and is dropped with it,
/// so a new pass always observes the indexer's current state. Passes of one batch
/// share a single snapshot through [`ResolutionPass::with_file_map`].
pub struct ResolutionPass<'e> {
    collaborators: &'e Collaborators,
    config: &'e ResolverConfig,
    token: CancellationToken,
    file_map: OnceCell<Arc<TemplateFileMap>>,
}

impl<'e> ResolutionPass<'e> {
    pub fn new(
        collaborators: &'e Collaborators,
        config: &'e ResolverConfig,
        token: CancellationToken,
    ) -> Self {
        Self {
            collaborators,
            config,
            token,
            file_map: OnceCell::new(),
        }
    }

    /// A pass that starts from an already loaded snapshot.
    pub fn with_file_map(
        collaborators: &'e Collaborators,
        config: &'e ResolverConfig,
        token: CancellationToken,
        file_map: Arc<TemplateFileMap>,
    ) -> Self {
        Self {
            collaborators,
            config,
            token,
            file_map: OnceCell::with_value(file_map),
        }
    }

    pub fn collaborators(&self) -> &'e Collaborators {
        self.collaborators
    }

    pub fn config(&self) -> &'e ResolverConfig {
        self.config
    }

    /// Fails with [`ResolveError::Cancelled`] once the request has been aborted.
    pub fn checkpoint(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }
        Ok(())
    }

    /// The namespace snapshot for this pass, fetched on first use.
    pub fn file_map(&self) -> Result<&Arc<TemplateFileMap>> {
        self.file_map.get_or_try_init(|| -> Result<Arc<TemplateFileMap>> {
            self.checkpoint()?;
            let entries = self.collaborators.templates.namespace_entries()?;
            let map = TemplateFileMap::from_entries(entries);
            debug!(
                names = map.name_count(),
                templates = map.template_count(),
                "namespace snapshot loaded"
            );
            Ok(Arc::new(map))
        })
    }

    /// Logical names of `template`; empty when it is outside every template root.
    pub fn logical_names(&self, template: &Template) -> Result<Vec<LogicalName>> {
        Ok(self.file_map()?.names_for(template).to_vec())
    }
}
