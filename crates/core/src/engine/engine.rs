use super::collaborators::Collaborators;
use super::document::{DocumentRelationships, RelationshipReport};
use super::pass::ResolutionPass;
use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result, TwigscopeError};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::result::Result as StdResult;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use twigscope_api::Template;

pub struct RelationshipEngine {
    collaborators: Collaborators,
    config: ResolverConfig,
    pool: ThreadPool,
}

impl RelationshipEngine {
    pub fn new(
        collaborators: Collaborators,
        config: ResolverConfig,
    ) -> StdResult<Self, TwigscopeError> {
        let mut builder =
            ThreadPoolBuilder::new().thread_name(|i| format!("twigscope-resolve-{i}"));
        if let Some(workers) = config.workers {
            builder = builder.num_threads(workers);
        }
        let pool = builder
            .build()
            .map_err(|e| TwigscopeError::WorkerPool(e.to_string()))?;

        Ok(Self {
            collaborators,
            config,
            pool,
        })
    }

    /// A fresh pass; nothing cached by earlier passes is visible to it.
    pub fn begin_pass(&self, token: CancellationToken) -> ResolutionPass<'_> {
        ResolutionPass::new(&self.collaborators, &self.config, token)
    }

    pub fn compute_relationships(
        &self,
        document: Template,
        token: CancellationToken,
    ) -> DocumentRelationships<'_> {
        DocumentRelationships::new(self.begin_pass(token), document)
    }

    /// Resolve many documents on the worker pool. The namespace snapshot is loaded once
    /// and shared; every document gets its own pass, so one failure never affects the
    /// others. Output order follows input order.
    pub fn compute_batch(
        &self,
        documents: Vec<Template>,
        token: &CancellationToken,
    ) -> Vec<(Template, Result<RelationshipReport>)> {
        let started = Instant::now();
        let total = documents.len();
        info!(documents = total, "resolving batch");

        let file_map = match self.begin_pass(token.child_token()).file_map() {
            Ok(map) => Arc::clone(map),
            Err(err) => {
                warn!(error = %err, "namespace snapshot not loaded, batch skipped");
                return documents
                    .into_iter()
                    .map(|document| (document, Err(err.clone())))
                    .collect();
            }
        };

        let results: Vec<(Template, Result<RelationshipReport>)> = self.pool.install(|| {
            documents
                .into_par_iter()
                .map(|document| {
                    let pass = ResolutionPass::with_file_map(
                        &self.collaborators,
                        &self.config,
                        token.child_token(),
                        Arc::clone(&file_map),
                    );
                    let relationships = DocumentRelationships::new(pass, document.clone());
                    let report = relationships.into_report();
                    if let Err(err) = &report {
                        debug!(template = %document, error = %err, "document not resolved");
                    }
                    (document, report)
                })
                .collect()
        });

        let cancelled = results
            .iter()
            .filter(|(_, r)| matches!(r, Err(ResolveError::Cancelled)))
            .count();
        let unavailable = results
            .iter()
            .filter(|(_, r)| matches!(r, Err(ResolveError::IndexUnavailable { .. })))
            .count();
        if unavailable > 0 {
            warn!(
                unavailable,
                "some documents were skipped while an index was unavailable"
            );
        }
        info!(
            documents = total,
            resolved = total - cancelled - unavailable,
            cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );
        results
    }
}
