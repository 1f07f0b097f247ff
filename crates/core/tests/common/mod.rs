#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use twigscope_api::{ControllerAction, InclusionKind, LogicalName, RawInclusion, Span, Template};
use twigscope_core::corpus::{
    BlockRecord, ControllerRecord, CorpusSnapshot, MemoryCorpus, TemplateRecord,
};
use twigscope_core::{Collaborators, RelationshipEngine, ResolverConfig};

pub const ROOT: &str = "/app";

pub fn t(path: &str) -> Template {
    Template::new(format!("{ROOT}/{path}"))
}

/// Builds a corpus snapshot template by template. Paths are relative to [`ROOT`].
#[derive(Default)]
pub struct Fixture {
    snapshot: CorpusSnapshot,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, path: &str, names: &[&str]) -> Self {
        self.snapshot.templates.push(TemplateRecord {
            path: PathBuf::from(format!("{ROOT}/{path}")),
            names: names.iter().map(|n| LogicalName::new(*n)).collect(),
            inclusions: Vec::new(),
            blocks: Vec::new(),
        });
        self
    }

    fn record(&mut self, path: &str) -> &mut TemplateRecord {
        let full = PathBuf::from(format!("{ROOT}/{path}"));
        let index = self
            .snapshot
            .templates
            .iter()
            .position(|r| r.path == full)
            .unwrap_or_else(|| panic!("fixture template {path} not declared"));
        &mut self.snapshot.templates[index]
    }

    pub fn inclusion(mut self, path: &str, kind: InclusionKind, target: &str) -> Self {
        let record = self.record(path);
        let start = record.inclusions.len() * 100;
        let span = Span::new(start, start + 40);
        let inclusion = RawInclusion::new(kind, target, span);
        record.inclusions.push(inclusion);
        self
    }

    pub fn include(self, path: &str, target: &str) -> Self {
        self.inclusion(path, InclusionKind::Include, target)
    }

    pub fn extends(self, path: &str, target: &str) -> Self {
        self.inclusion(path, InclusionKind::Extends, target)
    }

    pub fn malformed_include(mut self, path: &str) -> Self {
        self.record(path).inclusions.push(RawInclusion {
            kind: InclusionKind::Include,
            target: None,
            span: Span::default(),
        });
        self
    }

    pub fn block(mut self, path: &str, name: &str, start: usize) -> Self {
        self.record(path).blocks.push(BlockRecord {
            name: name.to_string(),
            span: Span::new(start, start + name.len()),
        });
        self
    }

    pub fn controller(mut self, id: &str, renders: &[&str]) -> Self {
        self.snapshot.controllers.push(ControllerRecord {
            action: ControllerAction::new(id),
            renders: renders.iter().map(|n| LogicalName::new(*n)).collect(),
            route: None,
        });
        self
    }

    pub fn corpus(self) -> Arc<MemoryCorpus> {
        Arc::new(MemoryCorpus::new(self.snapshot))
    }
}

pub fn config() -> ResolverConfig {
    ResolverConfig {
        workers: Some(2),
        project_root: Some(PathBuf::from(ROOT)),
        ..ResolverConfig::default()
    }
}

pub fn engine(corpus: Arc<MemoryCorpus>) -> RelationshipEngine {
    engine_with(Collaborators::from_corpus(corpus), config())
}

pub fn engine_with(collaborators: Collaborators, config: ResolverConfig) -> RelationshipEngine {
    RelationshipEngine::new(collaborators, config).unwrap()
}
