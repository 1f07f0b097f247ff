//! In-memory template corpus
//!
//! A `CorpusSnapshot` is an already-parsed project: templates with their logical names,
//! inclusion constructs and blocks, plus the controller actions that render them.
//! `MemoryCorpus` indexes a snapshot and serves every collaborator trait from it.

use crate::error::TwigscopeError;
use indexmap::{IndexMap, IndexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use twigscope_api::{
    Block, BlockHierarchy, ContentScanner, ControllerAction, ControllerActionRef,
    ControllerIndex, InclusionKind, IndexError, IndexResult, LogicalName, NamespaceEntry,
    RawInclusion, Span, Template, TemplateIndex,
};

#[derive(Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
pub struct CorpusSnapshot {
    #[serde(default)]
    pub templates: Vec<TemplateRecord>,
    #[serde(default)]
    pub controllers: Vec<ControllerRecord>,
}

impl CorpusSnapshot {
    pub fn from_json_str(content: &str) -> Result<Self, TwigscopeError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, TwigscopeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(CorpusSnapshot)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct TemplateRecord {
    pub path: PathBuf,
    /// Logical names under which the template can be referenced. May be empty.
    #[serde(default)]
    pub names: Vec<LogicalName>,
    #[serde(default)]
    pub inclusions: Vec<RawInclusion>,
    #[serde(default)]
    pub blocks: Vec<BlockRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct BlockRecord {
    pub name: String,
    #[serde(default)]
    pub span: Span,
}

#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct ControllerRecord {
    #[serde(flatten)]
    pub action: ControllerAction,
    /// Templates the action renders explicitly.
    #[serde(default)]
    pub renders: Vec<LogicalName>,
    /// Convention coordinates this action answers to, when known.
    #[serde(default)]
    pub route: Option<ControllerActionRef>,
}

pub struct MemoryCorpus {
    records: IndexMap<Template, TemplateRecord>,
    by_name: HashMap<LogicalName, Vec<Template>>,
    referencing: HashMap<LogicalName, IndexSet<Template>>,
    controllers: Vec<ControllerRecord>,
    indexing: AtomicBool,
}

impl MemoryCorpus {
    pub fn new(snapshot: CorpusSnapshot) -> Self {
        let mut records = IndexMap::new();
        let mut by_name: HashMap<LogicalName, Vec<Template>> = HashMap::new();
        let mut referencing: HashMap<LogicalName, IndexSet<Template>> = HashMap::new();

        for record in snapshot.templates {
            let template = Template::new(record.path.clone());
            for name in record.names.iter().filter(|n| !n.is_empty()) {
                let templates = by_name.entry(name.clone()).or_default();
                if !templates.contains(&template) {
                    templates.push(template.clone());
                }
            }
            for construct in record
                .inclusions
                .iter()
                .cloned()
                .filter_map(RawInclusion::into_construct)
            {
                referencing
                    .entry(construct.target)
                    .or_default()
                    .insert(template.clone());
            }
            records.insert(template, record);
        }

        Self {
            records,
            by_name,
            referencing,
            controllers: snapshot.controllers,
            indexing: AtomicBool::new(false),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, TwigscopeError> {
        Ok(Self::new(CorpusSnapshot::from_file(path)?))
    }

    /// While set, every index query fails as unavailable.
    pub fn set_indexing(&self, indexing: bool) {
        self.indexing.store(indexing, Ordering::SeqCst);
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn template_for_path(&self, path: &Path) -> Option<&Template> {
        self.records
            .get_key_value(&Template::new(path))
            .map(|(t, _)| t)
    }

    /// A template by path, or failing that by one of its logical names.
    pub fn find_template(&self, query: &str) -> Option<&Template> {
        if let Some(template) = self.template_for_path(Path::new(query)) {
            return Some(template);
        }
        self.by_name.get(&LogicalName::new(query))?.first()
    }

    fn ensure_ready(&self, index: &'static str) -> IndexResult<()> {
        if self.indexing.load(Ordering::SeqCst) {
            return Err(IndexError::unavailable(index, "indexing in progress"));
        }
        Ok(())
    }

    fn blocks_of(&self, template: &Template) -> Vec<Block> {
        self.records
            .get(template)
            .map(|record| {
                record
                    .blocks
                    .iter()
                    .map(|b| Block::new(template.clone(), b.name.clone(), b.span))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn extended_templates(&self, template: &Template) -> Vec<Template> {
        let Some(record) = self.records.get(template) else {
            return Vec::new();
        };
        record
            .inclusions
            .iter()
            .filter(|inclusion| inclusion.kind == InclusionKind::Extends)
            .cloned()
            .filter_map(RawInclusion::into_construct)
            .flat_map(|construct| {
                self.by_name
                    .get(&construct.target)
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }

    fn action_matches(action: &ControllerAction, reference: &ControllerActionRef) -> bool {
        let suffix = format!("{}::{}", reference.controller, reference.action);
        let id = action.id.replace('/', "\\");
        let class_matches = id == suffix || id.ends_with(&format!("\\{suffix}"));
        let bundle_matches = reference
            .bundle
            .as_deref()
            .is_none_or(|bundle| Self::namespace_contains_bundle(&id, bundle));
        class_matches && bundle_matches
    }

    /// Whether a run of whole namespace segments of `id` spells `bundle`, so both
    /// `Acme\BlogBundle` and `AcmeBlogBundle` match `AcmeBlogBundle`.
    fn namespace_contains_bundle(id: &str, bundle: &str) -> bool {
        let segments: Vec<&str> = id.split('\\').collect();
        let namespace = &segments[..segments.len().saturating_sub(1)];
        (0..namespace.len()).any(|start| {
            let mut joined = String::new();
            namespace[start..].iter().any(|segment| {
                joined.push_str(segment);
                joined == bundle
            })
        })
    }
}

impl TemplateIndex for MemoryCorpus {
    fn namespace_entries(&self) -> IndexResult<Vec<NamespaceEntry>> {
        self.ensure_ready("template")?;
        Ok(self
            .records
            .iter()
            .flat_map(|(template, record)| {
                record
                    .names
                    .iter()
                    .map(move |name| NamespaceEntry::new(name.clone(), template.clone()))
            })
            .collect())
    }

    fn lookup_by_logical_name(&self, name: &LogicalName) -> IndexResult<Vec<Template>> {
        self.ensure_ready("template")?;
        Ok(self.by_name.get(name).cloned().unwrap_or_default())
    }

    fn lookup_referencing_templates(&self, name: &LogicalName) -> IndexResult<Vec<Template>> {
        self.ensure_ready("template")?;
        Ok(self
            .referencing
            .get(name)
            .map(|templates| templates.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn has_referencing_templates(&self, name: &LogicalName) -> IndexResult<bool> {
        self.ensure_ready("template")?;
        Ok(self.referencing.get(name).is_some_and(|t| !t.is_empty()))
    }
}

impl ControllerIndex for MemoryCorpus {
    fn lookup_controllers_for_template(
        &self,
        template: &Template,
    ) -> IndexResult<Vec<ControllerAction>> {
        self.ensure_ready("controller")?;
        let Some(record) = self.records.get(template) else {
            return Ok(Vec::new());
        };
        Ok(self
            .controllers
            .iter()
            .filter(|c| c.renders.iter().any(|name| record.names.contains(name)))
            .map(|c| c.action.clone())
            .collect())
    }

    fn find_action(
        &self,
        reference: &ControllerActionRef,
    ) -> IndexResult<Option<ControllerAction>> {
        self.ensure_ready("controller")?;
        let by_route = self
            .controllers
            .iter()
            .find(|c| c.route.as_ref() == Some(reference));
        let found = by_route.or_else(|| {
            self.controllers
                .iter()
                .find(|c| Self::action_matches(&c.action, reference))
        });
        Ok(found.map(|c| c.action.clone()))
    }
}

impl ContentScanner for MemoryCorpus {
    fn scan_inclusion_constructs(&self, template: &Template) -> IndexResult<Vec<RawInclusion>> {
        self.ensure_ready("content")?;
        Ok(self
            .records
            .get(template)
            .map(|record| record.inclusions.clone())
            .unwrap_or_default())
    }

    fn scan_blocks(&self, template: &Template) -> IndexResult<Vec<Block>> {
        self.ensure_ready("content")?;
        Ok(self.blocks_of(template))
    }
}

impl BlockHierarchy for MemoryCorpus {
    /// Walks `extends` edges level by level and stops at the nearest level defining the block.
    fn parent_blocks_of(&self, block: &Block) -> IndexResult<Vec<Block>> {
        self.ensure_ready("hierarchy")?;

        let mut visited = HashSet::from([block.template.clone()]);
        let mut frontier = self.extended_templates(&block.template);

        while !frontier.is_empty() {
            frontier.retain(|t| visited.insert(t.clone()));

            let found: Vec<Block> = frontier
                .iter()
                .flat_map(|t| self.blocks_of(t))
                .filter(|candidate| candidate.name == block.name)
                .collect();
            if !found.is_empty() {
                return Ok(found);
            }

            frontier = frontier
                .iter()
                .flat_map(|t| self.extended_templates(t))
                .collect();
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "templates": [
            {
                "path": "/app/templates/base.html.twig",
                "names": ["base.html.twig"],
                "blocks": [{"name": "content", "span": {"start": 10, "end": 40}}]
            },
            {
                "path": "/app/templates/layout.html.twig",
                "names": ["layout.html.twig"],
                "inclusions": [{"kind": "extends", "target": "base.html.twig"}]
            },
            {
                "path": "/app/templates/page.html.twig",
                "names": ["page.html.twig"],
                "inclusions": [
                    {"kind": "extends", "target": "layout.html.twig"},
                    {"kind": "include", "target": null}
                ],
                "blocks": [{"name": "content"}]
            }
        ],
        "controllers": [
            {"id": "App\\Controller\\PageController::showAction", "renders": ["page.html.twig"]}
        ]
    }"#;

    fn corpus() -> MemoryCorpus {
        MemoryCorpus::new(CorpusSnapshot::from_json_str(SNAPSHOT).unwrap())
    }

    #[test]
    fn test_referencing_skips_malformed_inclusions() {
        let corpus = corpus();
        let referencing = corpus
            .lookup_referencing_templates(&LogicalName::new("base.html.twig"))
            .unwrap();
        let layout = Template::new("/app/templates/layout.html.twig");
        assert_eq!(referencing, vec![layout]);
        let raw = corpus
            .scan_inclusion_constructs(&Template::new("/app/templates/page.html.twig"))
            .unwrap();
        assert!(raw.iter().any(|i| i.target.is_none()));
    }

    #[test]
    fn test_parent_blocks_skip_levels_without_the_block() {
        let corpus = corpus();
        let page = Template::new("/app/templates/page.html.twig");
        let block = corpus.scan_blocks(&page).unwrap().remove(0);

        let parents = corpus.parent_blocks_of(&block).unwrap();
        assert_eq!(parents.len(), 1);
        let base = Template::new("/app/templates/base.html.twig");
        assert_eq!(parents[0].template, base);
        assert_eq!(parents[0].span, Span::new(10, 40));
    }

    #[test]
    fn test_find_action_by_class_suffix() {
        let corpus = corpus();
        let reference = ControllerActionRef {
            bundle: None,
            controller: "PageController".into(),
            action: "showAction".into(),
        };
        let action = corpus.find_action(&reference).unwrap().unwrap();
        assert_eq!(action.method_name(), "showAction");

        let other_bundle = ControllerActionRef {
            bundle: Some("BlogBundle".into()),
            ..reference
        };
        assert!(corpus.find_action(&other_bundle).unwrap().is_none());
    }

    #[test]
    fn test_bundle_matches_whole_namespace_segments() {
        let action = |id: &str| ControllerAction::new(id);
        let blog = ControllerActionRef {
            bundle: Some("AcmeBlogBundle".into()),
            controller: "PostController".into(),
            action: "showAction".into(),
        };
        let id = "Acme\\BlogBundle\\Controller\\PostController::showAction";
        assert!(MemoryCorpus::action_matches(&action(id), &blog));
        let id = "AcmeBlogBundle\\Controller\\PostController::showAction";
        assert!(MemoryCorpus::action_matches(&action(id), &blog));

        let short = ControllerActionRef {
            bundle: Some("BlogBundle".into()),
            ..blog.clone()
        };
        let id = "Acme\\MyBlogBundle\\Controller\\PostController::showAction";
        assert!(!MemoryCorpus::action_matches(&action(id), &short));
        let id = "Acme\\BlogBundleExtra\\Controller\\PostController::showAction";
        assert!(!MemoryCorpus::action_matches(&action(id), &short));
        let id = "Acme\\BlogBundle\\Controller\\PostController::showAction";
        assert!(MemoryCorpus::action_matches(&action(id), &short));
    }

    #[test]
    fn test_indexing_makes_every_index_unavailable() {
        let corpus = corpus();
        corpus.set_indexing(true);
        let expected = IndexError::unavailable("template", "indexing in progress");
        assert_eq!(corpus.namespace_entries().unwrap_err(), expected);
        assert!(corpus.scan_blocks(&Template::new("/x")).is_err());

        corpus.set_indexing(false);
        assert_eq!(corpus.namespace_entries().unwrap().len(), 3);
    }

    #[test]
    fn test_find_template_by_path_or_name() {
        let corpus = corpus();
        let by_name = corpus.find_template("Layout.html.twig").unwrap();
        assert_eq!(by_name.path(), Path::new("/app/templates/layout.html.twig"));
        let by_path = corpus.find_template("/app/templates/base.html.twig");
        assert!(by_path.is_some());
        assert!(corpus.find_template("missing.html.twig").is_none());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let corpus = MemoryCorpus::from_file(&path).unwrap();
        assert_eq!(corpus.len(), 3);
        assert!(matches!(
            MemoryCorpus::from_file(&dir.path().join("missing.json")),
            Err(TwigscopeError::Io(_))
        ));
    }

    #[test]
    fn test_schema_lists_templates() {
        let schema = serde_json::to_value(CorpusSnapshot::json_schema()).unwrap();
        assert!(schema["properties"]["templates"].is_object());
    }
}
