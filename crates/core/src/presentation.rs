//! Labels and titles for relationship results.
//!
//! Nothing here renders anything; it only decides what a presenter should call a match
//! and whether a result is shown as one named item or as a list.

pub use crate::namespace::fold_template_name;

use crate::namespace::TemplateFileMap;
use crate::resolver::IncludeTarget;
use serde::Serialize;
use std::path::{Component, Path};
use twigscope_api::{Block, ControllerAction, InclusionKind, Template};

/// `path` relative to `project_root` with `/` separators, or the full path outside it.
pub fn relative_path(path: &Path, project_root: Option<&Path>) -> String {
    let relative = project_root
        .and_then(|root| path.strip_prefix(root).ok())
        .filter(|rel| !rel.as_os_str().is_empty());

    match relative {
        Some(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        None => path.display().to_string(),
    }
}

fn parent_dirs(template: &Template) -> Vec<String> {
    template
        .path()
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn dir_suffix(dirs: &[String], len: usize) -> String {
    dirs[dirs.len().saturating_sub(len)..].join("/")
}

/// Shortest trailing run of `template`'s directories that no colliding template ends with.
fn distinguishing_dirs(template: &Template, collisions: &[&Template]) -> Option<String> {
    let own = parent_dirs(template);
    let others: Vec<Vec<String>> = collisions.iter().map(|t| parent_dirs(t)).collect();

    (1..=own.len()).find_map(|len| {
        let candidate = dir_suffix(&own, len);
        others
            .iter()
            .all(|other| dir_suffix(other, len) != candidate)
            .then_some(candidate)
    })
}

/// A display name for `template` that tells it apart from other layers of the same name.
///
/// Uses the folded primary logical name; when another template folds to the same name,
/// appends the shortest distinguishing directory suffix, and falls back to the relative
/// path when even that does not help. Templates without names show their relative path.
pub fn disambiguated_label(
    template: &Template,
    map: &TemplateFileMap,
    project_root: Option<&Path>,
) -> String {
    let Some(primary) = map.names_for(template).first() else {
        return relative_path(template.path(), project_root);
    };

    let folded = fold_template_name(primary.as_str());
    let collisions: Vec<&Template> = map.label_collisions(template).collect();
    if collisions.is_empty() {
        return folded;
    }

    match distinguishing_dirs(template, &collisions) {
        Some(dirs) => format!("{folded} ({dirs})"),
        None => relative_path(template.path(), project_root),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Includes,
    Overwrites,
    BlockImplementations,
    BlockOverrides,
    Controllers,
}

impl RelationKind {
    pub fn plural_title(&self) -> &'static str {
        match self {
            RelationKind::Includes => "Includes",
            RelationKind::Overwrites => "Overwrites",
            RelationKind::BlockImplementations => "Implementations",
            RelationKind::BlockOverrides => "Overwrites",
            RelationKind::Controllers => "Controllers",
        }
    }

    pub fn singular_prefix(&self) -> &'static str {
        match self {
            RelationKind::Includes => "Include",
            RelationKind::Overwrites => "Overwrite",
            RelationKind::BlockImplementations => "Impl",
            RelationKind::BlockOverrides => "Overwrites",
            RelationKind::Controllers => "Controller",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RelatedTarget {
    Template(Template),
    Block(Block),
    Include(IncludeTarget),
    Controller(ControllerAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedItem {
    pub target: RelatedTarget,
    pub label: Option<String>,
    /// Set for include targets that point at a construct, so include and embed can be told apart.
    pub inclusion_kind: Option<InclusionKind>,
}

impl RelatedItem {
    pub fn template(template: Template, map: &TemplateFileMap, root: Option<&Path>) -> Self {
        let label = disambiguated_label(&template, map, root);
        Self {
            target: RelatedTarget::Template(template),
            label: Some(label),
            inclusion_kind: None,
        }
    }

    pub fn block(block: Block, map: &TemplateFileMap, root: Option<&Path>) -> Self {
        let label = disambiguated_label(&block.template, map, root);
        Self {
            target: RelatedTarget::Block(block),
            label: Some(label),
            inclusion_kind: None,
        }
    }

    pub fn include(target: IncludeTarget, map: &TemplateFileMap, root: Option<&Path>) -> Self {
        let label = disambiguated_label(target.template(), map, root);
        let inclusion_kind = match &target {
            IncludeTarget::Construct { construct, .. } => Some(construct.kind),
            IncludeTarget::File(_) => None,
        };
        Self {
            target: RelatedTarget::Include(target),
            label: Some(label),
            inclusion_kind,
        }
    }

    pub fn controller(action: ControllerAction) -> Self {
        let label = action.id.clone();
        Self {
            target: RelatedTarget::Controller(action),
            label: Some(label),
            inclusion_kind: None,
        }
    }
}

/// One marker's worth of results: a relation anchored at the document or at one of its blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedGroup {
    pub relation: RelationKind,
    /// `None` when the group belongs to the document as a whole.
    pub anchor: Option<Block>,
    pub items: Vec<RelatedItem>,
}

impl RelatedGroup {
    pub fn new(relation: RelationKind, anchor: Option<Block>, items: Vec<RelatedItem>) -> Self {
        Self {
            relation,
            anchor,
            items,
        }
    }

    /// A single labelled item is named in the title; anything else gets the plural title.
    pub fn title(&self) -> String {
        if let [item] = self.items.as_slice() {
            if let Some(label) = &item.label {
                return format!("{}: {}", self.relation.singular_prefix(), label);
            }
        }
        self.relation.plural_title().to_string()
    }

    pub fn is_single(&self) -> bool {
        self.items.len() == 1
    }
}
