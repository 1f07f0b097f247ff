use super::pass::ResolutionPass;
use crate::error::Result;
use crate::namespace::TemplateFileMap;
use crate::presentation::{RelatedGroup, RelatedItem, RelationKind};
use crate::resolver::{self, IncludeTarget};
use indexmap::IndexSet;
use once_cell::sync::OnceCell;
use serde::Serialize;
use twigscope_api::{Block, ControllerAction, LogicalName, Template};

/// A block of the document together with the blocks it is related to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockRelations {
    pub block: Block,
    pub related: IndexSet<Block>,
}

/// Relationships of one template document, each computed on first access.
///
/// Successful results are kept for the lifetime of this value, so asking twice returns
/// the same answer. Failed attempts (cancellation, unavailable index) are not kept.
pub struct DocumentRelationships<'e> {
    pass: ResolutionPass<'e>,
    document: Template,
    names: OnceCell<Vec<LogicalName>>,
    includers: OnceCell<IndexSet<Template>>,
    include_targets: OnceCell<Vec<IncludeTarget>>,
    overwrites: OnceCell<IndexSet<Template>>,
    blocks: OnceCell<Vec<Block>>,
    block_implementations: OnceCell<Vec<BlockRelations>>,
    block_overrides: OnceCell<Vec<BlockRelations>>,
    controller_usages: OnceCell<IndexSet<ControllerAction>>,
}

impl<'e> DocumentRelationships<'e> {
    pub fn new(pass: ResolutionPass<'e>, document: Template) -> Self {
        Self {
            pass,
            document,
            names: OnceCell::new(),
            includers: OnceCell::new(),
            include_targets: OnceCell::new(),
            overwrites: OnceCell::new(),
            blocks: OnceCell::new(),
            block_implementations: OnceCell::new(),
            block_overrides: OnceCell::new(),
            controller_usages: OnceCell::new(),
        }
    }

    pub fn logical_names(&self) -> Result<&[LogicalName]> {
        self.names
            .get_or_try_init(|| self.pass.logical_names(&self.document))
            .map(Vec::as_slice)
    }

    /// Whether anything includes this document, without collecting the includers.
    pub fn has_includers(&self) -> Result<bool> {
        if let Some(includers) = self.includers.get() {
            return Ok(!includers.is_empty());
        }
        resolver::has_including_templates(&self.pass, self.logical_names()?)
    }

    pub fn includers(&self) -> Result<&IndexSet<Template>> {
        self.includers.get_or_try_init(|| {
            resolver::find_including_templates(&self.pass, self.logical_names()?)
        })
    }

    pub fn include_targets(&self) -> Result<&[IncludeTarget]> {
        self.include_targets
            .get_or_try_init(|| {
                resolver::materialize_include_targets(&self.pass, self.logical_names()?)
            })
            .map(Vec::as_slice)
    }

    pub fn overwrites(&self) -> Result<&IndexSet<Template>> {
        self.overwrites
            .get_or_try_init(|| resolver::find_overwrite_siblings(&self.pass, &self.document))
    }

    pub fn blocks(&self) -> Result<&[Block]> {
        self.blocks
            .get_or_try_init(|| -> Result<Vec<Block>> {
                self.pass.checkpoint()?;
                let scanner = &self.pass.collaborators().scanner;
                Ok(scanner.scan_blocks(&self.document)?)
            })
            .map(Vec::as_slice)
    }

    /// Blocks of this document that child templates implement. Blocks without any are left out.
    pub fn block_implementations(&self) -> Result<&[BlockRelations]> {
        self.block_implementations
            .get_or_try_init(|| {
                self.collect_block_relations(|block| {
                    resolver::find_block_implementations(&self.pass, block)
                })
            })
            .map(Vec::as_slice)
    }

    /// Blocks of this document that override a parent block. Blocks without any are left out.
    pub fn block_overrides(&self) -> Result<&[BlockRelations]> {
        self.block_overrides
            .get_or_try_init(|| {
                self.collect_block_relations(|block| {
                    resolver::find_block_overrides(&self.pass, block)
                })
            })
            .map(Vec::as_slice)
    }

    pub fn controller_usages(&self) -> Result<&IndexSet<ControllerAction>> {
        self.controller_usages
            .get_or_try_init(|| resolver::find_controller_usages(&self.pass, &self.document))
    }

    fn collect_block_relations<F>(&self, resolve: F) -> Result<Vec<BlockRelations>>
    where
        F: Fn(&Block) -> Result<IndexSet<Block>>,
    {
        let mut relations = Vec::new();
        for block in self.blocks()? {
            let related = resolve(block)?;
            if !related.is_empty() {
                relations.push(BlockRelations {
                    block: block.clone(),
                    related,
                });
            }
        }
        Ok(relations)
    }

    /// Every non-empty relationship as a labelled group: block markers in block order,
    /// then controllers, includes and overwrites of the document.
    pub fn related_groups(&self) -> Result<Vec<RelatedGroup>> {
        let map: &TemplateFileMap = self.pass.file_map()?;
        let root = self.pass.config().project_root.as_deref();

        let implementations = self.block_implementations()?;
        let overrides = self.block_overrides()?;

        let block_group = |relation: RelationKind, relations: &BlockRelations| {
            RelatedGroup::new(
                relation,
                Some(relations.block.clone()),
                relations
                    .related
                    .iter()
                    .cloned()
                    .map(|block| RelatedItem::block(block, map, root))
                    .collect(),
            )
        };

        let mut groups = Vec::new();
        for block in self.blocks()? {
            if let Some(relations) = implementations.iter().find(|r| &r.block == block) {
                groups.push(block_group(RelationKind::BlockImplementations, relations));
            }
            if let Some(relations) = overrides.iter().find(|r| &r.block == block) {
                groups.push(block_group(RelationKind::BlockOverrides, relations));
            }
        }

        let controllers = self.controller_usages()?;
        if !controllers.is_empty() {
            groups.push(RelatedGroup::new(
                RelationKind::Controllers,
                None,
                controllers
                    .iter()
                    .cloned()
                    .map(RelatedItem::controller)
                    .collect(),
            ));
        }

        if self.has_includers()? {
            groups.push(RelatedGroup::new(
                RelationKind::Includes,
                None,
                self.include_targets()?
                    .iter()
                    .cloned()
                    .map(|target| RelatedItem::include(target, map, root))
                    .collect(),
            ));
        }

        let overwrites = self.overwrites()?;
        if !overwrites.is_empty() {
            groups.push(RelatedGroup::new(
                RelationKind::Overwrites,
                None,
                overwrites
                    .iter()
                    .cloned()
                    .map(|template| RelatedItem::template(template, map, root))
                    .collect(),
            ));
        }

        Ok(groups)
    }

    /// Resolve every field now. Either all of them succeed or the first error is returned.
    pub fn into_report(self) -> Result<RelationshipReport> {
        let groups = self.related_groups()?;
        self.includers()?;

        Ok(RelationshipReport {
            document: self.document,
            names: self.names.into_inner().unwrap_or_default(),
            includers: self.includers.into_inner().unwrap_or_default(),
            include_targets: self.include_targets.into_inner().unwrap_or_default(),
            overwrites: self.overwrites.into_inner().unwrap_or_default(),
            block_implementations: self.block_implementations.into_inner().unwrap_or_default(),
            block_overrides: self.block_overrides.into_inner().unwrap_or_default(),
            controller_usages: self.controller_usages.into_inner().unwrap_or_default(),
            groups,
        })
    }
}

/// Fully materialized relationships of one document.
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipReport {
    pub document: Template,
    pub names: Vec<LogicalName>,
    pub includers: IndexSet<Template>,
    pub include_targets: Vec<IncludeTarget>,
    pub overwrites: IndexSet<Template>,
    pub block_implementations: Vec<BlockRelations>,
    pub block_overrides: Vec<BlockRelations>,
    pub controller_usages: IndexSet<ControllerAction>,
    pub groups: Vec<RelatedGroup>,
}

impl RelationshipReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
