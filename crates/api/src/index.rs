use crate::error::IndexResult;
use crate::models::{
    Block, ControllerAction, ControllerActionRef, LogicalName, NamespaceEntry, RawInclusion,
    Template,
};
use std::fmt::Debug;

/// Template namespace as maintained by an external indexer.
///
/// Every method returns `IndexError::Unavailable` while the indexer cannot answer
/// (for example, while it is still building). An empty result always means
/// "nothing there".
pub trait TemplateIndex: Send + Sync {
    /// Every `(logical name, template)` pair currently known.
    fn namespace_entries(&self) -> IndexResult<Vec<NamespaceEntry>>;

    /// Templates registered under `name`. Several templates sharing a name are override layers.
    fn lookup_by_logical_name(&self, name: &LogicalName) -> IndexResult<Vec<Template>>;

    /// Templates whose content references `name` through an inclusion construct.
    fn lookup_referencing_templates(&self, name: &LogicalName) -> IndexResult<Vec<Template>>;

    /// Existence check for [`TemplateIndex::lookup_referencing_templates`].
    fn has_referencing_templates(&self, name: &LogicalName) -> IndexResult<bool> {
        Ok(!self.lookup_referencing_templates(name)?.is_empty())
    }
}

/// Index of controller actions and the templates they render.
pub trait ControllerIndex: Send + Sync {
    /// Actions known to render `template` directly.
    fn lookup_controllers_for_template(
        &self,
        template: &Template,
    ) -> IndexResult<Vec<ControllerAction>>;

    /// Resolve convention-derived coordinates to a concrete action, if it exists.
    fn find_action(
        &self,
        reference: &ControllerActionRef,
    ) -> IndexResult<Option<ControllerAction>>;
}

/// Reads already-parsed template content.
pub trait ContentScanner: Send + Sync {
    /// Inclusion constructs in source order. Malformed constructs are reported with no target.
    fn scan_inclusion_constructs(&self, template: &Template) -> IndexResult<Vec<RawInclusion>>;

    /// Blocks defined in `template`.
    fn scan_blocks(&self, template: &Template) -> IndexResult<Vec<Block>>;
}

/// Walks a block up its `extends` chain.
pub trait BlockHierarchy: Send + Sync {
    /// The block(s) that `block` overrides in its ancestors. Empty at the chain root.
    fn parent_blocks_of(&self, block: &Block) -> IndexResult<Vec<Block>>;
}

/// Maps a template name to the controller action that renders it by convention.
pub trait ControllerNamingConvention: Send + Sync + Debug {
    fn controller_for_template(&self, name: &LogicalName) -> Option<ControllerActionRef>;
}
