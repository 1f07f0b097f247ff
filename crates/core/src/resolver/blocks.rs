use super::includes::find_including_templates;
use crate::engine::ResolutionPass;
use crate::error::Result;
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::trace;
use twigscope_api::{Block, Template};

/// Templates that extend or include `parent`, directly or through other children.
///
/// Walks at most `max_child_depth` levels; each template is visited once.
pub fn find_child_templates(
    pass: &ResolutionPass<'_>,
    parent: &Template,
) -> Result<IndexSet<Template>> {
    let mut children = IndexSet::new();
    let mut visited = HashSet::from([parent.clone()]);
    let mut frontier = vec![parent.clone()];

    for depth in 0..pass.config().max_child_depth {
        if frontier.is_empty() {
            break;
        }

        let mut next = Vec::new();
        for template in frontier {
            pass.checkpoint()?;
            let names = pass.logical_names(&template)?;
            for child in find_including_templates(pass, &names)? {
                if visited.insert(child.clone()) {
                    trace!(parent = %template, child = %child, depth, "child template");
                    children.insert(child.clone());
                    next.push(child);
                }
            }
        }
        frontier = next;
    }

    Ok(children)
}

/// Blocks with exactly the same name in every child template of `block`'s template.
pub fn find_block_implementations(
    pass: &ResolutionPass<'_>,
    block: &Block,
) -> Result<IndexSet<Block>> {
    let scanner = &pass.collaborators().scanner;
    let children = find_child_templates(pass, &block.template)?;

    let mut implementations = IndexSet::new();
    for child in &children {
        pass.checkpoint()?;
        for candidate in scanner.scan_blocks(child)? {
            if candidate.name == block.name {
                implementations.insert(candidate);
            }
        }
    }
    Ok(implementations)
}

/// The block(s) `block` overrides further up its `extends` chain.
pub fn find_block_overrides(pass: &ResolutionPass<'_>, block: &Block) -> Result<IndexSet<Block>> {
    pass.checkpoint()?;
    let parents = pass.collaborators().hierarchy.parent_blocks_of(block)?;
    Ok(parents
        .into_iter()
        .filter(|parent| parent != block)
        .collect())
}
