use crate::engine::ResolutionPass;
use crate::error::Result;
use indexmap::IndexSet;
use twigscope_api::Template;

/// Other templates registered under any of `template`'s logical names.
///
/// Matching is by name only; two layers never need similar content to count.
pub fn find_overwrite_siblings(
    pass: &ResolutionPass<'_>,
    template: &Template,
) -> Result<IndexSet<Template>> {
    let index = &pass.collaborators().templates;

    let mut siblings = IndexSet::new();
    for name in pass.logical_names(template)? {
        pass.checkpoint()?;
        for candidate in index.lookup_by_logical_name(&name)? {
            if candidate != *template {
                siblings.insert(candidate);
            }
        }
    }
    Ok(siblings)
}
