use crate::engine::ResolutionPass;
use crate::error::Result;
use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;
use twigscope_api::{InclusionConstruct, LogicalName, Template};

/// Where navigation from "included by" lands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncludeTarget {
    /// The construct inside `template` that names the included template.
    Construct {
        template: Template,
        construct: InclusionConstruct,
    },
    /// The including file as a whole, when no construct matched literally.
    File(Template),
}

impl IncludeTarget {
    pub fn template(&self) -> &Template {
        match self {
            IncludeTarget::Construct { template, .. } => template,
            IncludeTarget::File(template) => template,
        }
    }
}

/// Cheap existence check: stops at the first name that has any referencing template.
pub fn has_including_templates(pass: &ResolutionPass<'_>, names: &[LogicalName]) -> Result<bool> {
    let index = &pass.collaborators().templates;
    for name in names {
        pass.checkpoint()?;
        if index.has_referencing_templates(name)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Templates referencing any of `names`.
pub fn find_including_templates(
    pass: &ResolutionPass<'_>,
    names: &[LogicalName],
) -> Result<IndexSet<Template>> {
    let index = &pass.collaborators().templates;
    let mut including = IndexSet::new();
    for name in names {
        pass.checkpoint()?;
        including.extend(index.lookup_referencing_templates(name)?);
    }
    Ok(including)
}

/// Inclusion constructs of `source`, in source order.
///
/// Constructs that do not name a template literally are skipped.
pub fn find_included_targets(
    pass: &ResolutionPass<'_>,
    source: &Template,
) -> Result<Vec<InclusionConstruct>> {
    pass.checkpoint()?;
    let raw = pass
        .collaborators()
        .scanner
        .scan_inclusion_constructs(source)?;

    let mut constructs = Vec::with_capacity(raw.len());
    for inclusion in raw {
        let kind = inclusion.kind;
        let span = inclusion.span;
        match inclusion.into_construct() {
            Some(construct) => constructs.push(construct),
            None => debug!(
                template = %source,
                %kind,
                start = span.start,
                "skipping inclusion without a literal template name"
            ),
        }
    }
    Ok(constructs)
}

/// Navigation targets for everything including `names`.
///
/// Points at the matching constructs of each including template, or at the file
/// itself when the reference could not be located.
pub fn materialize_include_targets(
    pass: &ResolutionPass<'_>,
    names: &[LogicalName],
) -> Result<Vec<IncludeTarget>> {
    let including = find_including_templates(pass, names)?;

    let mut targets = Vec::new();
    for template in including {
        pass.checkpoint()?;
        let matching: Vec<InclusionConstruct> = find_included_targets(pass, &template)?
            .into_iter()
            .filter(|construct| names.contains(&construct.target))
            .collect();

        if matching.is_empty() {
            targets.push(IncludeTarget::File(template));
        } else {
            targets.extend(matching.into_iter().map(|construct| IncludeTarget::Construct {
                template: template.clone(),
                construct,
            }));
        }
    }
    Ok(targets)
}
