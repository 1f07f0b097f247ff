use tabled::Tabled;
use twigscope_core::RelationshipReport;
use twigscope_core::error::ResolveError;
use twigscope_core::presentation::{RelatedGroup, RelatedItem, RelatedTarget};
use twigscope_core::resolver::IncludeTarget;

/// One related item, as shown by `twigscope relations`.
#[derive(Tabled)]
pub struct RelationRow {
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Block")]
    pub block: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Via")]
    pub via: String,
    #[tabled(rename = "Offset")]
    pub offset: String,
}

impl RelationRow {
    pub fn from_group(group: &RelatedGroup) -> Vec<Self> {
        let title = group.title();
        let block = group
            .anchor
            .as_ref()
            .map(|b| b.name.clone())
            .unwrap_or_else(|| "-".to_string());

        group
            .items
            .iter()
            .map(|item| Self {
                group: title.clone(),
                block: block.clone(),
                target: item.label.clone().unwrap_or_else(|| "-".to_string()),
                via: item
                    .inclusion_kind
                    .map(|kind| kind.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                offset: offset_of(item),
            })
            .collect()
    }
}

fn offset_of(item: &RelatedItem) -> String {
    let span = match &item.target {
        RelatedTarget::Block(block) => Some(block.span),
        RelatedTarget::Include(IncludeTarget::Construct { construct, .. }) => Some(construct.span),
        RelatedTarget::Controller(action) => action.span,
        _ => None,
    };
    span.map(|s| s.start.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Per-document counts, as shown by `twigscope batch`.
#[derive(Tabled)]
pub struct BatchRow {
    #[tabled(rename = "Template")]
    pub template: String,
    #[tabled(rename = "Includers")]
    pub includers: String,
    #[tabled(rename = "Overwrites")]
    pub overwrites: String,
    #[tabled(rename = "Blocks")]
    pub blocks: String,
    #[tabled(rename = "Controllers")]
    pub controllers: String,
}

impl BatchRow {
    pub fn from_result(
        template: String,
        result: &Result<RelationshipReport, ResolveError>,
    ) -> Self {
        match result {
            Ok(report) => Self {
                template,
                includers: report.includers.len().to_string(),
                overwrites: report.overwrites.len().to_string(),
                blocks: format!(
                    "{} impl / {} over",
                    report.block_implementations.len(),
                    report.block_overrides.len()
                ),
                controllers: report.controller_usages.len().to_string(),
            },
            Err(err) => Self {
                template,
                includers: format!("error: {err}"),
                overwrites: "-".to_string(),
                blocks: "-".to_string(),
                controllers: "-".to_string(),
            },
        }
    }
}
