use crate::view::RelationRow;
use std::path::Path;
use std::sync::Arc;
use tabled::{Table, settings::Style};
use tokio_util::sync::CancellationToken;
use tracing::info;
use twigscope_core::corpus::MemoryCorpus;
use twigscope_core::{Collaborators, RelationshipEngine, ResolverConfig, TwigscopeError};

pub fn run(
    corpus_path: &Path,
    template: &str,
    config: ResolverConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = Arc::new(MemoryCorpus::from_file(corpus_path)?);
    let document = corpus
        .find_template(template)
        .cloned()
        .ok_or_else(|| TwigscopeError::UnknownTemplate(template.to_string()))?;
    info!(
        "Resolving relationships of {} in {}",
        document,
        corpus_path.display()
    );

    let engine = RelationshipEngine::new(Collaborators::from_corpus(corpus), config)?;
    let report = engine
        .compute_relationships(document, CancellationToken::new())
        .into_report()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.names.is_empty() {
        println!("{} has no logical name.", report.document);
    } else {
        let names: Vec<&str> = report.names.iter().map(|n| n.as_str()).collect();
        println!("{} ({})", report.document, names.join(", "));
    }

    let rows: Vec<RelationRow> = report
        .groups
        .iter()
        .flat_map(RelationRow::from_group)
        .collect();
    if rows.is_empty() {
        println!("No related templates found.");
    } else {
        println!("{}", Table::new(rows).with(Style::psql()));
    }
    Ok(())
}
