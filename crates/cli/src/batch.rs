use crate::view::BatchRow;
use std::path::Path;
use std::sync::Arc;
use tabled::Table;
use tokio_util::sync::CancellationToken;
use tracing::info;
use twigscope_core::corpus::MemoryCorpus;
use twigscope_core::{Collaborators, RelationshipEngine, ResolverConfig};

pub fn run(corpus_path: &Path, config: ResolverConfig) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = Arc::new(MemoryCorpus::from_file(corpus_path)?);
    let documents: Vec<_> = corpus.templates().cloned().collect();
    info!(
        "Resolving {} templates from {}",
        documents.len(),
        corpus_path.display()
    );

    let engine = RelationshipEngine::new(Collaborators::from_corpus(corpus), config)?;
    let results = engine.compute_batch(documents, &CancellationToken::new());

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    let rows: Vec<BatchRow> = results
        .iter()
        .map(|(template, result)| BatchRow::from_result(template.to_string(), result))
        .collect();

    if rows.is_empty() {
        println!("Corpus contains no templates.");
        return Ok(());
    }
    println!("{}", Table::new(rows));
    println!("Resolved: {}, failed: {}", results.len() - failed, failed);
    Ok(())
}
