mod common;

use common::{Fixture, config, engine, engine_with, t};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use twigscope_api::{
    Block, ContentScanner, InclusionKind, IndexResult, LogicalName, RawInclusion, Template,
};
use twigscope_core::Collaborators;
use twigscope_core::corpus::MemoryCorpus;
use twigscope_core::presentation::RelationKind;
use twigscope_core::resolver::IncludeTarget;

fn include_fixture() -> Fixture {
    Fixture::new()
        .template("templates/base.html.twig", &["base.html.twig"])
        .template("templates/child.html.twig", &["child.html.twig"])
        .include("templates/child.html.twig", "base.html.twig")
}

#[test]
fn test_included_template_points_back_at_include_construct() {
    let engine = engine(include_fixture().corpus());
    let doc = engine.compute_relationships(t("templates/base.html.twig"), CancellationToken::new());

    assert!(doc.has_includers().unwrap());
    let includers: Vec<&Template> = doc.includers().unwrap().iter().collect();
    assert_eq!(includers, vec![&t("templates/child.html.twig")]);

    let targets = doc.include_targets().unwrap();
    assert_eq!(targets.len(), 1);
    match &targets[0] {
        IncludeTarget::Construct {
            template,
            construct,
        } => {
            assert_eq!(template, &t("templates/child.html.twig"));
            assert_eq!(construct.kind, InclusionKind::Include);
            assert_eq!(construct.target, LogicalName::new("base.html.twig"));
        }
        other => panic!("expected a construct target, got {other:?}"),
    }

    let groups = doc.related_groups().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].relation, RelationKind::Includes);
    assert_eq!(groups[0].title(), "Include: child");
    let kind = groups[0].items[0].inclusion_kind;
    assert_eq!(kind, Some(InclusionKind::Include));
}

#[test]
fn test_including_template_has_no_includers() {
    let engine = engine(include_fixture().corpus());
    let report = engine
        .compute_relationships(t("templates/child.html.twig"), CancellationToken::new())
        .into_report()
        .unwrap();

    assert!(report.includers.is_empty());
    assert!(report.include_targets.is_empty());
    assert!(report.is_empty());
}

#[test]
fn test_includers_of_any_name_are_merged() {
    let corpus = Fixture::new()
        .template(
            "templates/widget.html.twig",
            &["widget.html.twig", "@App/widget.html.twig"],
        )
        .template("templates/a.html.twig", &["a.html.twig"])
        .template("templates/b.html.twig", &["b.html.twig"])
        .include("templates/a.html.twig", "@App/widget.html.twig")
        .include("templates/b.html.twig", "widget.html.twig")
        .corpus();
    let engine = engine(corpus);

    let report = engine
        .compute_relationships(t("templates/widget.html.twig"), CancellationToken::new())
        .into_report()
        .unwrap();

    let includers: Vec<Template> = report.includers.iter().cloned().collect();
    assert_eq!(
        includers,
        vec![t("templates/a.html.twig"), t("templates/b.html.twig")]
    );
    assert_eq!(report.include_targets.len(), 2);
    assert_eq!(report.groups[0].title(), "Includes");
}

#[test]
fn test_malformed_constructs_are_skipped() {
    let corpus = Fixture::new()
        .template("templates/base.html.twig", &["base.html.twig"])
        .template("templates/page.html.twig", &["page.html.twig"])
        .malformed_include("templates/page.html.twig")
        .include("templates/page.html.twig", "base.html.twig")
        .corpus();
    let engine = engine(corpus);

    let report = engine
        .compute_relationships(t("templates/base.html.twig"), CancellationToken::new())
        .into_report()
        .unwrap();

    assert_eq!(report.include_targets.len(), 1);
    assert!(matches!(
        &report.include_targets[0],
        IncludeTarget::Construct { construct, .. } if construct.target.as_str() == "base.html.twig"
    ));
}

#[test]
fn test_nameless_template_has_no_relationships_and_labels_by_path() {
    let corpus = Fixture::new()
        .template("templates/base.html.twig", &["base.html.twig"])
        .template("templates/partials/orphan.html.twig", &[])
        .include("templates/partials/orphan.html.twig", "base.html.twig")
        .block("templates/partials/orphan.html.twig", "content", 0)
        .corpus();
    let engine = engine(corpus);

    let orphan = engine
        .compute_relationships(
            t("templates/partials/orphan.html.twig"),
            CancellationToken::new(),
        )
        .into_report()
        .unwrap();
    assert!(orphan.names.is_empty());
    assert!(orphan.includers.is_empty());
    assert!(orphan.overwrites.is_empty());
    assert!(orphan.block_implementations.is_empty());

    let base = engine
        .compute_relationships(t("templates/base.html.twig"), CancellationToken::new())
        .into_report()
        .unwrap();
    assert_eq!(
        base.groups[0].title(),
        "Include: templates/partials/orphan.html.twig"
    );
}

/// Reports inclusion constructs as absent while keeping everything else.
struct BlindScanner(Arc<MemoryCorpus>);

impl ContentScanner for BlindScanner {
    fn scan_inclusion_constructs(&self, _template: &Template) -> IndexResult<Vec<RawInclusion>> {
        Ok(Vec::new())
    }

    fn scan_blocks(&self, template: &Template) -> IndexResult<Vec<Block>> {
        self.0.scan_blocks(template)
    }
}

#[test]
fn test_unlocated_reference_falls_back_to_whole_file() {
    let corpus = include_fixture().corpus();
    let collaborators = Collaborators::new(
        corpus.clone(),
        corpus.clone(),
        Arc::new(BlindScanner(corpus.clone())),
        corpus,
    );
    let engine = engine_with(collaborators, config());

    let report = engine
        .compute_relationships(t("templates/base.html.twig"), CancellationToken::new())
        .into_report()
        .unwrap();

    assert_eq!(
        report.include_targets,
        vec![IncludeTarget::File(t("templates/child.html.twig"))]
    );
    assert_eq!(report.groups[0].items[0].inclusion_kind, None);
}

const VENDOR_LAYOUT: &str = "src/Foo/Resources/views/layout.html.twig";

#[test]
fn test_same_named_layers_overwrite_each_other_with_distinct_labels() {
    let corpus = Fixture::new()
        .template("templates/layout.html.twig", &["layout.html.twig"])
        .template(VENDOR_LAYOUT, &["layout.html.twig"])
        .template("templates/other.html.twig", &["other.html.twig"])
        .corpus();
    let engine = engine(corpus);

    let app = engine
        .compute_relationships(t("templates/layout.html.twig"), CancellationToken::new())
        .into_report()
        .unwrap();
    let vendor = engine
        .compute_relationships(t(VENDOR_LAYOUT), CancellationToken::new())
        .into_report()
        .unwrap();

    assert_eq!(
        app.overwrites.iter().collect::<Vec<_>>(),
        vec![&t(VENDOR_LAYOUT)]
    );
    assert_eq!(
        vendor.overwrites.iter().collect::<Vec<_>>(),
        vec![&t("templates/layout.html.twig")]
    );

    let app_title = app.groups[0].title();
    let vendor_title = vendor.groups[0].title();
    assert_eq!(app_title, "Overwrite: layout (views)");
    assert_eq!(vendor_title, "Overwrite: layout (templates)");

    let other = engine
        .compute_relationships(t("templates/other.html.twig"), CancellationToken::new())
        .into_report()
        .unwrap();
    assert!(other.overwrites.is_empty());
}
