use indexmap::{IndexMap, IndexSet};
use std::cmp::Ordering;
use std::collections::HashMap;
use twigscope_api::{LogicalName, NamespaceEntry, Template};

/// Shorten a template name for display.
///
/// `@FooBundle/x.html.twig` → `@Foo/x`, `FooBundle:Bar:x.html.twig` → `Foo:Bar:x`.
pub fn fold_template_name(name: &str) -> String {
    let mut folded = name;
    for suffix in [".html.twig", ".twig"] {
        if let Some(stripped) = folded.strip_suffix(suffix) {
            folded = stripped;
            break;
        }
    }

    if let Some(rest) = folded.strip_prefix('@') {
        if let Some((bundle, path)) = rest.split_once('/') {
            if let Some(short) = bundle.strip_suffix("Bundle").filter(|s| !s.is_empty()) {
                return format!("@{short}/{path}");
            }
        }
    } else if let Some((bundle, path)) = folded.split_once(':') {
        if let Some(short) = bundle.strip_suffix("Bundle").filter(|s| !s.is_empty()) {
            return format!("{short}:{path}");
        }
    }

    folded.to_string()
}

/// Bundle-style names sort first, then plain names; each group by normalized key.
pub fn compare_template_names(a: &LogicalName, b: &LogicalName) -> Ordering {
    b.is_bundle_style()
        .cmp(&a.is_bundle_style())
        .then_with(|| a.key().cmp(b.key()))
        .then_with(|| a.as_str().cmp(b.as_str()))
}

/// Snapshot of the template namespace for one resolution pass.
///
/// Maps every logical name to the templates registered under it (override layers, in
/// index order) and every template back to its names (in [`compare_template_names`] order).
#[derive(Debug, Default, Clone)]
pub struct TemplateFileMap {
    by_name: IndexMap<LogicalName, IndexSet<Template>>,
    by_template: HashMap<Template, Vec<LogicalName>>,
    /// Templates by the lowercased folded form of their primary name.
    by_label: HashMap<String, IndexSet<Template>>,
}

fn label_key(name: &LogicalName) -> String {
    fold_template_name(name.as_str()).to_ascii_lowercase()
}

impl TemplateFileMap {
    pub fn from_entries(entries: impl IntoIterator<Item = NamespaceEntry>) -> Self {
        let mut map = Self::default();
        for entry in entries {
            if entry.name.is_empty() {
                continue;
            }
            map.by_name
                .entry(entry.name.clone())
                .or_default()
                .insert(entry.template.clone());
            map.by_template
                .entry(entry.template)
                .or_default()
                .push(entry.name);
        }

        for names in map.by_template.values_mut() {
            names.sort_by(compare_template_names);
            names.dedup();
        }

        for (template, names) in &map.by_template {
            if let Some(primary) = names.first() {
                map.by_label
                    .entry(label_key(primary))
                    .or_default()
                    .insert(template.clone());
            }
        }
        for templates in map.by_label.values_mut() {
            templates.sort();
        }

        map
    }

    /// Logical names of `template`; empty when it is outside every template root.
    pub fn names_for(&self, template: &Template) -> &[LogicalName] {
        self.by_template
            .get(template)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn templates(&self, name: &LogicalName) -> impl Iterator<Item = &Template> {
        self.by_name.get(name).into_iter().flatten()
    }

    /// Templates other than `template` whose primary name folds to the same label.
    pub fn label_collisions<'a>(
        &'a self,
        template: &'a Template,
    ) -> impl Iterator<Item = &'a Template> + 'a {
        self.names_for(template)
            .first()
            .and_then(|primary| self.by_label.get(&label_key(primary)))
            .into_iter()
            .flatten()
            .filter(move |other| *other != template)
    }

    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn template_count(&self) -> usize {
        self.by_template.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
