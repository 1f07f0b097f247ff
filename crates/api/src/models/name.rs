use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Normalize a template name into its comparison key.
///
/// Separators are forced to `/`, duplicated separators collapse, `::` becomes `:`,
/// a leading `./` is dropped and the result is lowercased.
pub fn normalize_template_name(name: &str) -> String {
    let mut normalized = name.trim().replace('\\', "/");

    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    while normalized.contains("::") {
        normalized = normalized.replace("::", ":");
    }
    if let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest.to_string();
    }

    normalized.make_ascii_lowercase();
    normalized
}

/// A logical template name, e.g. `@App/layout.html.twig` or `FooBundle:Bar:baz.html.twig`.
///
/// The name keeps the spelling it was written with, but equality, ordering and hashing
/// all go through the normalized key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LogicalName {
    raw: String,
    key: String,
}

impl LogicalName {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = normalize_template_name(&raw);
        Self { raw, key }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Names addressed through a bundle (`@Foo/...` or `Foo:dir:file`).
    pub fn is_bundle_style(&self) -> bool {
        self.key.starts_with('@') || self.key.contains(':')
    }

    /// Compares against a name as it appears in template source.
    pub fn matches(&self, written: &str) -> bool {
        self.raw == written || self.key == normalize_template_name(written)
    }
}

impl PartialEq for LogicalName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for LogicalName {}

impl Hash for LogicalName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for LogicalName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogicalName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Debug for LogicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicalName({:?})", self.raw)
    }
}

impl fmt::Display for LogicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for LogicalName {
    fn from(value: String) -> Self {
        LogicalName::new(value)
    }
}

impl From<&str> for LogicalName {
    fn from(value: &str) -> Self {
        LogicalName::new(value)
    }
}

impl From<LogicalName> for String {
    fn from(value: LogicalName) -> Self {
        value.raw
    }
}

impl JsonSchema for LogicalName {
    fn schema_name() -> Cow<'static, str> {
        "LogicalName".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators_and_case() {
        assert_eq!(
            normalize_template_name(" @App\\\\Default//Index.html.twig "),
            "@app/default/index.html.twig"
        );
        assert_eq!(
            normalize_template_name("FooBundle::Bar:baz.html.twig"),
            "foobundle:bar:baz.html.twig"
        );
        let normalized = normalize_template_name("./base.html.twig");
        assert_eq!(normalized, "base.html.twig");
    }

    #[test]
    fn test_equality_uses_normalized_key() {
        let a = LogicalName::new("@App/Base.html.twig");
        let b = LogicalName::new("@app\\base.html.twig");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "@App/Base.html.twig");
        assert!(a.matches("@APP/base.html.twig"));
    }

    #[test]
    fn test_bundle_style() {
        assert!(LogicalName::new("@App/base.html.twig").is_bundle_style());
        assert!(LogicalName::new("FooBundle:Bar:x.twig").is_bundle_style());
        assert!(!LogicalName::new("base.html.twig").is_bundle_style());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let name: LogicalName = serde_json::from_str("\"@App/x.html.twig\"").unwrap();
        assert_eq!(name.key(), "@app/x.html.twig");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"@App/x.html.twig\"");
    }
}
