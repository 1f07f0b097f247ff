use super::name::LogicalName;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Byte range `[start, end)` inside a template's content.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
    JsonSchema,
)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A template file, identified by its canonical path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
pub struct Template {
    pub path: PathBuf,
}

impl Template {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// One entry of the template namespace: `name` resolves to `template`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceEntry {
    pub name: LogicalName,
    pub template: Template,
}

impl NamespaceEntry {
    pub fn new(name: impl Into<LogicalName>, template: Template) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InclusionKind {
    Include,
    Embed,
    Extends,
    Import,
    From,
    Source,
}

impl InclusionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InclusionKind::Include => "include",
            InclusionKind::Embed => "embed",
            InclusionKind::Extends => "extends",
            InclusionKind::Import => "import",
            InclusionKind::From => "from",
            InclusionKind::Source => "source",
        }
    }
}

impl fmt::Display for InclusionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusion construct as reported by a content scanner.
///
/// `target` is `None` when the construct does not name a template literally
/// (e.g. `{% include some_variable %}`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct RawInclusion {
    pub kind: InclusionKind,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub span: Span,
}

impl RawInclusion {
    pub fn new(kind: InclusionKind, target: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            target: Some(target.into()),
            span,
        }
    }

    pub fn into_construct(self) -> Option<InclusionConstruct> {
        let target = LogicalName::new(self.target?);
        if target.is_empty() {
            return None;
        }
        Some(InclusionConstruct {
            kind: self.kind,
            target,
            span: self.span,
        })
    }
}

/// A well-formed reference from one template to another by logical name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InclusionConstruct {
    pub kind: InclusionKind,
    pub target: LogicalName,
    pub span: Span,
}

/// A named block inside a template.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
pub struct Block {
    pub template: Template,
    pub name: String,
    pub span: Span,
}

impl Block {
    pub fn new(template: Template, name: impl Into<String>, span: Span) -> Self {
        Self {
            template,
            name: name.into(),
            span,
        }
    }
}
