use super::template::Span;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// A controller action (method or function) that renders templates.
///
/// Two actions are the same action when their `id` matches, wherever they were found.
#[derive(Serialize, Deserialize, Debug, Clone, JsonSchema)]
pub struct ControllerAction {
    /// e.g. `App\Controller\DefaultController::indexAction`
    pub id: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub span: Option<Span>,
}

impl ControllerAction {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: None,
            span: None,
        }
    }

    /// The method part of the id (`indexAction` for `Foo::indexAction`).
    pub fn method_name(&self) -> &str {
        self.id.rsplit("::").next().unwrap_or(&self.id)
    }
}

impl PartialEq for ControllerAction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ControllerAction {}

impl Hash for ControllerAction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ControllerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Controller coordinates derived from a template name by a naming convention.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct ControllerActionRef {
    #[serde(default)]
    pub bundle: Option<String>,
    /// Controller class short name, e.g. `DefaultController`.
    pub controller: String,
    /// Action method name, e.g. `indexAction`.
    pub action: String,
}

impl fmt::Display for ControllerActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bundle {
            Some(bundle) => write!(f, "{}:{}::{}", bundle, self.controller, self.action),
            None => write!(f, "{}::{}", self.controller, self.action),
        }
    }
}
