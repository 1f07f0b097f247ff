use crate::engine::ResolutionPass;
use crate::error::Result;
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use twigscope_api::{
    ControllerAction, ControllerActionRef, ControllerNamingConvention, LogicalName, Template,
};

/// `@FooBundle/Bar/baz.html.twig`, `@Foo/Admin/Bar/baz.html.twig`
static NAMESPACED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@(?P<bundle>\w+)/(?P<dirs>.+)/(?P<file>[^/]+)$")
        .expect("valid namespaced template regex")
});

/// `FooBundle:Bar:baz.html.twig`, `FooBundle:Admin/Bar:baz.html.twig`
static BUNDLE_NOTATION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<bundle>\w+Bundle):(?P<dirs>[^:]+):(?P<file>[^:/]+)$")
        .expect("valid bundle notation regex")
});

/// Symfony's implicit mapping from a bundle template to its controller action,
/// `<Bundle>\Controller\<Dir>Controller::<file>Action`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymfonyControllerConvention;

impl SymfonyControllerConvention {
    fn to_ref(bundle: &str, dirs: &str, file: &str) -> Option<ControllerActionRef> {
        let action = file.split('.').next().filter(|stem| !stem.is_empty())?;
        let controller = dirs
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("\\");
        if controller.is_empty() {
            return None;
        }

        let bundle = if bundle.ends_with("Bundle") {
            bundle.to_string()
        } else {
            format!("{bundle}Bundle")
        };

        Some(ControllerActionRef {
            bundle: Some(bundle),
            controller: format!("{controller}Controller"),
            action: format!("{action}Action"),
        })
    }
}

impl ControllerNamingConvention for SymfonyControllerConvention {
    fn controller_for_template(&self, name: &LogicalName) -> Option<ControllerActionRef> {
        let written = name.as_str().trim().replace('\\', "/");

        if let Some(caps) = NAMESPACED_NAME.captures(&written) {
            return Self::to_ref(&caps["bundle"], &caps["dirs"], &caps["file"]);
        }
        if let Some(caps) = BUNDLE_NOTATION_NAME.captures(&written) {
            return Self::to_ref(&caps["bundle"], &caps["dirs"], &caps["file"]);
        }
        None
    }
}

/// Controller actions rendering `template`: those the naming conventions point at,
/// followed by those the controller index knows about.
pub fn find_controller_usages(
    pass: &ResolutionPass<'_>,
    template: &Template,
) -> Result<IndexSet<ControllerAction>> {
    let collaborators = pass.collaborators();
    let mut actions = IndexSet::new();

    if pass.config().implicit_controllers {
        for name in pass.logical_names(template)? {
            for convention in &collaborators.conventions {
                pass.checkpoint()?;
                let Some(reference) = convention.controller_for_template(&name) else {
                    continue;
                };
                if let Some(action) = collaborators.controllers.find_action(&reference)? {
                    actions.insert(action);
                }
            }
        }
    }

    pass.checkpoint()?;
    actions.extend(
        collaborators
            .controllers
            .lookup_controllers_for_template(template)?,
    );
    Ok(actions)
}
