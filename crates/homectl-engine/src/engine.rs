//! Template engine based on MiniJinja

use minijinja::Environment;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{EngineError, Result, TemplateError};
use crate::filters;
use crate::secrets::SecretPair;

/// Name of the built-in resource template
pub const RESOURCE_TEMPLATE_NAME: &str = "resource_creation.dhall.j2";

const BUILTIN_RESOURCE_TEMPLATE: &str = include_str!("templates/resource_creation.dhall.j2");

/// Variables available to resource templates
pub const CONTEXT_VARIABLES: &[&str] = &["values", "templates", "resource", "resource_type", "secrets"];

/// Inputs for rendering one resource
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Classified resource type, selects `<templates>/<type>.dhall`
    pub resource_type: &'a str,

    /// Values source of the service
    pub values: &'a Path,

    /// Full resource name, selects the record inside the values
    pub resource: &'a str,

    /// Secret overrides, in declaration order
    pub secrets: &'a [SecretPair],
}

/// Template engine builder
pub struct EngineBuilder {
    template_name: String,
    template_source: String,
    templates_dir: PathBuf,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            template_name: RESOURCE_TEMPLATE_NAME.to_string(),
            template_source: BUILTIN_RESOURCE_TEMPLATE.to_string(),
            templates_dir: PathBuf::from("dhall/templates"),
        }
    }

    /// Directory holding the per-type Dhall generators
    pub fn templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    /// Replace the resource template with inline source
    pub fn template_source(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.template_name = name.into();
        self.template_source = source.into();
        self
    }

    /// Replace the resource template with the contents of a file
    pub fn template_file(self, path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| EngineError::TemplateFile {
            path: path.display().to_string(),
            source,
        })?;
        debug!(template = %path.display(), "using resource template override");
        Ok(self.template_source(path.display().to_string(), source))
    }

    /// Build the engine
    pub fn build(self) -> Engine {
        Engine {
            template_name: self.template_name,
            template_source: self.template_source,
            templates_dir: self.templates_dir,
        }
    }
}

/// The template engine
#[derive(Debug, Clone)]
pub struct Engine {
    template_name: String,
    template_source: String,
    templates_dir: PathBuf,
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::new().build()
    }
}

impl Engine {
    /// Create a builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Create a configured MiniJinja environment
    fn create_environment(&self) -> Environment<'static> {
        let mut env = Environment::new();

        // Undefined variables are errors, never empty Dhall fragments
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);

        env.add_filter("dhall_text", filters::dhall_text);
        env.add_filter("dhall_label", filters::dhall_label);

        env
    }

    /// Render the resource template into Dhall source
    ///
    /// Rendering has no side effects: identical requests give identical output.
    pub fn render(&self, request: &RenderRequest<'_>) -> Result<String> {
        self.render_string(&self.template_source, request, &self.template_name)
    }

    /// Render an arbitrary template string with the resource context
    pub fn render_string(
        &self,
        template: &str,
        request: &RenderRequest<'_>,
        template_name: &str,
    ) -> Result<String> {
        let mut env = self.create_environment();

        env.add_template_owned(template_name.to_string(), template.to_string())
            .map_err(|e| {
                EngineError::Template(TemplateError::from_minijinja(e, template_name, template))
            })?;

        let tmpl = env.get_template(template_name).map_err(|e| {
            EngineError::Template(TemplateError::from_minijinja(e, template_name, template))
        })?;

        let ctx = minijinja::context! {
            values => dhall_import_path(request.values),
            templates => dhall_import_path(&self.templates_dir),
            resource => request.resource,
            resource_type => request.resource_type,
            secrets => request.secrets,
        };

        tmpl.render(ctx).map_err(|e| {
            EngineError::Template(TemplateError::from_minijinja(e, template_name, template))
        })
    }
}

/// Format a filesystem path as a Dhall import
///
/// Dhall only treats a bare path as an import when it starts with `./`,
/// `../`, `~/` or `/`.
pub fn dhall_import_path(path: &Path) -> String {
    let display = path.display().to_string();
    if path.is_absolute()
        || display.starts_with("./")
        || display.starts_with("../")
        || display.starts_with("~/")
    {
        display
    } else {
        format!("./{}", display)
    }
}
