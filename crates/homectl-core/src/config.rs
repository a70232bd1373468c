//! Tool configuration
//!
//! Stored in `~/.config/homectl/config.yaml` unless a path is given
//! explicitly. Every field has a default, so the file is optional:
//!
//! ```yaml
//! tools:
//!   dhallToYaml: /opt/dhall/bin/dhall-to-yaml
//!   kubectl: kubectl
//! templates:
//!   dhallDir: dhall/templates
//! dependencies:
//!   dir: dhall/dependencies
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    /// External programs
    #[serde(default)]
    pub tools: ToolPaths,

    /// Rendering templates
    #[serde(default)]
    pub templates: TemplateConfig,

    /// Dhall dependency repositories fetched by `init`
    #[serde(default)]
    pub dependencies: DependencyConfig,
}

impl ToolConfig {
    /// Load configuration from an explicit path, or the default location
    ///
    /// An explicit path must exist. The default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CoreError::InvalidConfig {
                    message: format!("config file {} does not exist", path.display()),
                });
            }
            return Self::load_from(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Default configuration path, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("homectl").join("config.yaml"))
    }
}

/// Locations and flags of the external programs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolPaths {
    pub dhall_to_yaml: String,
    pub kubectl: String,
    pub helm: String,
    pub git: String,

    /// Flags passed to the manifest compiler
    pub compiler_flags: Vec<String>,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            dhall_to_yaml: "dhall-to-yaml".to_string(),
            kubectl: "kubectl".to_string(),
            helm: "helm".to_string(),
            git: "git".to_string(),
            compiler_flags: vec!["--omit-empty".to_string(), "--documents".to_string()],
        }
    }
}

/// Template settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateConfig {
    /// Replacement for the built-in resource template
    pub resource: Option<PathBuf>,

    /// Directory holding one `<type>.dhall` generator per resource type
    pub dhall_dir: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            resource: None,
            dhall_dir: PathBuf::from("dhall/templates"),
        }
    }
}

/// Dependency bootstrap settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyConfig {
    /// Checkout directory
    pub dir: PathBuf,

    pub repositories: Vec<Repository>,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dhall/dependencies"),
            repositories: vec![
                Repository::new(
                    "dhall-kubernetes",
                    "https://github.com/dhall-lang/dhall-kubernetes.git",
                ),
                Repository::new("prelude", "https://github.com/dhall-lang/dhall-lang.git"),
            ],
        }
    }
}

/// A git repository checked out under the dependency directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub name: String,
    pub url: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
