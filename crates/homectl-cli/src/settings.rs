//! Tool configuration with command-line overrides

use clap::Args;
use std::path::PathBuf;

use homectl_core::ToolConfig;

use crate::error::{CliError, Result};

/// Global options overriding the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Configuration file (defaults to ~/.config/homectl/config.yaml)
    #[arg(long, global = true, env = "HOMECTL_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// dhall-to-yaml binary
    #[arg(long, global = true, env = "HOMECTL_DHALL_TO_YAML", value_name = "PATH")]
    pub dhall_to_yaml: Option<String>,

    /// kubectl binary
    #[arg(long, global = true, env = "HOMECTL_KUBECTL", value_name = "PATH")]
    pub kubectl: Option<String>,

    /// helm binary
    #[arg(long, global = true, env = "HOMECTL_HELM", value_name = "PATH")]
    pub helm: Option<String>,

    /// git binary
    #[arg(long, global = true, env = "HOMECTL_GIT", value_name = "PATH")]
    pub git: Option<String>,

    /// Directory holding the per-type Dhall generators
    #[arg(long, global = true, env = "HOMECTL_TEMPLATES_DIR", value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,
}

impl Overrides {
    /// Replace configured values with the ones given on the command line
    pub fn apply(&self, mut config: ToolConfig) -> ToolConfig {
        let tools = &mut config.tools;
        for (value, slot) in [
            (&self.dhall_to_yaml, &mut tools.dhall_to_yaml),
            (&self.kubectl, &mut tools.kubectl),
            (&self.helm, &mut tools.helm),
            (&self.git, &mut tools.git),
        ] {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }

        if let Some(dir) = &self.templates_dir {
            config.templates.dhall_dir.clone_from(dir);
        }

        config
    }
}

/// Load the configuration and apply the overrides
pub fn load(overrides: &Overrides) -> Result<ToolConfig> {
    let config = ToolConfig::load(overrides.config.as_deref()).map_err(|e| {
        CliError::config_with_help(
            e.to_string(),
            "Pass --config <FILE> or set HOMECTL_CONFIG to a readable YAML file",
        )
    })?;
    Ok(overrides.apply(config))
}
