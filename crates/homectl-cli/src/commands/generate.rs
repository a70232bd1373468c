//! Generate command - render and compile the declared resources

use std::path::{Path, PathBuf};

use homectl_core::ToolConfig;
use homectl_engine::{Engine, PromptSecretSource, SecretSource, StaticSecretSource};
use homectl_kube::{DhallToYaml, Generator, Operation};

use crate::commands::run_services;
use crate::error::Result;
use crate::prompt::HiddenPrompt;

/// Run the generate command
pub fn run(
    config: &ToolConfig,
    services: &[PathBuf],
    include_secrets: bool,
    hide_input: bool,
    template: Option<&Path>,
) -> Result<()> {
    let engine = build_engine(config, template)?;
    let compiler = DhallToYaml::new(&config.tools.dhall_to_yaml, config.tools.compiler_flags.clone());
    let generator = Generator::new(&engine, &compiler);

    let mut secrets: Box<dyn SecretSource> = match (include_secrets, hide_input) {
        (false, _) => Box::new(StaticSecretSource::default()),
        (true, false) => Box::new(PromptSecretSource::stdin()),
        (true, true) => Box::new(HiddenPrompt),
    };

    run_services(services, Operation::Generate, |service| {
        generator.generate(service, include_secrets, secrets.as_mut())
    })
}

fn build_engine(config: &ToolConfig, template: Option<&Path>) -> Result<Engine> {
    let mut builder = Engine::builder().templates_dir(&config.templates.dhall_dir);

    if let Some(path) = template.or(config.templates.resource.as_deref()) {
        builder = builder.template_file(path)?;
    }

    Ok(builder.build())
}
