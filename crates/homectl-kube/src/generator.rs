//! Resource set processing for `homectl generate`
//!
//! Every declared resource is classified, rendered through the engine,
//! compiled and written to `<service>/output/<resource>.<ext>`. A failing
//! resource is reported and the rest are still attempted.

use std::path::Path;
use tracing::{debug, info, warn};

use homectl_core::{DhallConfig, ResourceName, Service};
use homectl_engine::{Engine, RenderRequest, SecretSource};

use crate::error::Result;
use crate::manifest;
use crate::report::{Operation, OperationReport, ResourceOutcome};
use crate::tools::ManifestCompiler;

/// Renders and compiles the resources of a service
pub struct Generator<'a> {
    engine: &'a Engine,
    compiler: &'a dyn ManifestCompiler,
}

impl<'a> Generator<'a> {
    pub fn new(engine: &'a Engine, compiler: &'a dyn ManifestCompiler) -> Self {
        Self { engine, compiler }
    }

    /// Generate manifests for one service
    ///
    /// With `include_secrets` the resources named in `dhall.secrets` are
    /// processed (prompting through `secrets`), otherwise those in
    /// `dhall.resources`.
    pub fn generate(
        &self,
        service: &Service,
        include_secrets: bool,
        secrets: &mut dyn SecretSource,
    ) -> OperationReport {
        let mut report = OperationReport::new(service.name(), Operation::Generate);
        report.start();

        let Some(dhall) = service.dhall() else {
            report.warn(format!("no dhall configuration in {}", service.name()));
            return report.finish();
        };

        let names: Vec<&str> = if include_secrets {
            dhall.secret_resources().collect()
        } else {
            dhall.resources().iter().map(String::as_str).collect()
        };

        if names.is_empty() {
            let what = if include_secrets { "secrets" } else { "resources" };
            warn!(service = %service.name(), "no {} specified", what);
            report.warn(format!("no {} specified for {}", what, service.name()));
            return report.finish();
        }

        let values = service.resolve(dhall.source());
        for name in names {
            let outcome =
                match self.generate_resource(service, dhall, &values, name, include_secrets, secrets)
                {
                    Ok(outcome) => {
                        info!(resource = name, "generated");
                        outcome
                    }
                    Err(e) => {
                        warn!(resource = name, error = %e, "generation failed");
                        ResourceOutcome::failed(name, e.diagnostic())
                    }
                };
            report.record(outcome);
        }

        report.finish()
    }

    fn generate_resource(
        &self,
        service: &Service,
        dhall: &DhallConfig,
        values: &Path,
        name: &str,
        include_secrets: bool,
        secrets: &mut dyn SecretSource,
    ) -> Result<ResourceOutcome> {
        let resource = ResourceName::parse(name)?;
        debug!(
            resource = name,
            kind = resource.kind(),
            instance = resource.instance(),
            "classified resource"
        );
        let mut warnings = Vec::new();

        let pairs = if include_secrets {
            let keys = dhall.secret_keys(name);
            if keys.is_empty() {
                warnings.push(format!("no secret keys declared for {}", name));
                Vec::new()
            } else {
                secrets.resolve(name, keys)?
            }
        } else {
            Vec::new()
        };

        let source = self.engine.render(&RenderRequest {
            resource_type: resource.kind(),
            values,
            resource: resource.as_str(),
            secrets: &pairs,
        })?;
        let compiled = self.compiler.compile(&source)?;

        std::fs::create_dir_all(service.output_dir())?;
        let path = service.output_file(resource.as_str(), self.compiler.extension());
        std::fs::write(&path, &compiled)?;
        debug!(path = %path.display(), bytes = compiled.len(), "wrote manifest");

        let objects = match manifest::summarize(&compiled) {
            Ok(objects) => objects,
            Err(e) => {
                warnings.push(format!("could not read back {}: {}", path.display(), e));
                Vec::new()
            }
        };

        Ok(ResourceOutcome::succeeded(name)
            .with_output(path)
            .with_objects(objects)
            .with_warnings(warnings))
    }
}
