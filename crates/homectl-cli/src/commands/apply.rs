//! Apply command - apply manifests and install charts

use std::path::PathBuf;

use homectl_core::ToolConfig;
use homectl_kube::{Helm, Kubectl, Lifecycle, Operation};

use crate::commands::run_services;
use crate::error::Result;

/// Run the apply command
pub fn run(config: &ToolConfig, services: &[PathBuf]) -> Result<()> {
    let kubectl = Kubectl::new(&config.tools.kubectl);
    let helm = Helm::new(&config.tools.helm);
    let lifecycle = Lifecycle::new(&kubectl, &helm);

    run_services(services, Operation::Apply, |service| lifecycle.apply(service))
}
