//! Init command - fetch the Dhall dependency repositories

use std::path::Path;

use homectl_core::ToolConfig;
use homectl_kube::{Git, Operation, sync_dependencies};

use crate::commands::finish;
use crate::display;
use crate::error::Result;

/// Run the init command
pub fn run(config: &ToolConfig, dir: Option<&Path>) -> Result<()> {
    let mut dependencies = config.dependencies.clone();
    if let Some(dir) = dir {
        dependencies.dir = dir.to_path_buf();
    }

    let git = Git::new(&config.tools.git);

    display::header(Operation::Init, &dependencies.dir);
    let report = sync_dependencies(&git, &dependencies);
    display::report(&report);

    finish(std::slice::from_ref(&report))
}
