//! Fetching of the Dhall dependency repositories
//!
//! Each configured repository is cloned into `<dir>/<name>`, or pulled when
//! that directory already exists.

use tracing::info;

use homectl_core::DependencyConfig;

use crate::report::{Operation, OperationReport, ResourceOutcome};
use crate::tools::GitClient;

/// Clone or update every configured dependency
pub fn sync_dependencies(git: &dyn GitClient, config: &DependencyConfig) -> OperationReport {
    let target = config.dir.display().to_string();

    if let Err(e) = std::fs::create_dir_all(&config.dir) {
        return OperationReport::rejected(
            target,
            Operation::Init,
            format!("could not create {}: {}", config.dir.display(), e),
        );
    }

    let mut report = OperationReport::new(target, Operation::Init);
    report.start();

    if config.repositories.is_empty() {
        report.warn("no dependencies configured");
    }

    for repo in &config.repositories {
        let dest = config.dir.join(&repo.name);
        let result = if dest.is_dir() {
            info!(name = %repo.name, "updating dependency");
            git.pull(&dest)
        } else {
            info!(name = %repo.name, url = %repo.url, "cloning dependency");
            git.clone_repo(&repo.url, &dest)
        };

        report.record(match result {
            Ok(output) => ResourceOutcome::succeeded(&repo.name)
                .with_output(dest)
                .with_detail(output.stdout),
            Err(e) => ResourceOutcome::failed(&repo.name, e.diagnostic()),
        });
    }

    report.finish()
}
