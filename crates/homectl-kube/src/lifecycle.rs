//! Apply and delete of generated manifests and chart releases
//!
//! Both steps of an operation always run, even when the first fails; the
//! operation succeeds only when both did. Deletion removes the chart release
//! before the manifests.

use tracing::{info, warn};

use homectl_core::Service;
use homectl_core::service::{LEGACY_OUTPUT_FILE, OUTPUT_DIR};

use crate::actions::{ChartRelease, ManifestTarget};
use crate::error::Result;
use crate::report::{Operation, OperationReport, ResourceOutcome};
use crate::tools::{ChartManager, ClusterClient, ToolOutput};

/// Drives the cluster and chart tools for a service
pub struct Lifecycle<'a> {
    cluster: &'a dyn ClusterClient,
    charts: &'a dyn ChartManager,
}

impl<'a> Lifecycle<'a> {
    pub fn new(cluster: &'a dyn ClusterClient, charts: &'a dyn ChartManager) -> Self {
        Self { cluster, charts }
    }

    /// Apply the generated manifests, then install the chart
    pub fn apply(&self, service: &Service) -> OperationReport {
        let mut report = OperationReport::new(service.name(), Operation::Apply);
        report.start();
        warn_if_empty(service, &mut report);

        if service.dhall().is_some() {
            let outcome = self.manifests(service, &mut report, |target| self.cluster.apply(target));
            report.record(outcome);
        }

        if let Some(config) = service.chart() {
            let release = ChartRelease::from_service(service, config);
            info!(release = %release.name, chart = %release.chart, "installing chart");
            report.record(outcome(&release.name, self.charts.install(&release)));
        }

        report.finish()
    }

    /// Delete the chart release, then the generated manifests
    pub fn delete(&self, service: &Service) -> OperationReport {
        let mut report = OperationReport::new(service.name(), Operation::Delete);
        report.start();
        warn_if_empty(service, &mut report);

        if let Some(config) = service.chart() {
            let release = ChartRelease::from_service(service, config);
            info!(release = %release.name, "deleting chart release");
            report.record(outcome(&release.name, self.charts.delete(&release)));
        }

        if service.dhall().is_some() {
            let outcome = self.manifests(service, &mut report, |target| self.cluster.delete(target));
            report.record(outcome);
        }

        report.finish()
    }

    fn manifests<F>(&self, service: &Service, report: &mut OperationReport, run: F) -> ResourceOutcome
    where
        F: FnOnce(&std::path::Path) -> Result<ToolOutput>,
    {
        let target = match ManifestTarget::locate(service) {
            Ok(target) => target,
            Err(e) => {
                return ResourceOutcome::failed(service.output_dir().display().to_string(), e.diagnostic());
            }
        };

        if target.is_legacy() {
            warn!(
                "{} uses the deprecated {}; run `homectl generate` to write {}/",
                service.name(),
                LEGACY_OUTPUT_FILE,
                OUTPUT_DIR
            );
            report.warn(format!(
                "using deprecated {}; regenerate to write {}/",
                target.path().display(),
                OUTPUT_DIR
            ));
        }

        info!(target = %target.path().display(), "running kubectl");
        outcome(&target.path().display().to_string(), run(target.path()))
    }
}

fn warn_if_empty(service: &Service, report: &mut OperationReport) {
    if service.dhall().is_none() && service.chart().is_none() {
        warn!(service = %service.name(), "nothing to do");
        report.warn(format!("{} declares neither dhall nor helm", service.name()));
    }
}

fn outcome(name: &str, result: Result<ToolOutput>) -> ResourceOutcome {
    match result {
        Ok(output) => ResourceOutcome::succeeded(name).with_detail(output.stdout),
        Err(e) => ResourceOutcome::failed(name, e.diagnostic()),
    }
}
