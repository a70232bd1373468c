//! CLI command implementations

pub mod apply;
pub mod delete;
pub mod generate;
pub mod init;

use std::path::PathBuf;
use tracing::debug;

use homectl_core::Service;
use homectl_kube::{Operation, OperationReport};

use crate::display;
use crate::error::{CliError, Result};

/// Run one operation over every service, in argument order
///
/// A service that cannot be loaded is reported as failed and the batch
/// continues.
pub fn run_services<F>(services: &[PathBuf], operation: Operation, mut run: F) -> Result<()>
where
    F: FnMut(&Service) -> OperationReport,
{
    let mut reports = Vec::with_capacity(services.len());

    for path in services {
        display::header(operation, path);
        let report = match Service::load(path) {
            Ok(service) => run(&service),
            Err(e) => {
                debug!(service = %path.display(), error = %e, "could not load service");
                OperationReport::rejected(path.display().to_string(), operation, e.to_string())
            }
        };
        display::report(&report);
        reports.push(report);
    }

    finish(&reports)
}

/// Print totals and turn any failure into an error
pub fn finish(reports: &[OperationReport]) -> Result<()> {
    display::totals(reports);

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        return Err(CliError::operation_failed(failed, reports.len()));
    }
    Ok(())
}
