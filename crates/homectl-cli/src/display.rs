//! Display formatting for CLI output
//!
//! Progress and outcomes go to stdout, diagnostics and warnings to stderr.

use console::style;
use std::path::Path;

use homectl_kube::{Operation, OperationReport, ResourceOutcome};

fn verb(operation: Operation) -> &'static str {
    match operation {
        Operation::Generate => "Generating",
        Operation::Apply => "Applying",
        Operation::Delete => "Deleting",
        Operation::Init => "Fetching dependencies into",
    }
}

/// Announce an operation on a service or directory
pub fn header(operation: Operation, target: &Path) {
    println!(
        "{} {} {}",
        style("→").blue().bold(),
        verb(operation),
        style(target.display()).cyan()
    );
}

/// Print every outcome and warning of a report, then its summary
pub fn report(report: &OperationReport) {
    for warning in &report.warnings {
        warn(warning);
    }

    for outcome in &report.outcomes {
        if outcome.is_success() {
            succeeded(outcome);
        } else {
            failed(outcome);
        }
    }

    let mark = if report.is_success() {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    println!(
        "{} {} {}: {}",
        mark,
        report.operation,
        style(&report.target).cyan(),
        report.summary()
    );
}

/// Final line for a batch of services
pub fn totals(reports: &[OperationReport]) {
    if reports.len() < 2 {
        return;
    }

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    println!();
    if failed == 0 {
        println!(
            "{} All {} services succeeded",
            style("✓").green().bold(),
            reports.len()
        );
    } else {
        println!(
            "{} {} of {} services failed",
            style("✗").red().bold(),
            failed,
            reports.len()
        );
    }
}

fn succeeded(outcome: &ResourceOutcome) {
    match &outcome.output {
        Some(path) => println!(
            "  {} {} {}",
            style("✓").green(),
            outcome.name,
            style(format!("→ {}", path.display())).dim()
        ),
        None => println!("  {} {}", style("✓").green(), outcome.name),
    }

    for object in &outcome.objects {
        println!("      {}", style(object).dim());
    }
    if let Some(detail) = &outcome.detail {
        for line in detail.lines() {
            println!("      {}", style(line).dim());
        }
    }
    for warning in &outcome.warnings {
        warn(warning);
    }
}

fn failed(outcome: &ResourceOutcome) {
    println!("  {} {}", style("✗").red(), outcome.name);
    if let Some(diagnostic) = &outcome.diagnostic {
        for line in diagnostic.lines() {
            eprintln!("      {}", style(line).red());
        }
    }
    for warning in &outcome.warnings {
        warn(warning);
    }
}

fn warn(message: &str) {
    eprintln!("  {} {}", style("⚠").yellow(), message);
}
