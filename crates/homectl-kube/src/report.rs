//! Per-resource outcomes and per-operation reports
//!
//! Failures never abort a batch. Each resource (or each manifest set and
//! chart release) ends up as one [`ResourceOutcome`], and an
//! [`OperationReport`] combines them with a logical AND.

use std::fmt;
use std::path::PathBuf;

/// Operations run against a service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Apply,
    Delete,
    Init,
}

impl Operation {
    fn running_state(self) -> OperationState {
        match self {
            Operation::Generate => OperationState::Generating,
            Operation::Apply => OperationState::Applying,
            Operation::Delete => OperationState::Deleting,
            Operation::Init => OperationState::Fetching,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Generate => "generate",
            Operation::Apply => "apply",
            Operation::Delete => "delete",
            Operation::Init => "init",
        })
    }
}

/// `Unstarted -> Generating | Applying | Deleting -> Succeeded | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Unstarted,
    Generating,
    Applying,
    Deleting,
    Fetching,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
}

/// Result of processing one resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceOutcome {
    /// Resource, service or release name
    pub name: String,

    pub status: OutcomeStatus,

    /// Captured error text on failure
    pub diagnostic: Option<String>,

    /// Tool output on success
    pub detail: Option<String>,

    /// File written for this resource
    pub output: Option<PathBuf>,

    /// `Kind/name` of the objects in the written manifest
    pub objects: Vec<String>,

    pub warnings: Vec<String>,
}

impl ResourceOutcome {
    pub fn succeeded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: OutcomeStatus::Succeeded,
            diagnostic: None,
            detail: None,
            output: None,
            objects: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn failed(name: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Failed,
            diagnostic: Some(diagnostic.into()),
            ..Self::succeeded(name)
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if !detail.trim().is_empty() {
            self.detail = Some(detail);
        }
        self
    }

    pub fn with_output(mut self, path: PathBuf) -> Self {
        self.output = Some(path);
        self
    }

    pub fn with_objects(mut self, objects: Vec<String>) -> Self {
        self.objects = objects;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

/// Outcome of one operation against one service
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport {
    /// Service directory or dependency directory
    pub target: String,

    pub operation: Operation,

    pub state: OperationState,

    pub outcomes: Vec<ResourceOutcome>,

    /// Warnings that do not fail the operation
    pub warnings: Vec<String>,
}

impl OperationReport {
    pub fn new(target: impl Into<String>, operation: Operation) -> Self {
        Self {
            target: target.into(),
            operation,
            state: OperationState::Unstarted,
            outcomes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Report for a service that could not even be loaded
    pub fn rejected(
        target: impl Into<String>,
        operation: Operation,
        diagnostic: impl Into<String>,
    ) -> Self {
        let target = target.into();
        let mut report = Self::new(target.clone(), operation);
        report.start();
        report.record(ResourceOutcome::failed(target, diagnostic));
        report.finish()
    }

    pub fn start(&mut self) {
        if self.state == OperationState::Unstarted {
            self.state = self.operation.running_state();
        }
    }

    pub fn record(&mut self, outcome: ResourceOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Settle the state from the recorded outcomes
    pub fn finish(mut self) -> Self {
        self.state = if self.outcomes.iter().all(ResourceOutcome::is_success) {
            OperationState::Succeeded
        } else {
            OperationState::Failed
        };
        self
    }

    pub fn is_success(&self) -> bool {
        self.state == OperationState::Succeeded
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Format as human-readable summary
    pub fn summary(&self) -> String {
        let succeeded = self.succeeded().count();
        let failed = self.failed().count();

        let mut parts = Vec::with_capacity(2);
        if succeeded > 0 {
            parts.push(format!("{} succeeded", succeeded));
        }
        if failed > 0 {
            parts.push(format!("{} failed", failed));
        }
        if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(", ")
        }
    }
}
