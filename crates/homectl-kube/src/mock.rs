//! Recording tool doubles for testing
//!
//! These stand in for `dhall-to-yaml`, `kubectl`, `helm` and `git` so the
//! generate and lifecycle flows can be exercised without any of them
//! installed. Doubles can share one [`CallLog`] to assert on call order
//! across tools.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::actions::ChartRelease;
use crate::error::{KubeError, Result};
use crate::tools::{ChartManager, ClusterClient, GitClient, ManifestCompiler, ToolOutput};

/// Ordered record of tool invocations
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<RwLock<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: impl Into<String>) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.into());
    }

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn failure(program: &str, stderr: String) -> KubeError {
    KubeError::ToolFailed {
        program: program.to_string(),
        status: Some(1),
        stderr,
    }
}

/// Compiler double: echoes its input, or a canned manifest
#[derive(Debug, Clone, Default)]
pub struct MockCompiler {
    output: Option<String>,
    fail_marker: Option<String>,
    sources: Arc<RwLock<Vec<String>>>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `manifest` for every successful compile
    pub fn with_output(mut self, manifest: impl Into<String>) -> Self {
        self.output = Some(manifest.into());
        self
    }

    /// Fail any source containing `marker`
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_marker = Some(marker.into());
        self
    }

    /// Sources handed to the compiler, in order
    pub fn sources(&self) -> Vec<String> {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ManifestCompiler for MockCompiler {
    fn compile(&self, source: &str) -> Result<String> {
        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(source.to_string());

        if let Some(marker) = &self.fail_marker {
            if source.contains(marker.as_str()) {
                return Err(failure(
                    "dhall-to-yaml",
                    format!("Error: Missing record field: {}\n", marker),
                ));
            }
        }

        Ok(self.output.clone().unwrap_or_else(|| source.to_string()))
    }

    fn extension(&self) -> &str {
        "yaml"
    }
}

/// Cluster double recording `kubectl apply|delete <path>`
#[derive(Debug, Clone, Default)]
pub struct MockCluster {
    log: CallLog,
    fail_apply: bool,
    fail_delete: bool,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn failing_apply(mut self) -> Self {
        self.fail_apply = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    fn run(&self, verb: &str, target: &Path, fail: bool) -> Result<ToolOutput> {
        self.log
            .record(format!("kubectl {} {}", verb, target.display()));
        if fail {
            return Err(failure(
                "kubectl",
                format!("error: unable to {} {}\n", verb, target.display()),
            ));
        }
        Ok(ToolOutput {
            stdout: format!("{} {}\n", verb, target.display()),
            stderr: String::new(),
        })
    }
}

impl ClusterClient for MockCluster {
    fn apply(&self, target: &Path) -> Result<ToolOutput> {
        self.run("apply", target, self.fail_apply)
    }

    fn delete(&self, target: &Path) -> Result<ToolOutput> {
        self.run("delete", target, self.fail_delete)
    }
}

/// Chart double recording `helm install|delete <release>`
#[derive(Debug, Clone, Default)]
pub struct MockCharts {
    log: CallLog,
    fail_install: bool,
    fail_delete: bool,
}

impl MockCharts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn failing_install(mut self) -> Self {
        self.fail_install = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    fn run(&self, verb: &str, release: &ChartRelease, fail: bool) -> Result<ToolOutput> {
        self.log.record(format!("helm {} {}", verb, release.name));
        if fail {
            return Err(failure(
                "helm",
                format!("Error: release {} failed\n", release.name),
            ));
        }
        Ok(ToolOutput {
            stdout: format!("release \"{}\" {}\n", release.name, verb),
            stderr: String::new(),
        })
    }
}

impl ChartManager for MockCharts {
    fn install(&self, release: &ChartRelease) -> Result<ToolOutput> {
        self.run("install", release, self.fail_install)
    }

    fn delete(&self, release: &ChartRelease) -> Result<ToolOutput> {
        self.run("delete", release, self.fail_delete)
    }
}

/// Git double; clones create the destination directory
#[derive(Debug, Clone, Default)]
pub struct MockGit {
    log: CallLog,
    fail_url: Option<String>,
}

impl MockGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Fail clones of `url`
    pub fn failing_on(mut self, url: impl Into<String>) -> Self {
        self.fail_url = Some(url.into());
        self
    }
}

impl GitClient for MockGit {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<ToolOutput> {
        self.log.record(format!("git clone {} {}", url, dest.display()));
        if self.fail_url.as_deref() == Some(url) {
            return Err(failure(
                "git",
                format!("fatal: repository '{}' not found\n", url),
            ));
        }
        std::fs::create_dir_all(dest)?;
        Ok(ToolOutput::default())
    }

    fn pull(&self, repo: &Path) -> Result<ToolOutput> {
        self.log.record(format!("git pull {}", repo.display()));
        Ok(ToolOutput {
            stdout: "Already up to date.\n".to_string(),
            stderr: String::new(),
        })
    }
}
