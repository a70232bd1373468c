//! External tool capabilities
//!
//! Every interaction with the outside world goes through one of these narrow
//! traits: the manifest compiler, the cluster client, the chart manager and
//! git. The subprocess implementations here run the real programs; the
//! recording doubles in [`crate::mock`] stand in for them in tests.
//!
//! All calls block until the program exits. No timeout is applied.

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::actions::ChartRelease;
use crate::error::{KubeError, Result};

/// Captured output of a successful tool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Compiles rendered Dhall source into manifest text
pub trait ManifestCompiler {
    /// Compile `source`; on failure the error carries the compiler's stderr
    fn compile(&self, source: &str) -> Result<String>;

    /// File extension of the produced manifests
    fn extension(&self) -> &str;
}

/// Applies and deletes manifest files against the cluster
pub trait ClusterClient {
    fn apply(&self, target: &Path) -> Result<ToolOutput>;

    fn delete(&self, target: &Path) -> Result<ToolOutput>;
}

/// Installs and deletes chart releases
pub trait ChartManager {
    fn install(&self, release: &ChartRelease) -> Result<ToolOutput>;

    fn delete(&self, release: &ChartRelease) -> Result<ToolOutput>;
}

/// Fetches dependency repositories
pub trait GitClient {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<ToolOutput>;

    fn pull(&self, repo: &Path) -> Result<ToolOutput>;
}

/// Run a program to completion, optionally feeding it standard input
pub fn run_tool<I, S>(program: &str, args: I, input: Option<&str>) -> Result<ToolOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    debug!(program, ?args, "running tool");

    let spawn_err = |source| KubeError::Spawn {
        program: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(&args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    // Feed stdin from a separate thread so a chatty child cannot fill its
    // stdout pipe while we are still writing.
    let output = std::thread::scope(|scope| {
        if let (Some(text), Some(mut stdin)) = (input, child.stdin.take()) {
            scope.spawn(move || {
                // A child that exits early closes the pipe; its status reports why.
                let _ = stdin.write_all(text.as_bytes());
            });
        }
        child.wait_with_output()
    })
    .map_err(spawn_err)?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        debug!(program, status = ?output.status.code(), "tool failed");
        return Err(KubeError::ToolFailed {
            program: program.to_string(),
            status: output.status.code(),
            stderr,
        });
    }

    Ok(ToolOutput { stdout, stderr })
}

/// `dhall-to-yaml` reading source on stdin
#[derive(Debug, Clone)]
pub struct DhallToYaml {
    program: String,
    flags: Vec<String>,
}

impl DhallToYaml {
    pub fn new(program: impl Into<String>, flags: Vec<String>) -> Self {
        Self {
            program: program.into(),
            flags,
        }
    }
}

impl Default for DhallToYaml {
    fn default() -> Self {
        Self::new(
            "dhall-to-yaml",
            vec!["--omit-empty".to_string(), "--documents".to_string()],
        )
    }
}

impl ManifestCompiler for DhallToYaml {
    fn compile(&self, source: &str) -> Result<String> {
        run_tool(&self.program, &self.flags, Some(source)).map(|out| out.stdout)
    }

    fn extension(&self) -> &str {
        "yaml"
    }
}

/// `kubectl apply|delete -f <target>`
#[derive(Debug, Clone)]
pub struct Kubectl {
    program: String,
}

impl Kubectl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for one verb against a file or directory
    pub fn args(verb: &str, target: &Path) -> Vec<OsString> {
        vec![verb.into(), "-f".into(), target.as_os_str().to_os_string()]
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl ClusterClient for Kubectl {
    fn apply(&self, target: &Path) -> Result<ToolOutput> {
        run_tool(&self.program, Self::args("apply", target), None)
    }

    fn delete(&self, target: &Path) -> Result<ToolOutput> {
        run_tool(&self.program, Self::args("delete", target), None)
    }
}

/// `helm install` / `helm delete`
#[derive(Debug, Clone)]
pub struct Helm {
    program: String,
}

impl Helm {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn install_args(release: &ChartRelease) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "install".into(),
            release.name.as_str().into(),
            release.chart.as_str().into(),
            "--namespace".into(),
            release.namespace.as_str().into(),
        ];
        if let Some(values) = &release.values {
            args.push("-f".into());
            args.push(values.as_os_str().to_os_string());
        }
        args
    }

    pub fn delete_args(release: &ChartRelease) -> Vec<OsString> {
        vec![
            "delete".into(),
            release.name.as_str().into(),
            "--namespace".into(),
            release.namespace.as_str().into(),
        ]
    }
}

impl Default for Helm {
    fn default() -> Self {
        Self::new("helm")
    }
}

impl ChartManager for Helm {
    fn install(&self, release: &ChartRelease) -> Result<ToolOutput> {
        run_tool(&self.program, Self::install_args(release), None)
    }

    fn delete(&self, release: &ChartRelease) -> Result<ToolOutput> {
        run_tool(&self.program, Self::delete_args(release), None)
    }
}

/// `git clone` / `git pull`
#[derive(Debug, Clone)]
pub struct Git {
    program: String,
}

impl Git {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitClient for Git {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<ToolOutput> {
        run_tool(
            &self.program,
            [OsStr::new("clone"), OsStr::new(url), dest.as_os_str()],
            None,
        )
    }

    fn pull(&self, repo: &Path) -> Result<ToolOutput> {
        run_tool(
            &self.program,
            [OsStr::new("-C"), repo.as_os_str(), OsStr::new("pull")],
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn release(values: Option<&str>) -> ChartRelease {
        ChartRelease {
            name: "cache".to_string(),
            chart: "stable/redis".to_string(),
            namespace: "data".to_string(),
            values: values.map(PathBuf::from),
        }
    }

    #[test]
    fn test_kubectl_args() {
        let args = Kubectl::args("apply", Path::new("svc/output"));
        assert_eq!(args, ["apply", "-f", "svc/output"]);
    }

    #[test]
    fn test_helm_install_args() {
        assert_eq!(
            Helm::install_args(&release(Some("svc/redis.yaml"))),
            ["install", "cache", "stable/redis", "--namespace", "data", "-f", "svc/redis.yaml"]
        );
        assert_eq!(
            Helm::install_args(&release(None)),
            ["install", "cache", "stable/redis", "--namespace", "data"]
        );
    }

    #[test]
    fn test_helm_delete_args() {
        assert_eq!(
            Helm::delete_args(&release(None)),
            ["delete", "cache", "--namespace", "data"]
        );
    }

    #[test]
    fn test_dhall_to_yaml_defaults() {
        let compiler = DhallToYaml::default();
        assert_eq!(compiler.flags, ["--omit-empty", "--documents"]);
        assert_eq!(compiler.extension(), "yaml");
    }

    #[test]
    fn test_missing_program() {
        let err = run_tool("homectl-test-no-such-program", ["x"], None).unwrap_err();
        assert!(matches!(err, KubeError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_compiler_pipes_source_through() {
        let compiler = DhallToYaml::new("cat", Vec::new());
        let output = compiler.compile("kind: ConfigMap\n").unwrap();
        assert_eq!(output, "kind: ConfigMap\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_captures_stderr() {
        let err = run_tool("sh", ["-c", "echo 'Error: missing import' >&2; exit 3"], None)
            .unwrap_err();
        match err {
            KubeError::ToolFailed {
                program,
                status,
                stderr,
            } => {
                assert_eq!(program, "sh");
                assert_eq!(status, Some(3));
                assert_eq!(stderr, "Error: missing import\n");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_large_input_does_not_deadlock() {
        let input = "x".repeat(1 << 20);
        let output = run_tool("cat", Vec::<&str>::new(), Some(&input)).unwrap();
        assert_eq!(output.stdout.len(), input.len());
    }
}
