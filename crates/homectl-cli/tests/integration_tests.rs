//! Integration tests for CLI commands
//!
//! External tools are replaced by small shell scripts passed through the
//! tool override flags.

#![cfg(unix)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Scratch area holding services, stub tools and a config file
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("config.yaml"), "{}\n").unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn log(&self) -> PathBuf {
        self.path().join("calls.log")
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.log())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Write an executable script with the given body
    fn tool(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A tool that records its arguments and succeeds
    fn recording_tool(&self, name: &str) -> PathBuf {
        self.tool(
            name,
            &format!("echo \"{} $*\" >> \"{}\"", name, self.log().display()),
        )
    }

    fn service(&self, name: &str, descriptor: &serde_json::Value) -> PathBuf {
        let path = self.path().join(name);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("homectl.json"), descriptor.to_string()).unwrap();
        path
    }

    fn homectl(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to execute homectl")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_homectl"));
        cmd.args(args)
            .env("HOMECTL_CONFIG", self.path().join("config.yaml"))
            .env_remove("RUST_LOG")
            .current_dir(self.path());
        cmd
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

mod generate_command {
    use super::*;

    #[test]
    fn test_generate_writes_one_file_per_resource() {
        let ws = Workspace::new();
        let compiler = ws.tool("dhall-to-yaml", "cat");
        let service = ws.service(
            "web",
            &serde_json::json!({
                "dhall": {"source": "values.dhall", "resources": ["deployment-01", "service-01"]}
            }),
        );

        let output = ws.homectl(&[
            "generate",
            "web",
            "--dhall-to-yaml",
            compiler.to_str().unwrap(),
        ]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(service.join("output/deployment-01.yaml").is_file());
        assert!(service.join("output/service-01.yaml").is_file());

        let written = std::fs::read_to_string(service.join("output/service-01.yaml")).unwrap();
        assert!(written.contains("let values = ./web/values.dhall"));
        assert!(written.contains("./dhall/templates/service.dhall"));
        assert!(stdout(&output).contains("deployment-01"));
    }

    #[test]
    fn test_generate_passes_compiler_flags() {
        let ws = Workspace::new();
        let compiler = ws.tool(
            "dhall-to-yaml",
            &format!("echo \"dhall-to-yaml $*\" >> \"{}\"; cat", ws.log().display()),
        );
        ws.service("web", &serde_json::json!({"dhall": {"resources": ["deployment-01"]}}));

        let output = ws.homectl(&[
            "generate",
            "web",
            "--dhall-to-yaml",
            compiler.to_str().unwrap(),
        ]);

        assert!(output.status.success());
        assert_eq!(ws.calls(), ["dhall-to-yaml --omit-empty --documents"]);
    }

    #[test]
    fn test_compiler_failure_sets_exit_code() {
        let ws = Workspace::new();
        let compiler = ws.tool(
            "dhall-to-yaml",
            "cat > /dev/null; echo 'Error: Missing record field' >&2; exit 1",
        );
        let service = ws.service(
            "web",
            &serde_json::json!({"dhall": {"resources": ["deployment-01", "service-01"]}}),
        );

        let output = ws.homectl(&[
            "generate",
            "web",
            "--dhall-to-yaml",
            compiler.to_str().unwrap(),
        ]);

        assert_eq!(output.status.code(), Some(3));
        assert!(stderr(&output).contains("Error: Missing record field"));
        assert!(!service.join("output/deployment-01.yaml").exists());
        assert!(!service.join("output/service-01.yaml").exists());
    }

    #[test]
    fn test_missing_descriptor_does_not_stop_the_batch() {
        let ws = Workspace::new();
        let compiler = ws.tool("dhall-to-yaml", "cat");
        std::fs::create_dir(ws.path().join("empty")).unwrap();
        let service = ws.service(
            "web",
            &serde_json::json!({"dhall": {"resources": ["deployment-01"]}}),
        );

        let output = ws.homectl(&[
            "generate",
            "empty",
            "web",
            "--dhall-to-yaml",
            compiler.to_str().unwrap(),
        ]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("Could not find homectl.json in empty"));
        assert!(service.join("output/deployment-01.yaml").is_file());
    }

    #[test]
    fn test_no_resources_succeeds() {
        let ws = Workspace::new();
        let compiler = ws.recording_tool("dhall-to-yaml");
        let service = ws.service("web", &serde_json::json!({"dhall": {"source": "values.dhall"}}));

        let output = ws.homectl(&[
            "generate",
            "web",
            "--dhall-to-yaml",
            compiler.to_str().unwrap(),
        ]);

        assert!(output.status.success());
        assert!(ws.calls().is_empty());
        assert!(!service.join("output").exists());
    }

    #[test]
    fn test_secrets_are_read_from_stdin() {
        let ws = Workspace::new();
        let compiler = ws.tool("dhall-to-yaml", "cat");
        let service = ws.service(
            "db",
            &serde_json::json!({"dhall": {"secrets": {"secret-01": ["USER", "PASSWORD"]}}}),
        );

        let mut child = ws
            .command(&[
                "generate",
                "db",
                "--secrets",
                "--dhall-to-yaml",
                compiler.to_str().unwrap(),
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute homectl");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(b"admin\nhunter2\n")
            .unwrap();
        let output = child.wait_with_output().unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let prompts = stderr(&output);
        let user = prompts.find("Enter value for USER:").unwrap();
        let password = prompts.find("Enter value for PASSWORD:").unwrap();
        assert!(user < password);

        let written = std::fs::read_to_string(service.join("output/secret-01.yaml")).unwrap();
        assert!(written.contains(r#"// { USER = "admin", PASSWORD = "hunter2" }"#));
    }

    #[test]
    fn test_hide_input_requires_secrets() {
        let ws = Workspace::new();
        let output = ws.homectl(&["generate", "web", "--hide-input"]);
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_missing_template_override() {
        let ws = Workspace::new();
        ws.service("web", &serde_json::json!({"dhall": {"resources": ["deployment-01"]}}));

        let output = ws.homectl(&["generate", "web", "--template", "missing.j2"]);

        assert_eq!(output.status.code(), Some(4));
        assert!(stderr(&output).contains("Failed to read template missing.j2"));
    }
}

mod lifecycle_commands {
    use super::*;

    fn chart_and_manifests(ws: &Workspace) -> PathBuf {
        let service = ws.service(
            "cache",
            &serde_json::json!({
                "dhall": {"resources": ["deployment-01"]},
                "helm": {"source": "stable/redis", "name": "cache", "values": "redis.yaml"}
            }),
        );
        std::fs::create_dir(service.join("output")).unwrap();
        service
    }

    #[test]
    fn test_apply_runs_kubectl_then_helm() {
        let ws = Workspace::new();
        let kubectl = ws.recording_tool("kubectl");
        let helm = ws.recording_tool("helm");
        chart_and_manifests(&ws);

        let output = ws.homectl(&[
            "apply",
            "cache",
            "--kubectl",
            kubectl.to_str().unwrap(),
            "--helm",
            helm.to_str().unwrap(),
        ]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(
            ws.calls(),
            [
                "kubectl apply -f cache/output",
                "helm install cache stable/redis --namespace default -f cache/redis.yaml",
            ]
        );
    }

    #[test]
    fn test_delete_removes_chart_before_manifests() {
        let ws = Workspace::new();
        let kubectl = ws.recording_tool("kubectl");
        let helm = ws.recording_tool("helm");
        chart_and_manifests(&ws);

        let output = ws.homectl(&[
            "delete",
            "cache",
            "--kubectl",
            kubectl.to_str().unwrap(),
            "--helm",
            helm.to_str().unwrap(),
        ]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(
            ws.calls(),
            [
                "helm delete cache --namespace default",
                "kubectl delete -f cache/output",
            ]
        );
    }

    #[test]
    fn test_failing_helm_still_deletes_manifests() {
        let ws = Workspace::new();
        let kubectl = ws.recording_tool("kubectl");
        let helm = ws.tool("helm", "echo 'Error: release: not found' >&2; exit 1");
        chart_and_manifests(&ws);

        let output = ws.homectl(&[
            "delete",
            "cache",
            "--kubectl",
            kubectl.to_str().unwrap(),
            "--helm",
            helm.to_str().unwrap(),
        ]);

        assert_eq!(output.status.code(), Some(3));
        assert!(stderr(&output).contains("Error: release: not found"));
        assert_eq!(ws.calls(), ["kubectl delete -f cache/output"]);
    }

    #[test]
    fn test_apply_without_generated_output() {
        let ws = Workspace::new();
        let kubectl = ws.recording_tool("kubectl");
        ws.service("web", &serde_json::json!({"dhall": {"resources": ["deployment-01"]}}));

        let output = ws.homectl(&["apply", "web", "--kubectl", kubectl.to_str().unwrap()]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("homectl generate"));
        assert!(ws.calls().is_empty());
    }

    #[test]
    fn test_apply_legacy_output_file() {
        let ws = Workspace::new();
        let kubectl = ws.recording_tool("kubectl");
        let service = ws.service("web", &serde_json::json!({"dhall": {"resources": ["deployment-01"]}}));
        std::fs::write(service.join("output.yaml"), "kind: Service\n").unwrap();

        let output = ws.homectl(&["apply", "web", "--kubectl", kubectl.to_str().unwrap()]);

        assert!(output.status.success());
        assert_eq!(ws.calls(), ["kubectl apply -f web/output.yaml"]);
        assert!(stderr(&output).contains("deprecated"));
    }
}

mod init_command {
    use super::*;

    #[test]
    fn test_init_clones_default_dependencies() {
        let ws = Workspace::new();
        let git = ws.recording_tool("git");

        let output = ws.homectl(&["init", "--dir", "deps", "--git", git.to_str().unwrap()]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(
            ws.calls(),
            [
                "git clone https://github.com/dhall-lang/dhall-kubernetes.git deps/dhall-kubernetes",
                "git clone https://github.com/dhall-lang/dhall-lang.git deps/prelude",
            ]
        );
    }

    #[test]
    fn test_init_pulls_existing_checkouts() {
        let ws = Workspace::new();
        let git = ws.recording_tool("git");
        std::fs::create_dir_all(ws.path().join("deps/prelude")).unwrap();

        let output = ws.homectl(&["init", "--dir", "deps", "--git", git.to_str().unwrap()]);

        assert!(output.status.success());
        assert_eq!(ws.calls()[1], "git -C deps/prelude pull");
    }
}

mod config {
    use super::*;

    #[test]
    fn test_missing_config_file() {
        let ws = Workspace::new();
        let output = ws
            .command(&["apply", "web"])
            .env("HOMECTL_CONFIG", ws.path().join("nope.yaml"))
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_config_file_selects_tools() {
        let ws = Workspace::new();
        let kubectl = ws.recording_tool("kubectl");
        std::fs::write(
            ws.path().join("config.yaml"),
            format!("tools:\n  kubectl: {}\n", kubectl.display()),
        )
        .unwrap();
        let service = ws.service("web", &serde_json::json!({"dhall": {"resources": ["deployment-01"]}}));
        std::fs::create_dir(service.join("output")).unwrap();

        let output = ws.homectl(&["apply", "web"]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(ws.calls(), ["kubectl apply -f web/output"]);
    }
}
