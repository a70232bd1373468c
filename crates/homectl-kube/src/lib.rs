//! Homectl Kube - Manifest generation and cluster lifecycle
//!
//! This crate drives the external tools behind homectl:
//! - `Generator`: render, compile and persist every declared resource
//! - `Lifecycle`: apply and delete manifests and chart releases
//! - `sync_dependencies`: fetch the Dhall dependency repositories
//! - Tool traits with subprocess and recording implementations

pub mod actions;
pub mod dependencies;
pub mod error;
pub mod generator;
pub mod lifecycle;
pub mod manifest;
pub mod mock;
pub mod report;
pub mod tools;

pub use actions::{ChartRelease, ManifestTarget};
pub use dependencies::sync_dependencies;
pub use error::{KubeError, Result};
pub use generator::Generator;
pub use lifecycle::Lifecycle;
pub use report::{Operation, OperationReport, OperationState, OutcomeStatus, ResourceOutcome};
pub use tools::{
    ChartManager, ClusterClient, DhallToYaml, Git, GitClient, Helm, Kubectl, ManifestCompiler,
    ToolOutput, run_tool,
};
