//! Error types for homectl-kube

use miette::{GraphicalReportHandler, GraphicalTheme};
use thiserror::Error;

/// Result type for homectl-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur while driving external tools
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// The program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program exited with a nonzero status
    #[error("{program} exited with {}", describe_status(.status))]
    ToolFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Nothing has been generated for a service yet
    #[error("no generated manifests at {path}\nHint: Run `homectl generate` first")]
    MissingOutput { path: String },

    /// Resource could not be classified or the descriptor is unusable
    #[error(transparent)]
    Core(#[from] homectl_core::CoreError),

    /// Template rendering error
    #[error(transparent)]
    Engine(#[from] homectl_engine::EngineError),

    /// Secret collection error
    #[error(transparent)]
    Secret(#[from] homectl_engine::SecretError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl KubeError {
    /// Diagnostic text for reports: the tool's own stderr when it has one,
    /// the annotated template source for rendering errors
    pub fn diagnostic(&self) -> String {
        match self {
            KubeError::ToolFailed { stderr, .. } if !stderr.trim().is_empty() => {
                stderr.trim_end().to_string()
            }
            KubeError::Engine(e) => {
                let mut out = String::new();
                let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
                match handler.render_report(&mut out, e) {
                    Ok(()) => out.trim_end().to_string(),
                    Err(_) => e.to_string(),
                }
            }
            other => other.to_string(),
        }
    }
}
