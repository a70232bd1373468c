//! Targets of apply and delete operations

use homectl_core::{ChartConfig, Service};
use std::path::{Path, PathBuf};

use crate::error::{KubeError, Result};

/// A chart release resolved against its service directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRelease {
    /// Release name
    pub name: String,

    /// Chart reference
    pub chart: String,

    /// Target namespace
    pub namespace: String,

    /// Values file path
    pub values: Option<PathBuf>,
}

impl ChartRelease {
    pub fn from_service(service: &Service, config: &ChartConfig) -> Self {
        Self {
            name: config.name.clone(),
            chart: config.source.clone(),
            namespace: config.namespace().to_string(),
            values: config
                .values
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| service.resolve(v)),
        }
    }
}

/// Where the compiled manifests of a service live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestTarget {
    /// `<service>/output/`, one file per resource
    Directory(PathBuf),

    /// `<service>/output.yaml`, written by older layouts
    LegacyFile(PathBuf),
}

impl ManifestTarget {
    /// Find the generated manifests of a service
    pub fn locate(service: &Service) -> Result<Self> {
        let dir = service.output_dir();
        if dir.is_dir() {
            return Ok(Self::Directory(dir));
        }

        let legacy = service.legacy_output_file();
        if legacy.is_file() {
            return Ok(Self::LegacyFile(legacy));
        }

        Err(KubeError::MissingOutput {
            path: dir.display().to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::LegacyFile(path) => path,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::LegacyFile(_))
    }
}
