//! Service descriptor definition and loading
//!
//! A service is a directory holding a `homectl.json` descriptor:
//!
//! ```json
//! {
//!   "dhall": {
//!     "source": "values.dhall",
//!     "resources": ["deployment-01", "service-01"],
//!     "secrets": { "secret-01": ["DB_PASSWORD"] }
//!   },
//!   "helm": {
//!     "source": "stable/redis",
//!     "name": "cache",
//!     "namespace": "data",
//!     "values": "redis.yaml"
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CoreError, Result};

/// Descriptor file name
pub const DESCRIPTOR_FILE: &str = "homectl.json";

/// Descriptor file name used by older service layouts
pub const LEGACY_DESCRIPTOR_FILE: &str = "package.json";

/// Directory receiving one compiled manifest per resource
pub const OUTPUT_DIR: &str = "output";

/// Single aggregate manifest written by older service layouts
pub const LEGACY_OUTPUT_FILE: &str = "output.yaml";

/// Values source used when `dhall.source` is not set
pub const DEFAULT_VALUES_SOURCE: &str = "values.dhall";

/// Namespace used when `helm.namespace` is not set
pub const DEFAULT_NAMESPACE: &str = "default";

/// Parsed `homectl.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Descriptor {
    /// Dhall-rendered resources
    #[serde(default)]
    pub dhall: Option<DhallConfig>,

    /// Chart release managed by helm
    #[serde(default, rename = "helm")]
    pub chart: Option<ChartConfig>,
}

impl Descriptor {
    /// Parse a descriptor from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a descriptor file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| CoreError::InvalidDescriptor {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Dhall section of the descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DhallConfig {
    /// Values input, relative to the service directory
    #[serde(default)]
    pub source: Option<String>,

    /// Resources to generate, in order
    #[serde(default)]
    pub resources: Option<Vec<String>>,

    /// Resource name -> secret keys to collect before rendering
    #[serde(default)]
    pub secrets: Option<IndexMap<String, Option<Vec<String>>>>,
}

impl DhallConfig {
    /// Values source path relative to the service
    pub fn source(&self) -> &str {
        self.source
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_VALUES_SOURCE)
    }

    /// Declared resources (empty when absent)
    pub fn resources(&self) -> &[String] {
        self.resources.as_deref().unwrap_or_default()
    }

    /// Resources that declare secrets, in declaration order
    pub fn secret_resources(&self) -> impl Iterator<Item = &str> {
        self.secrets.iter().flat_map(|s| s.keys().map(String::as_str))
    }

    /// Secret keys declared for a resource (empty when absent)
    pub fn secret_keys(&self, resource: &str) -> &[String] {
        self.secrets
            .as_ref()
            .and_then(|s| s.get(resource))
            .and_then(|keys| keys.as_deref())
            .unwrap_or_default()
    }
}

/// Chart section of the descriptor (`helm` key)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfig {
    /// Chart reference, e.g. `stable/redis`
    pub source: String,

    /// Release name
    pub name: String,

    /// Target namespace
    #[serde(default)]
    pub namespace: Option<String>,

    /// Values file, relative to the service directory
    #[serde(default)]
    pub values: Option<String>,
}

impl ChartConfig {
    /// Target namespace, `default` when unset or empty
    pub fn namespace(&self) -> &str {
        self.namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE)
    }
}

/// A service directory with its loaded descriptor
#[derive(Debug, Clone)]
pub struct Service {
    path: PathBuf,
    descriptor: Descriptor,
}

impl Service {
    /// Load a service from its directory
    ///
    /// A missing descriptor is an error; older `package.json` descriptors are
    /// still accepted.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.is_dir() {
            return Err(CoreError::DescriptorNotFound {
                path: path.display().to_string(),
            });
        }

        let descriptor_path = path.join(DESCRIPTOR_FILE);
        let legacy_path = path.join(LEGACY_DESCRIPTOR_FILE);

        let descriptor = if descriptor_path.is_file() {
            Descriptor::from_file(&descriptor_path)?
        } else if legacy_path.is_file() {
            warn!(
                "{} uses the deprecated {}; rename it to {}",
                path.display(),
                LEGACY_DESCRIPTOR_FILE,
                DESCRIPTOR_FILE
            );
            Descriptor::from_file(&legacy_path)?
        } else {
            return Err(CoreError::DescriptorNotFound {
                path: path.display().to_string(),
            });
        };

        debug!(
            service = %path.display(),
            dhall = descriptor.dhall.is_some(),
            chart = descriptor.chart.is_some(),
            "loaded service descriptor"
        );

        Ok(Self { path, descriptor })
    }

    /// Build a service from an already parsed descriptor
    pub fn from_descriptor(path: impl Into<PathBuf>, descriptor: Descriptor) -> Self {
        Self {
            path: path.into(),
            descriptor,
        }
    }

    /// Service directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name (the directory as given)
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    pub fn dhall(&self) -> Option<&DhallConfig> {
        self.descriptor.dhall.as_ref()
    }

    pub fn chart(&self) -> Option<&ChartConfig> {
        self.descriptor.chart.as_ref()
    }

    /// Resolve a path declared relative to the service directory
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Per-resource output directory
    pub fn output_dir(&self) -> PathBuf {
        self.path.join(OUTPUT_DIR)
    }

    /// Output file for one resource
    pub fn output_file(&self, resource: &str, extension: &str) -> PathBuf {
        self.output_dir().join(format!("{}.{}", resource, extension))
    }

    /// Aggregate manifest of the older single-file layout
    pub fn legacy_output_file(&self) -> PathBuf {
        self.path.join(LEGACY_OUTPUT_FILE)
    }
}
