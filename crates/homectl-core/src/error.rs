//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Could not find homectl.json in {path}")]
    DescriptorNotFound { path: String },

    #[error("Invalid descriptor {path}: {message}")]
    InvalidDescriptor { path: String, message: String },

    #[error("Could not determine resource type for {name:?}")]
    UnclassifiableResource { name: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
