//! Homectl Core - Core types for the service deployment helper
//!
//! This crate provides the foundational types used throughout homectl:
//! - `Service`: A service directory and its `homectl.json` descriptor
//! - `DhallConfig` / `ChartConfig`: The two kinds of deployable content
//! - `ResourceName`: Resource tokens and their type classification
//! - `ToolConfig`: External tool locations and template settings

pub mod config;
pub mod error;
pub mod resource;
pub mod service;

pub use config::{DependencyConfig, Repository, TemplateConfig, ToolConfig, ToolPaths};
pub use error::{CoreError, Result};
pub use resource::{ResourceName, classify};
pub use service::{ChartConfig, Descriptor, DhallConfig, Service};
