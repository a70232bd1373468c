//! Homectl Engine - Jinja2 rendering of Dhall resource sources
//!
//! This crate turns one declared resource into Dhall source text ready for
//! `dhall-to-yaml`:
//! - MiniJinja environment with Dhall escaping filters
//! - Built-in resource template, replaceable per installation
//! - Secret sources that pair declared keys with operator-provided values

pub mod engine;
pub mod error;
pub mod filters;
pub mod secrets;

pub use engine::{Engine, EngineBuilder, RenderRequest, dhall_import_path};
pub use error::{EngineError, Result, TemplateError, TemplateErrorKind};
pub use secrets::{PromptSecretSource, SecretError, SecretPair, SecretSource, StaticSecretSource};
