//! Secret collection for resource rendering
//!
//! Resources listed under `dhall.secrets` need values that never live in the
//! service directory. A [`SecretSource`] pairs each declared key with a value
//! just before the resource is rendered.
//!
//! ```rust
//! use homectl_engine::{SecretSource, StaticSecretSource};
//!
//! let mut source = StaticSecretSource::new([("DB_PASSWORD", "hunter2")]);
//! let pairs = source
//!     .resolve("secret-01", &["DB_PASSWORD".to_string()])
//!     .unwrap();
//! assert_eq!(pairs, vec![("DB_PASSWORD".to_string(), "hunter2".to_string())]);
//! ```

use std::collections::HashMap;
use std::io::{BufRead, Write};
use thiserror::Error;

/// A secret key and its value
pub type SecretPair = (String, String);

/// Errors from secret sources
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("no value provided for secret {key} of {resource}")]
    Missing { resource: String, key: String },

    #[error("failed to read secret {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Provides values for declared secret keys
pub trait SecretSource {
    /// Resolve every key, in order, into key/value pairs
    fn resolve(&mut self, resource: &str, keys: &[String]) -> Result<Vec<SecretPair>, SecretError>;
}

/// Prompts for one value per line on an interactive stream
///
/// Prompts are written one at a time and block until a line is read.
pub struct PromptSecretSource<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSecretSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, resource: &str, key: &str) -> Result<String, SecretError> {
        let io_err = |source| SecretError::Io {
            key: key.to_string(),
            source,
        };

        writeln!(self.output, "Enter value for {}:", key).map_err(io_err)?;
        self.output.flush().map_err(io_err)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_err)?;
        if read == 0 {
            return Err(SecretError::Missing {
                resource: resource.to_string(),
                key: key.to_string(),
            });
        }

        let value = line.strip_suffix('\n').unwrap_or(&line);
        Ok(value.strip_suffix('\r').unwrap_or(value).to_string())
    }
}

impl PromptSecretSource<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr, read from stdin
    pub fn stdin() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> SecretSource for PromptSecretSource<R, W> {
    fn resolve(&mut self, resource: &str, keys: &[String]) -> Result<Vec<SecretPair>, SecretError> {
        keys.iter()
            .map(|key| Ok((key.clone(), self.prompt(resource, key)?)))
            .collect()
    }
}

/// Canned secret values, keyed by secret name
#[derive(Debug, Clone, Default)]
pub struct StaticSecretSource {
    values: HashMap<String, String>,
    requested: Vec<String>,
}

impl StaticSecretSource {
    pub fn new<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            requested: Vec::new(),
        }
    }

    /// Keys asked for so far, in request order
    pub fn requested(&self) -> &[String] {
        &self.requested
    }
}

impl SecretSource for StaticSecretSource {
    fn resolve(&mut self, resource: &str, keys: &[String]) -> Result<Vec<SecretPair>, SecretError> {
        let mut pairs = Vec::with_capacity(keys.len());
        for key in keys {
            self.requested.push(key.clone());
            let value = self.values.get(key).ok_or_else(|| SecretError::Missing {
                resource: resource.to_string(),
                key: key.clone(),
            })?;
            pairs.push((key.clone(), value.clone()));
        }
        Ok(pairs)
    }
}
