//! Masked secret prompting

use std::io::ErrorKind;

use homectl_engine::{SecretError, SecretPair, SecretSource};

/// Prompts on the terminal without echoing the typed value
#[derive(Debug, Default)]
pub struct HiddenPrompt;

impl SecretSource for HiddenPrompt {
    fn resolve(&mut self, resource: &str, keys: &[String]) -> Result<Vec<SecretPair>, SecretError> {
        keys.iter()
            .map(|key| {
                match rpassword::prompt_password(format!("Enter value for {}: ", key)) {
                    Ok(value) => Ok((key.clone(), value)),
                    Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(SecretError::Missing {
                        resource: resource.to_string(),
                        key: key.clone(),
                    }),
                    Err(source) => Err(SecretError::Io {
                        key: key.clone(),
                        source,
                    }),
                }
            })
            .collect()
    }
}
