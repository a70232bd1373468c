//! Summaries of compiled manifests

use serde::Deserialize;

/// `[namespace/]Kind/name` of every object in a multi-document YAML stream
///
/// Empty documents are skipped. Documents without a kind or name are
/// listed with `?` in their place.
pub fn summarize(manifest: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let mut objects = Vec::new();

    for document in serde_yaml::Deserializer::from_str(manifest) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }

        let kind = value.get("kind").and_then(|v| v.as_str()).unwrap_or("?");
        let metadata = value.get("metadata");
        let name = metadata
            .and_then(|m| m.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or("?");

        match metadata
            .and_then(|m| m.get("namespace"))
            .and_then(|v| v.as_str())
        {
            Some(ns) => objects.push(format!("{}/{}/{}", ns, kind, name)),
            None => objects.push(format!("{}/{}", kind, name)),
        }
    }

    Ok(objects)
}
