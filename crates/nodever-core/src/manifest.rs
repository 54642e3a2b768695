use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    engines: Option<Engines>,
}

#[derive(Debug, Default, Deserialize)]
struct Engines {
    node: Option<Value>,
}

/// The `engines.node` entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginesNode {
    /// A string, trimmed.
    Range(String),
    /// Any other JSON value, kept as its JSON text.
    Invalid(String),
}

/// Reads `engines.node` from a `package.json`. A missing file or a manifest
/// without the field yields `None`.
pub fn read_engines_node(path: &Path) -> Result<Option<EnginesNode>> {
    if !path.is_file() {
        debug!("manifest {} not found", path.display());
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    parse_engines_node(&content)
        .with_context(|| format!("failed to parse manifest: {}", path.display()))
}

pub fn parse_engines_node(content: &str) -> Result<Option<EnginesNode>> {
    let manifest: PackageManifest = serde_json::from_str(content)?;
    Ok(match manifest.engines.and_then(|engines| engines.node) {
        None | Some(Value::Null) => None,
        Some(Value::String(node)) => Some(EnginesNode::Range(node.trim().to_string())),
        Some(other) => {
            debug!("engines.node is not a string: {other}");
            Some(EnginesNode::Invalid(other.to_string()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_engines_node() {
        let out = parse_engines_node(r#"{"name": "web", "engines": {"node": " 12.x "}}"#)
            .expect("manifest should parse");
        assert_eq!(out, Some(EnginesNode::Range("12.x".to_string())));
    }

    #[test]
    fn non_string_engines_node_is_kept_as_invalid() {
        let node = |content: &str| parse_engines_node(content).expect("manifest should parse");
        assert_eq!(
            node(r#"{"engines": {"node": 12}}"#),
            Some(EnginesNode::Invalid("12".to_string()))
        );
        assert_eq!(
            node(r#"{"engines": {"node": ["12.x"]}}"#),
            Some(EnginesNode::Invalid(r#"["12.x"]"#.to_string()))
        );
        assert_eq!(node(r#"{"engines": {"node": null}}"#), None);
    }

    #[test]
    fn manifest_without_engines_has_no_range() {
        assert_eq!(parse_engines_node(r#"{"name": "web"}"#).expect("parse"), None);
        assert_eq!(
            parse_engines_node(r#"{"engines": {"npm": ">=6"}}"#).expect("parse"),
            None
        );
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{ not json").expect("write manifest");
        let err = read_engines_node(&path).expect_err("must fail");
        assert!(err.to_string().contains("failed to parse manifest"));
    }

    #[test]
    fn missing_manifest_has_no_range() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = read_engines_node(&dir.path().join("package.json")).expect("missing is fine");
        assert_eq!(out, None);
    }
}
