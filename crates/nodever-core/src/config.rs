use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{RuntimeCatalog, RuntimeOption};
use crate::constants::MANIFEST_NODE;

#[derive(Debug, Default, Deserialize)]
pub struct NodeverConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    /// Replaces the built-in catalog when non-empty. Newest first.
    #[serde(default)]
    pub runtimes: Vec<RuntimeConfig>,
}

impl NodeverConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {path}"))?;
        let cfg = toml::from_str::<Self>(&text)
            .with_context(|| format!("failed to parse TOML config: {path}"))?;
        Ok(cfg)
    }

    /// Loads `path` when it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            debug!("config file {path} not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Builds the runtime catalog this configuration describes.
    pub fn catalog(&self) -> Result<RuntimeCatalog> {
        if self.runtimes.is_empty() {
            return Ok(RuntimeCatalog::builtin());
        }

        let options = self
            .runtimes
            .iter()
            .map(|rt| {
                RuntimeOption::parse(rt.major, &rt.range, rt.runtime.clone(), rt.discontinued_at)
                    .with_context(|| format!("invalid runtime entry '{}'", rt.runtime))
            })
            .collect::<Result<Vec<_>>>()?;

        RuntimeCatalog::new(options).context("invalid runtime catalog")
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    pub name: Option<String>,
    /// The `package.json` whose `engines.node` is honoured.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Range used when the manifest declares none. Treated as auto-selected.
    pub default_range: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            manifest: default_manifest(),
            default_range: None,
        }
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from(MANIFEST_NODE)
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    pub major: u32,
    pub range: String,
    pub runtime: String,
    /// `YYYY-MM-DD`
    pub discontinued_at: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> NodeverConfig {
        toml::from_str(text).expect("fixture config should parse")
    }

    #[test]
    fn empty_config_uses_builtin_catalog() {
        let cfg = parse("");
        assert_eq!(cfg.project.manifest, PathBuf::from("package.json"));
        assert_eq!(cfg.catalog().expect("catalog"), RuntimeCatalog::builtin());
    }

    #[test]
    fn custom_runtimes_replace_builtin_catalog() {
        let cfg = parse(
            r#"
            [project]
            name = "demo"
            manifest = "web/package.json"
            default_range = "14.x"

            [[runtimes]]
            major = 16
            range = "16.x"
            runtime = "nodejs16.x"

            [[runtimes]]
            major = 14
            range = "14.x"
            runtime = "nodejs14.x"
            discontinued_at = "2023-08-15"
            "#,
        );
        assert_eq!(cfg.project.default_range.as_deref(), Some("14.x"));
        let catalog = cfg.catalog().expect("catalog");
        assert_eq!(catalog.latest().runtime, "nodejs16.x");
        assert_eq!(
            catalog.oldest().discontinued_at,
            NaiveDate::from_ymd_opt(2023, 8, 15)
        );
    }

    #[test]
    fn misordered_runtimes_are_rejected() {
        let cfg = parse(
            r#"
            [[runtimes]]
            major = 14
            range = "14.x"
            runtime = "nodejs14.x"

            [[runtimes]]
            major = 16
            range = "16.x"
            runtime = "nodejs16.x"
            "#,
        );
        let err = cfg.catalog().expect_err("must fail");
        assert!(format!("{err:#}").contains("newest to oldest"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nodever.toml");
        let cfg = NodeverConfig::load_or_default(path.to_str().expect("utf-8 path"))
            .expect("defaults");
        assert!(cfg.runtimes.is_empty());
        assert_eq!(cfg.project.default_range, None);
    }
}
