//! Constants used across the nodever workspace.

/// The filename for nodever's configuration.
pub const CONFIG_FILE: &str = "nodever.toml";

/// The manifest that declares `engines.node` for Node projects.
pub const MANIFEST_NODE: &str = "package.json";
