use std::fmt::Write as _;
use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};

use crate::Cli;
use nodever_core::{NodeverConfig, RuntimeCatalog};
use tracing::{info, instrument};

/// Runs the `init` command to write a starter configuration.
#[instrument(skip(cli))]
pub fn run(cli: &Cli) -> Result<()> {
    let content = render_config(&RuntimeCatalog::builtin())?;
    write_if_absent(&cli.config, &content, cli.force)
        .with_context(|| format!("failed to write '{}'", cli.config))?;

    let catalog = NodeverConfig::load_from_file(&cli.config)?.catalog()?;

    info!(
        "init complete: config={}, runtimes={}",
        cli.config,
        catalog.options().len()
    );
    println!("next: run 'nodever resolve'");
    Ok(())
}

fn render_config(catalog: &RuntimeCatalog) -> Result<String> {
    let mut out = String::from(
        r#"[project]
manifest = "package.json"
# Used as an auto-selected range when package.json declares no engines.node.
# default_range = "12.x"

# Runtimes, newest first. Remove this list to use the built-in catalog.
"#,
    );

    for option in catalog.options() {
        writeln!(out)?;
        writeln!(out, "[[runtimes]]")?;
        writeln!(out, "major = {}", option.major)?;
        writeln!(out, "range = \"{}\"", option.range)?;
        writeln!(out, "runtime = \"{}\"", option.runtime)?;
        if let Some(date) = option.discontinued_at {
            writeln!(out, "discontinued_at = \"{date}\"")?;
        }
    }
    Ok(out)
}

fn write_if_absent(path: &str, content: &str, force: bool) -> Result<()> {
    let output = Path::new(path);

    if output.exists() && !force {
        return Err(anyhow!(
            "'{}' already exists. Re-run with --force to overwrite",
            path
        ));
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }

    fs::write(output, content)
        .with_context(|| format!("failed to write file '{}'", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn rendered_config_round_trips_to_builtin_catalog() {
        let builtin = RuntimeCatalog::builtin();
        let text = render_config(&builtin).expect("render");
        let cfg: NodeverConfig = toml::from_str(&text).expect("rendered config should parse");
        assert_eq!(cfg.catalog().expect("catalog"), builtin);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nodever.toml");
        let path = path.to_str().expect("utf-8 path");

        let cli = Cli::try_parse_from(["nodever", "init", "--config", path]).expect("cli");
        run(&cli).expect("first init writes the file");
        let err = run(&cli).expect_err("second init must fail");
        assert!(format!("{err:#}").contains("already exists"));

        let cli = Cli::try_parse_from(["nodever", "init", "--config", path, "--force"])
            .expect("cli");
        run(&cli).expect("forced init overwrites");
    }
}
