use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use nodever_core::manifest::{self, EnginesNode};
use nodever_core::report::render;
use nodever_core::{
    invalid_range, resolve, Advisory, CommandRef, NodeverConfig, PrimaryCommand, RangeRequest,
    ResolutionError, RuntimeCatalog, RuntimeOption, VersionRange,
};

use crate::Cli;

/// Runs a nodever command and returns what should be printed.
#[instrument(skip(cli, cfg))]
pub fn run(
    cli: &Cli,
    cfg: &NodeverConfig,
    command: &CommandRef,
    now: DateTime<Utc>,
) -> Result<String> {
    let effective = command.with_default_selector();
    let catalog = cfg.catalog()?;

    match (effective.primary, effective.selector.as_deref()) {
        (PrimaryCommand::Resolve, None) => run_resolve(cli, cfg, &catalog, now),
        (PrimaryCommand::List, Some(selector @ ("supported" | "all"))) => {
            run_list(cli, &catalog, selector == "all", now)
        }
        (PrimaryCommand::Check, Some("catalog")) => run_check(cfg, &catalog, now),
        _ => bail!("unsupported command '{}'", effective.canonical()),
    }
}

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    request: &'a RangeRequest,
    #[serde(flatten)]
    option: &'a RuntimeOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    advisory: Option<&'a Advisory>,
}

fn run_resolve(
    cli: &Cli,
    cfg: &NodeverConfig,
    catalog: &RuntimeCatalog,
    now: DateTime<Utc>,
) -> Result<String> {
    let from_manifest = match &cli.range {
        Some(_) => None,
        None => match manifest::read_engines_node(&cfg.project.manifest)? {
            Some(EnginesNode::Invalid(text)) => {
                return Err(resolution_failed(invalid_range(catalog, &text, false, now)));
            }
            Some(EnginesNode::Range(range)) => Some(range),
            None => None,
        },
    };
    let request = RangeRequest::select(
        cli.range.as_deref(),
        from_manifest,
        cfg.project.default_range.as_deref(),
    );

    let resolved = resolve(catalog, request.range.as_deref(), request.auto_selected(), now)
        .map_err(resolution_failed)?;

    info!(
        "resolved {} from {:?} range",
        resolved.option.runtime, request.source
    );

    if cli.json {
        let output = ResolveOutput {
            request: &request,
            option: resolved.option,
            advisory: resolved.advisory.as_ref(),
        };
        return Ok(serde_json::to_string_pretty(&output)? + "\n");
    }

    let mut out = String::new();
    writeln!(out, "runtime: {}", resolved.option.runtime)?;
    writeln!(out, "major:   {}", resolved.option.major)?;
    writeln!(out, "range:   {}", resolved.option.range)?;
    if let Some(advisory) = &resolved.advisory {
        writeln!(out, "note:    discontinued on {}", advisory.discontinued_at)?;
    }
    Ok(out)
}

fn resolution_failed(err: ResolutionError) -> anyhow::Error {
    let message = format!("[{}] {}", err.code(), render(&err));
    anyhow::Error::new(err).context(message)
}

#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    #[serde(flatten)]
    option: &'a RuntimeOption,
    status: &'static str,
}

fn status(option: &RuntimeOption, now: DateTime<Utc>) -> &'static str {
    if option.is_discontinued(now) {
        "discontinued"
    } else if option.is_discontinuing(now) {
        "discontinuing"
    } else {
        "supported"
    }
}

fn run_list(cli: &Cli, catalog: &RuntimeCatalog, all: bool, now: DateTime<Utc>) -> Result<String> {
    let entries = catalog
        .options()
        .iter()
        .filter(|option| all || !option.is_discontinued(now))
        .map(|option| ListEntry {
            option,
            status: status(option, now),
        })
        .collect::<Vec<_>>();

    if cli.json {
        return Ok(serde_json::to_string_pretty(&entries)? + "\n");
    }

    let mut out = String::new();
    for entry in &entries {
        let date = entry
            .option
            .discontinued_at
            .map(|d| format!(" {d}"))
            .unwrap_or_default();
        writeln!(
            out,
            "{:<10} {:<14} {}{}",
            entry.option.range.as_str(),
            entry.option.runtime,
            entry.status,
            date
        )?;
    }
    Ok(out)
}

fn run_check(cfg: &NodeverConfig, catalog: &RuntimeCatalog, now: DateTime<Utc>) -> Result<String> {
    if let Some(default_range) = &cfg.project.default_range {
        VersionRange::parse(default_range)
            .with_context(|| format!("project.default_range '{default_range}' is invalid"))?;
    }

    for option in catalog.options() {
        if option.is_discontinuing(now) {
            if let Some(date) = option.discontinued_at {
                warn!("{} ({}) will be discontinued on {}", option.range, option.runtime, date);
            }
        }
    }

    let supported = catalog.supported(now).count();
    if supported == 0 {
        bail!("every runtime in the catalog is discontinued");
    }

    Ok(format!(
        "check:catalog passed: {} runtimes ({} supported)\n",
        catalog.options().len(),
        supported
    ))
}
