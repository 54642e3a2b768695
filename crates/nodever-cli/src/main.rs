use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Parser;

use nodever_core::{CommandRef, NodeverConfig, PrimaryCommand};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod executor;
mod init;
mod styles;

use styles as s;

/// The command-line interface for nodever.
#[derive(Debug, Parser)]
#[command(name = "nodever")]
#[command(version)]
#[command(styles = s::get_clap_styles())]
#[command(
    help_template = "{bin} {version}\n\n{about-with-newline}{usage-heading} {usage}\n\n{all-args}{after-help}"
)]
#[command(about = "Pick the Node.js runtime a project deploys on")]
#[command(
    long_about = "nodever reads the Node.js version range a project asks for (the --range flag,
`engines.node` in package.json, or the configured default) and selects the newest
supported runtime that satisfies it. Discontinued runtimes are refused.

Commands:
  resolve           Resolve the project's runtime
  list:supported    List runtimes that can still be selected
  list:all          List every known runtime with its status
  check:catalog     Validate the configuration and runtime catalog
  init              Write a starter nodever.toml
"
)]
#[command(
    after_help = "\x1b[1;32mExamples:\x1b[0m\n  \x1b[36mnodever resolve\x1b[0m                 \x1b[2m# Use engines.node from package.json\x1b[0m\n  \x1b[36mnodever resolve --range 10.x\x1b[0m    \x1b[2m# Resolve an explicit range\x1b[0m\n  \x1b[36mnodever list all\x1b[0m                \x1b[2m# Show the whole catalog\x1b[0m"
)]
pub(crate) struct Cli {
    /// Command in canonical form, for example: `resolve`, `list:all`, `check`
    command: Option<String>,
    /// Optional selector (supports `nodever list all` style)
    selector: Option<String>,
    /// Path to nodever config file.
    #[arg(long, default_value = nodever_core::constants::CONFIG_FILE)]
    config: String,
    /// Requested Node.js version range, overriding package.json.
    #[arg(long)]
    range: Option<String>,
    /// Evaluate discontinuation dates at this instant (RFC 3339 or YYYY-MM-DD).
    #[arg(long, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,
    /// Print results as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Overwrite generated files if they already exist.
    #[arg(long, default_value_t = false)]
    force: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    debug!("parsed cli arguments: {:?}", cli);

    let command_name = match &cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let command_text = match &cli.selector {
        Some(selector) => format!("{}:{}", command_name, selector),
        None => command_name.clone(),
    };

    let command = CommandRef::from_str(&command_text)
        .map_err(|e| anyhow!("failed to parse command '{}': {e}", command_text))?;

    if command.primary == PrimaryCommand::Init {
        return init::run(&cli);
    }

    let cfg = NodeverConfig::load_or_default(&cli.config)
        .with_context(|| format!("unable to load config '{}'", cli.config))?;
    let now = cli.now.unwrap_or_else(Utc::now);

    let output = executor::run(&cli, &cfg, &command, now)?;
    print!("{output}");
    Ok(())
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    value
        .parse::<NaiveDate>()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| format!("'{value}' is neither RFC 3339 nor YYYY-MM-DD"))
}
