use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// The command families of the `nodever` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryCommand {
    /// Writes a starter `nodever.toml` seeded with the built-in runtime catalog.
    Init,
    /// Picks the runtime for the project from its requested Node.js range.
    Resolve,
    /// Prints the runtime catalog. `supported` hides discontinued runtimes, `all` keeps them.
    List,
    /// Validates the configured catalog and project default range.
    Check,
}

impl PrimaryCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Resolve => "resolve",
            Self::List => "list",
            Self::Check => "check",
        }
    }

    /// Selector used when none is given, e.g. `list` means `list:supported`.
    pub fn default_selector(self) -> Option<&'static str> {
        match self {
            Self::List => Some("supported"),
            Self::Check => Some("catalog"),
            Self::Init | Self::Resolve => None,
        }
    }
}

/// A command as typed on the command line, `primary[:selector]`.
///
/// `list:all` lists every runtime including discontinued ones, `check:catalog`
/// validates the catalog, and a bare `list` or `check` falls back to
/// [`PrimaryCommand::default_selector`]. `init` and `resolve` take no selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandRef {
    pub primary: PrimaryCommand,
    pub selector: Option<String>,
}

impl CommandRef {
    /// The `primary[:selector]` text, e.g. `list:supported`.
    pub fn canonical(&self) -> String {
        match &self.selector {
            Some(selector) => format!("{}:{}", self.primary.as_str(), selector),
            None => self.primary.as_str().to_string(),
        }
    }

    pub fn with_default_selector(&self) -> Self {
        if self.selector.is_some() {
            return self.clone();
        }
        Self {
            primary: self.primary,
            selector: self.primary.default_selector().map(ToOwned::to_owned),
        }
    }
}

impl Display for CommandRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("unknown primary command '{0}'")]
    UnknownPrimary(String),
}

impl FromStr for CommandRef {
    type Err = CommandParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(2, ':');
        let primary_text = parts.next().unwrap_or_default();
        let selector = parts.next().map(ToOwned::to_owned);

        let primary = match primary_text {
            "init" => PrimaryCommand::Init,
            "resolve" => PrimaryCommand::Resolve,
            "list" => PrimaryCommand::List,
            "check" => PrimaryCommand::Check,
            _ => return Err(CommandParseError::UnknownPrimary(primary_text.to_string())),
        };

        Ok(Self { primary, selector })
    }
}
