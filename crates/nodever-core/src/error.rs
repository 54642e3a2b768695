//! Error types for runtime resolution and catalog construction.

use thiserror::Error;

use crate::catalog::RuntimeOption;
use crate::range::RangeError;

/// Why a runtime could not be selected.
///
/// The variants carry everything needed to explain the failure; the
/// multi-line wording shown to users lives in [`crate::report`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The requested range matches no known runtime.
    #[error("invalid Node.js version range: {requested_range}")]
    InvalidRange {
        /// The range as it was requested.
        requested_range: String,
        /// Whether the range was picked automatically rather than by the user.
        auto_selected: bool,
        /// Ranges still selectable at resolution time, newest first.
        supported: Vec<String>,
    },

    /// The selected runtime is past its discontinuation date.
    #[error("discontinued Node.js version: {} ({})", .selection.range, .selection.runtime)]
    Discontinued {
        /// The runtime the request resolved to.
        selection: RuntimeOption,
        /// The range as it was requested, if any.
        requested_range: Option<String>,
        /// Whether the range was picked automatically rather than by the user.
        auto_selected: bool,
    },
}

impl ResolutionError {
    /// Stable machine-readable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "NODE_VERSION_INVALID",
            Self::Discontinued { .. } => "NODE_VERSION_DISCONTINUED",
        }
    }

    /// True when the user did not write the range themselves, including when
    /// no range was given at all.
    pub fn is_auto_selected(&self) -> bool {
        match self {
            Self::InvalidRange { auto_selected, .. } => *auto_selected,
            Self::Discontinued {
                auto_selected,
                requested_range,
                ..
            } => *auto_selected || requested_range.is_none(),
        }
    }
}

/// Errors raised while building a [`crate::RuntimeCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("runtime catalog is empty")]
    Empty,

    #[error("runtime '{runtime}' has major version 0")]
    InvalidMajor { runtime: String },

    #[error("runtime major {major} is listed more than once")]
    DuplicateMajor { major: u32 },

    #[error("runtimes must be ordered newest to oldest, but {previous} is followed by {next}")]
    OutOfOrder { previous: u32, next: u32 },

    #[error("runtime range '{range}' is invalid: {source}")]
    InvalidRange {
        range: String,
        #[source]
        source: RangeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuntimeCatalog;

    #[test]
    fn codes_identify_the_kind() {
        let invalid = ResolutionError::InvalidRange {
            requested_range: "6.x".to_string(),
            auto_selected: false,
            supported: vec!["12.x".to_string()],
        };
        assert_eq!(invalid.code(), "NODE_VERSION_INVALID");
        assert_eq!(invalid.to_string(), "invalid Node.js version range: 6.x");

        let discontinued = ResolutionError::Discontinued {
            selection: RuntimeCatalog::builtin().oldest().clone(),
            requested_range: None,
            auto_selected: false,
        };
        assert_eq!(discontinued.code(), "NODE_VERSION_DISCONTINUED");
        assert_eq!(
            discontinued.to_string(),
            "discontinued Node.js version: 8.10.x (nodejs8.10)"
        );
    }

    #[test]
    fn missing_range_counts_as_auto_selected() {
        let err = ResolutionError::Discontinued {
            selection: RuntimeCatalog::builtin().oldest().clone(),
            requested_range: None,
            auto_selected: false,
        };
        assert!(err.is_auto_selected());
    }
}
