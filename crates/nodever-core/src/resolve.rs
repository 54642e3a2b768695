use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::catalog::{RuntimeCatalog, RuntimeOption};
use crate::error::ResolutionError;
use crate::range::VersionRange;

/// Notice attached to a successful resolution whose runtime is scheduled
/// for discontinuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub range: String,
    pub discontinued_at: NaiveDate,
}

/// The runtime a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved<'a> {
    pub option: &'a RuntimeOption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Advisory>,
}

/// Selects the runtime for a project.
///
/// Without a requested range the oldest runtime is used. With one, the
/// newest runtime whose range intersects it wins. Either way the selection
/// must not be discontinued at `now`. `auto_selected` only changes how
/// errors are worded.
///
/// # Errors
/// [`ResolutionError::InvalidRange`] when nothing matches (an unparsable
/// range never matches), [`ResolutionError::Discontinued`] when the
/// selection is past its discontinuation date.
#[instrument(skip(catalog), fields(runtimes = catalog.options().len()))]
pub fn resolve<'a>(
    catalog: &'a RuntimeCatalog,
    requested_range: Option<&str>,
    auto_selected: bool,
    now: DateTime<Utc>,
) -> Result<Resolved<'a>, ResolutionError> {
    let mut selection = catalog.oldest();

    if let Some(requested) = requested_range {
        selection = newest_match(catalog, requested)
            .ok_or_else(|| invalid_range(catalog, requested, auto_selected, now))?;
    } else {
        debug!("no range requested, falling back to {}", selection.range);
    }

    if selection.is_discontinued(now) {
        return Err(ResolutionError::Discontinued {
            selection: selection.clone(),
            requested_range: requested_range.map(ToOwned::to_owned),
            auto_selected,
        });
    }

    let advisory = selection
        .discontinued_at
        .filter(|_| selection.is_discontinuing(now))
        .map(|discontinued_at| Advisory {
            range: selection.range.to_string(),
            discontinued_at,
        });
    if let Some(advisory) = &advisory {
        warn!("{advisory}");
    }

    debug!("selected {} ({})", selection.runtime, selection.range);
    Ok(Resolved {
        option: selection,
        advisory,
    })
}

/// The error for a requested range no runtime can serve, listing the
/// ranges still supported at `now`.
pub fn invalid_range(
    catalog: &RuntimeCatalog,
    requested: &str,
    auto_selected: bool,
    now: DateTime<Utc>,
) -> ResolutionError {
    ResolutionError::InvalidRange {
        requested_range: requested.to_string(),
        auto_selected,
        supported: catalog.supported_ranges(now),
    }
}

/// First option in catalog order whose range intersects `requested`.
fn newest_match<'a>(catalog: &'a RuntimeCatalog, requested: &str) -> Option<&'a RuntimeOption> {
    let requested = match VersionRange::parse(requested) {
        Ok(range) => range,
        Err(e) => {
            debug!("requested range '{}' does not parse: {}", requested, e);
            return None;
        }
    };

    catalog.options().iter().find(|option| {
        let hit = option.range.intersects(&requested);
        debug!("{} against {}: {}", option.range, requested, hit);
        hit
    })
}
