use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::error::CatalogError;
use crate::range::VersionRange;

/// One deployable Node.js runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeOption {
    /// Major version number, e.g. `12`.
    pub major: u32,
    /// The range of releases this runtime satisfies, e.g. `12.x`.
    pub range: VersionRange,
    /// Opaque runtime tag handed to the deployment backend, e.g. `nodejs12.x`.
    pub runtime: String,
    /// First day on which the runtime can no longer be selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discontinued_at: Option<NaiveDate>,
}

impl RuntimeOption {
    /// Builds an option from configuration text, parsing its range.
    pub fn parse(
        major: u32,
        range: &str,
        runtime: impl Into<String>,
        discontinued_at: Option<NaiveDate>,
    ) -> Result<Self, CatalogError> {
        let parsed = VersionRange::parse(range).map_err(|source| CatalogError::InvalidRange {
            range: range.to_string(),
            source,
        })?;
        Ok(Self {
            major,
            range: parsed,
            runtime: runtime.into(),
            discontinued_at,
        })
    }

    /// The instant discontinuation takes effect: midnight UTC of `discontinued_at`.
    pub fn discontinued_from(&self) -> Option<DateTime<Utc>> {
        self.discontinued_at
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Discontinued once `now` reaches the discontinuation instant.
    pub fn is_discontinued(&self, now: DateTime<Utc>) -> bool {
        self.discontinued_from().is_some_and(|from| from <= now)
    }

    /// Announced for discontinuation but still selectable.
    pub fn is_discontinuing(&self, now: DateTime<Utc>) -> bool {
        self.discontinued_from().is_some_and(|from| from > now)
    }
}

/// Known runtimes, ordered newest to oldest. The order decides which
/// runtime wins when several match a requested range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeCatalog {
    options: Vec<RuntimeOption>,
}

impl RuntimeCatalog {
    /// Validates and wraps a list of options.
    ///
    /// # Errors
    /// Fails on an empty list, a zero major, or majors that are not
    /// strictly descending.
    pub fn new(options: Vec<RuntimeOption>) -> Result<Self, CatalogError> {
        if options.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(option) = options.iter().find(|o| o.major == 0) {
            return Err(CatalogError::InvalidMajor {
                runtime: option.runtime.clone(),
            });
        }
        for pair in options.windows(2) {
            let (previous, next) = (pair[0].major, pair[1].major);
            if previous == next {
                return Err(CatalogError::DuplicateMajor { major: next });
            }
            if previous < next {
                return Err(CatalogError::OutOfOrder { previous, next });
            }
        }
        Ok(Self { options })
    }

    /// The runtimes the deployment platform ships with.
    pub fn builtin() -> Self {
        Self {
            options: vec![
                RuntimeOption {
                    major: 12,
                    range: VersionRange::major_line(12),
                    runtime: "nodejs12.x".to_string(),
                    discontinued_at: None,
                },
                RuntimeOption {
                    major: 10,
                    range: VersionRange::major_line(10),
                    runtime: "nodejs10.x".to_string(),
                    discontinued_at: None,
                },
                RuntimeOption {
                    major: 8,
                    range: VersionRange::minor_line(8, 10),
                    runtime: "nodejs8.10".to_string(),
                    discontinued_at: NaiveDate::from_ymd_opt(2020, 1, 6),
                },
            ],
        }
    }

    pub fn options(&self) -> &[RuntimeOption] {
        &self.options
    }

    /// The newest runtime.
    pub fn latest(&self) -> &RuntimeOption {
        &self.options[0]
    }

    /// The oldest runtime, used when a project asks for no particular range.
    pub fn oldest(&self) -> &RuntimeOption {
        &self.options[self.options.len() - 1]
    }

    /// Runtimes that are still selectable at `now`, in catalog order.
    pub fn supported(&self, now: DateTime<Utc>) -> impl Iterator<Item = &RuntimeOption> {
        self.options.iter().filter(move |o| !o.is_discontinued(now))
    }

    pub fn supported_ranges(&self, now: DateTime<Utc>) -> Vec<String> {
        self.supported(now).map(|o| o.range.to_string()).collect()
    }
}

impl Default for RuntimeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> DateTime<Utc> {
        date.parse::<NaiveDate>()
            .expect("date should parse")
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    fn option(major: u32, range: &str) -> RuntimeOption {
        RuntimeOption::parse(major, range, format!("nodejs{major}.x"), None)
            .expect("option should parse")
    }

    #[test]
    fn builtin_catalog_passes_validation() {
        let builtin = RuntimeCatalog::builtin();
        let rebuilt = RuntimeCatalog::new(builtin.options().to_vec()).expect("builtin is valid");
        assert_eq!(rebuilt, builtin);
        assert_eq!(builtin.latest().runtime, "nodejs12.x");
        assert_eq!(builtin.oldest().range.as_str(), "8.10.x");
    }

    #[test]
    fn discontinuation_starts_at_midnight_utc() {
        let mut opt = option(8, "8.10.x");
        opt.discontinued_at = NaiveDate::from_ymd_opt(2020, 1, 6);

        let just_before = at("2020-01-06") - chrono::Duration::seconds(1);
        assert!(!opt.is_discontinued(just_before));
        assert!(opt.is_discontinuing(just_before));

        assert!(opt.is_discontinued(at("2020-01-06")));
        assert!(!opt.is_discontinuing(at("2020-01-06")));
    }

    #[test]
    fn option_without_date_is_never_discontinued() {
        let opt = option(12, "12.x");
        assert!(!opt.is_discontinued(at("2999-01-01")));
        assert!(!opt.is_discontinuing(at("2000-01-01")));
    }

    #[test]
    fn supported_ranges_skip_discontinued_options() {
        let catalog = RuntimeCatalog::builtin();
        assert_eq!(catalog.supported_ranges(at("2026-10-19")), vec!["12.x", "10.x"]);
        assert_eq!(
            catalog.supported_ranges(at("2019-06-01")),
            vec!["12.x", "10.x", "8.10.x"]
        );
    }

    #[test]
    fn rejects_invalid_catalogs() {
        assert_eq!(RuntimeCatalog::new(vec![]), Err(CatalogError::Empty));
        assert_eq!(
            RuntimeCatalog::new(vec![option(10, "10.x"), option(12, "12.x")]),
            Err(CatalogError::OutOfOrder {
                previous: 10,
                next: 12
            })
        );
        assert_eq!(
            RuntimeCatalog::new(vec![option(12, "12.x"), option(12, "12.16.x")]),
            Err(CatalogError::DuplicateMajor { major: 12 })
        );
        assert!(matches!(
            RuntimeCatalog::new(vec![option(0, "0.x")]),
            Err(CatalogError::InvalidMajor { .. })
        ));
        assert!(matches!(
            RuntimeOption::parse(14, "fourteen", "nodejs14.x", None),
            Err(CatalogError::InvalidRange { .. })
        ));
    }
}
