use serde::Serialize;

/// Where the requested range came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeSource {
    /// Passed on the command line.
    Flag,
    /// `engines.node` in the project manifest.
    Manifest,
    /// `project.default_range` in the configuration file.
    ProjectDefault,
    /// Nothing was requested.
    None,
}

/// The range handed to the resolver, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeRequest {
    pub range: Option<String>,
    pub source: RangeSource,
}

impl RangeRequest {
    /// Picks the first available range: flag, then manifest, then project default.
    pub fn select(
        flag: Option<&str>,
        manifest: Option<String>,
        project_default: Option<&str>,
    ) -> Self {
        if let Some(range) = flag {
            return Self::new(Some(range.to_string()), RangeSource::Flag);
        }
        if let Some(range) = manifest {
            return Self::new(Some(range), RangeSource::Manifest);
        }
        if let Some(range) = project_default {
            return Self::new(Some(range.to_string()), RangeSource::ProjectDefault);
        }
        Self::new(None, RangeSource::None)
    }

    fn new(range: Option<String>, source: RangeSource) -> Self {
        Self { range, source }
    }

    /// Ranges the user did not write themselves count as auto-selected.
    pub fn auto_selected(&self) -> bool {
        matches!(self.source, RangeSource::ProjectDefault | RangeSource::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_takes_precedence() {
        let req = RangeRequest::select(Some("10.x"), Some("12.x".to_string()), Some("8.x"));
        assert_eq!(req.range.as_deref(), Some("10.x"));
        assert_eq!(req.source, RangeSource::Flag);
        assert!(!req.auto_selected());
    }

    #[test]
    fn manifest_beats_project_default() {
        let req = RangeRequest::select(None, Some("12.x".to_string()), Some("8.x"));
        assert_eq!(req.source, RangeSource::Manifest);
        assert!(!req.auto_selected());
    }

    #[test]
    fn project_default_and_nothing_are_auto_selected() {
        let req = RangeRequest::select(None, None, Some("8.x"));
        assert_eq!(req.source, RangeSource::ProjectDefault);
        assert!(req.auto_selected());

        let req = RangeRequest::select(None, None, None);
        assert_eq!(req.range, None);
        assert!(req.auto_selected());
    }
}
