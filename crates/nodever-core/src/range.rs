//! npm-style semantic version ranges.
//!
//! A range is held as a union of intervals over semver versions, one
//! interval per `||` alternative. Comparators inside an alternative are
//! intersected while parsing, so two ranges intersect exactly when some
//! pair of their intervals overlaps.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted version component, the same cap npm applies.
pub const MAX_COMPONENT: u64 = (1 << 53) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid version '{0}'")]
    InvalidVersion(String),
    #[error("invalid comparator '{0}'")]
    InvalidComparator(String),
    #[error("invalid hyphen range '{0}'")]
    InvalidHyphen(String),
}

/// One dot-separated prerelease identifier. Numeric identifiers sort
/// before alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    Numeric(u64),
    Alphanumeric(String),
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Alphanumeric(s) => f.write_str(s),
        }
    }
}

/// A concrete version. Build metadata is dropped when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Empty for releases.
    pub pre: Vec<Identifier>,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Vec::new(),
        }
    }

    /// The lowest version of this release, `<major>.<minor>.<patch>-0`.
    fn first_prerelease(mut self) -> Self {
        self.pre = vec![Identifier::Numeric(0)];
        self
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                // a prerelease sorts below its release
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (index, id) in self.pre.iter().enumerate() {
            f.write_str(if index == 0 { "-" } else { "." })?;
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = RangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Partial::parse(value.trim())?
            .full()
            .ok_or_else(|| RangeError::InvalidVersion(value.to_string()))
    }
}

/// A version with optional trailing components, as written in ranges (`12`, `8.10.x`, `*`).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Vec<Identifier>,
}

impl Partial {
    fn parse(text: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidVersion(text.to_string());

        let stripped = text.trim_start_matches(['v', '=']);
        let without_build = stripped.split('+').next().unwrap_or_default();
        let (core, pre) = match without_build.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (without_build, None),
        };
        if core.is_empty() {
            return Err(invalid());
        }

        let mut components = [None; 3];
        let mut wildcard = false;
        for (index, part) in core.split('.').enumerate() {
            if index >= components.len() {
                return Err(invalid());
            }
            match part {
                "x" | "X" | "*" => wildcard = true,
                "" => return Err(invalid()),
                digits if digits.bytes().all(|b| b.is_ascii_digit()) => {
                    let value = digits
                        .parse::<u64>()
                        .ok()
                        .filter(|v| *v <= MAX_COMPONENT)
                        .ok_or_else(invalid)?;
                    // `1.x.3` means `1.x`
                    if !wildcard {
                        components[index] = Some(value);
                    }
                }
                _ => return Err(invalid()),
            }
        }

        let pre = match pre {
            None => Vec::new(),
            // prerelease tags only attach to complete versions
            Some(_) if components.iter().any(Option::is_none) => return Err(invalid()),
            Some(pre) => parse_prerelease(pre).ok_or_else(invalid)?,
        };

        Ok(Self {
            major: components[0],
            minor: components[1],
            patch: components[2],
            pre,
        })
    }

    fn floor(&self) -> Version {
        Version {
            major: self.major.unwrap_or(0),
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            pre: self.pre.clone(),
        }
    }

    fn full(&self) -> Option<Version> {
        Some(Version {
            major: self.major?,
            minor: self.minor?,
            patch: self.patch?,
            pre: self.pre.clone(),
        })
    }

    /// First release past the wildcard part: `1` -> `2.0.0`, `1.2` -> `1.3.0`.
    /// `None` for `*` and for complete versions.
    fn ceiling(&self) -> Option<Version> {
        match (self.major, self.minor, self.patch) {
            (Some(major), None, _) => Some(Version::new(major + 1, 0, 0)),
            (Some(major), Some(minor), None) => Some(Version::new(major, minor + 1, 0)),
            _ => None,
        }
    }
}

fn parse_prerelease(text: &str) -> Option<Vec<Identifier>> {
    text.split('.')
        .map(|id| {
            if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
                None
            } else if id.bytes().all(|b| b.is_ascii_digit()) {
                id.parse().ok().map(Identifier::Numeric)
            } else {
                Some(Identifier::Alphanumeric(id.to_string()))
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    version: Version,
    inclusive: bool,
}

impl Bound {
    const fn inclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: true,
        }
    }

    const fn exclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Interval {
    lower: Bound,
    upper: Option<Bound>,
}

impl Interval {
    fn any() -> Self {
        Self {
            lower: Bound::inclusive(Version::new(0, 0, 0).first_prerelease()),
            upper: None,
        }
    }

    fn new(lower: Bound, upper: Option<Bound>) -> Option<Self> {
        let interval = Self { lower, upper };
        (!interval.is_empty()).then_some(interval)
    }

    fn at_least(lower: Bound) -> Option<Self> {
        Self::new(lower, None)
    }

    fn until(upper: Bound) -> Option<Self> {
        Self::new(Self::any().lower, Some(upper))
    }

    /// `[lower, upper)`, where `upper` excludes the prereleases of that release too.
    fn between(lower: Version, upper: Option<Version>) -> Option<Self> {
        Self::new(
            Bound::inclusive(lower),
            upper.map(|v| Bound::exclusive(v.first_prerelease())),
        )
    }

    fn is_empty(&self) -> bool {
        match &self.upper {
            None => false,
            Some(upper) => match self.lower.version.cmp(&upper.version) {
                Ordering::Greater => true,
                Ordering::Equal => !(self.lower.inclusive && upper.inclusive),
                Ordering::Less => false,
            },
        }
    }

    fn intersect(&self, other: &Self) -> Option<Self> {
        let lower = match self.lower.version.cmp(&other.lower.version) {
            Ordering::Greater => self.lower.clone(),
            Ordering::Less => other.lower.clone(),
            Ordering::Equal => Bound {
                version: self.lower.version.clone(),
                inclusive: self.lower.inclusive && other.lower.inclusive,
            },
        };

        let upper = match (&self.upper, &other.upper) {
            (None, bound) | (bound, None) => bound.clone(),
            (Some(a), Some(b)) => Some(match a.version.cmp(&b.version) {
                Ordering::Less => a.clone(),
                Ordering::Greater => b.clone(),
                Ordering::Equal => Bound {
                    version: a.version.clone(),
                    inclusive: a.inclusive && b.inclusive,
                },
            }),
        };

        Self::new(lower, upper)
    }

    fn contains(&self, version: &Version) -> bool {
        let above_lower = if self.lower.inclusive {
            *version >= self.lower.version
        } else {
            *version > self.lower.version
        };
        let below_upper = match &self.upper {
            None => true,
            Some(upper) if upper.inclusive => *version <= upper.version,
            Some(upper) => *version < upper.version,
        };
        above_lower && below_upper
    }
}

/// A parsed version range that keeps the text it was written as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    raw: String,
    intervals: Vec<Interval>,
}

impl VersionRange {
    /// Parses a range such as `12.x`, `>=10 <13`, `^14.1.0 || 16` or `8.10.0 - 8.12`.
    pub fn parse(text: &str) -> Result<Self, RangeError> {
        let mut intervals = Vec::new();
        for alternative in text.split("||") {
            if let Some(interval) = parse_comparator_set(alternative)? {
                intervals.push(interval);
            }
        }
        Ok(Self {
            raw: text.trim().to_string(),
            intervals,
        })
    }

    /// All releases of one major line, written `<major>.x`.
    pub fn major_line(major: u64) -> Self {
        Self::from_partial(
            format!("{major}.x"),
            &Partial {
                major: Some(major),
                minor: None,
                patch: None,
                pre: Vec::new(),
            },
        )
    }

    /// All patch releases of one minor line, written `<major>.<minor>.x`.
    pub fn minor_line(major: u64, minor: u64) -> Self {
        Self::from_partial(
            format!("{major}.{minor}.x"),
            &Partial {
                major: Some(major),
                minor: Some(minor),
                patch: None,
                pre: Vec::new(),
            },
        )
    }

    fn from_partial(raw: String, partial: &Partial) -> Self {
        Self {
            raw,
            intervals: Interval::between(partial.floor(), partial.ceiling())
                .into_iter()
                .collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when no version can satisfy the range, e.g. `>2 <1`.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// True when at least one version satisfies both ranges.
    pub fn intersects(&self, other: &Self) -> bool {
        self.intervals
            .iter()
            .any(|a| other.intervals.iter().any(|b| a.intersect(b).is_some()))
    }

    pub fn satisfies(&self, version: &Version) -> bool {
        self.intervals.iter().any(|i| i.contains(version))
    }
}

impl Display for VersionRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionRange {
    type Err = RangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for VersionRange {
    type Error = RangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionRange> for String {
    fn from(range: VersionRange) -> Self {
        range.raw
    }
}

const OPERATORS: [&str; 8] = [">=", "<=", "~>", ">", "<", "=", "~", "^"];

/// Parses one `||` alternative. `Ok(None)` means the comparators can never be satisfied together.
fn parse_comparator_set(text: &str) -> Result<Option<Interval>, RangeError> {
    let tokens = join_operators(text.split_whitespace().collect());

    if tokens.iter().any(|t| t == "-") {
        return match tokens.as_slice() {
            [from, dash, to] if dash == "-" => parse_hyphen(from, to),
            _ => Err(RangeError::InvalidHyphen(text.trim().to_string())),
        };
    }

    let mut acc = Some(Interval::any());
    for token in &tokens {
        let next = parse_comparator(token)?;
        acc = match (acc, next) {
            (Some(a), Some(b)) => a.intersect(&b),
            _ => None,
        };
    }
    Ok(acc)
}

/// Glues a bare operator to the version that follows it: `>= 1.2` becomes `>=1.2`.
fn join_operators(raw: Vec<&str>) -> Vec<String> {
    let mut tokens = Vec::with_capacity(raw.len());
    let mut pending: Option<&str> = None;
    for token in raw {
        match pending.take() {
            Some(op) => tokens.push(format!("{op}{token}")),
            None if OPERATORS.contains(&token) => pending = Some(token),
            None => tokens.push(token.to_string()),
        }
    }
    if let Some(op) = pending {
        tokens.push(op.to_string());
    }
    tokens
}

fn split_operator(token: &str) -> (&str, &str) {
    OPERATORS
        .iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", token))
}

fn parse_comparator(token: &str) -> Result<Option<Interval>, RangeError> {
    let (op, rest) = split_operator(token);
    if rest.is_empty() {
        return Err(RangeError::InvalidComparator(token.to_string()));
    }
    let partial = Partial::parse(rest)?;
    let Some(major) = partial.major else {
        // `>*` and `<*` match nothing; every other operator on `*` matches everything.
        return Ok(match op {
            ">" | "<" => None,
            _ => Some(Interval::any()),
        });
    };

    let interval = match op {
        "" | "=" => match partial.full() {
            Some(version) => Interval::new(
                Bound::inclusive(version.clone()),
                Some(Bound::inclusive(version)),
            ),
            None => Interval::between(partial.floor(), partial.ceiling()),
        },
        ">" => match (partial.full(), partial.ceiling()) {
            (Some(version), _) => Interval::at_least(Bound::exclusive(version)),
            (None, Some(ceiling)) => Interval::at_least(Bound::inclusive(ceiling)),
            (None, None) => None,
        },
        ">=" => Interval::at_least(Bound::inclusive(partial.floor())),
        "<" => match partial.full() {
            Some(version) => Interval::until(Bound::exclusive(version)),
            None => Interval::until(Bound::exclusive(partial.floor().first_prerelease())),
        },
        "<=" => match (partial.full(), partial.ceiling()) {
            (Some(version), _) => Interval::until(Bound::inclusive(version)),
            (None, Some(ceiling)) => {
                Interval::until(Bound::exclusive(ceiling.first_prerelease()))
            }
            (None, None) => Some(Interval::any()),
        },
        "~" | "~>" => {
            let upper = match partial.minor {
                Some(minor) => Version::new(major, minor + 1, 0),
                None => Version::new(major + 1, 0, 0),
            };
            Interval::between(partial.floor(), Some(upper))
        }
        "^" => {
            let upper = match (major, partial.minor, partial.patch) {
                (0, Some(0), Some(patch)) => Version::new(0, 0, patch + 1),
                (0, Some(minor), _) => Version::new(0, minor + 1, 0),
                _ => Version::new(major + 1, 0, 0),
            };
            Interval::between(partial.floor(), Some(upper))
        }
        _ => return Err(RangeError::InvalidComparator(token.to_string())),
    };

    Ok(interval)
}

fn parse_hyphen(from: &str, to: &str) -> Result<Option<Interval>, RangeError> {
    let from = Partial::parse(from)?;
    let to = Partial::parse(to)?;

    let lower = Bound::inclusive(from.floor());
    let upper = match (to.full(), to.ceiling()) {
        (Some(version), _) => Some(Bound::inclusive(version)),
        (None, Some(ceiling)) => Some(Bound::exclusive(ceiling.first_prerelease())),
        (None, None) => None,
    };
    Ok(Interval::new(lower, upper))
}
