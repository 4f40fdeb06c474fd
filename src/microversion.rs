//! API microversions and version-banded variants.
//!
//! Requests declare the microversion they target (`2.75`). Each operation
//! keeps one schema per band of versions; [`Versioned::select`] picks the
//! variant governing a given request.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A `major.minor` API version.
///
/// Ordering is numeric per component, so `2.9 < 2.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    major: u32,
    minor: u32,
}

impl ApiVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn major(self) -> u32 {
        self.major
    }

    pub fn minor(self) -> u32 {
        self.minor
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A version string that is not `major.minor`, or a range whose bounds are
/// reversed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("invalid API version {0:?}: expected <major>.<minor>")]
    Malformed(String),

    #[error("invalid version range: minimum {min} is greater than maximum {max}")]
    Reversed { min: ApiVersion, max: ApiVersion },
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    /// Parses `"2.1"`. Components are decimal without sign; `"2.01"` is
    /// accepted as `2.1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || VersionParseError::Malformed(s.to_string());
        let (major, minor) = s.split_once('.').ok_or_else(malformed)?;
        let component = |part: &str| {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse::<u32>().map_err(|_| malformed())
        };
        Ok(Self::new(component(major)?, component(minor)?))
    }
}

/// An inclusive band of versions, open-ended upward when `max` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionRange {
    min: ApiVersion,
    max: Option<ApiVersion>,
}

impl VersionRange {
    /// Every version from `min` onward.
    pub fn starting_at(min: ApiVersion) -> Self {
        Self { min, max: None }
    }

    /// `min..=max`.
    pub fn between(min: ApiVersion, max: ApiVersion) -> Result<Self, VersionParseError> {
        if min > max {
            return Err(VersionParseError::Reversed { min, max });
        }
        Ok(Self {
            min,
            max: Some(max),
        })
    }

    /// Parses bounds written as strings, e.g. `("2.25", Some("2.29"))`.
    pub fn parse(min: &str, max: Option<&str>) -> Result<Self, VersionParseError> {
        let min = min.parse()?;
        match max {
            Some(max) => Self::between(min, max.parse()?),
            None => Ok(Self::starting_at(min)),
        }
    }

    pub fn min(&self) -> ApiVersion {
        self.min
    }

    pub fn max(&self) -> Option<ApiVersion> {
        self.max
    }

    pub fn contains(&self, version: ApiVersion) -> bool {
        version >= self.min && self.max.map(|max| version <= max).unwrap_or(true)
    }

    pub fn overlaps(&self, other: &VersionRange) -> bool {
        let below =
            |a: &VersionRange, b: &VersionRange| a.max.map(|max| max < b.min).unwrap_or(false);
        !below(self, other) && !below(other, self)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

/// A new variant's range intersects one already registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("version range {new} overlaps existing range {existing}")]
pub struct VersionOverlap {
    pub existing: VersionRange,
    pub new: VersionRange,
}

/// Values keyed by disjoint version ranges.
///
/// # Example
///
/// ```rust
/// use schemagate::microversion::{ApiVersion, VersionRange, Versioned};
///
/// let mut variants = Versioned::new();
/// variants.insert(VersionRange::parse("2.1", Some("2.74")).unwrap(), "open").unwrap();
/// variants.insert(VersionRange::parse("2.75", None).unwrap(), "closed").unwrap();
///
/// assert_eq!(variants.select(ApiVersion::new(2, 74)), Some(&"open"));
/// assert_eq!(variants.select(ApiVersion::new(2, 90)), Some(&"closed"));
/// assert_eq!(variants.select(ApiVersion::new(1, 0)), None);
/// ```
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    variants: Vec<(VersionRange, T)>,
}

impl<T> Default for Versioned<T> {
    fn default() -> Self {
        Self {
            variants: Vec::new(),
        }
    }
}

impl<T> Versioned<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variant. Variants are kept sorted by minimum version.
    pub fn insert(&mut self, range: VersionRange, value: T) -> Result<(), VersionOverlap> {
        if let Some((existing, _)) = self.variants.iter().find(|(r, _)| r.overlaps(&range)) {
            return Err(VersionOverlap {
                existing: *existing,
                new: range,
            });
        }
        let position = self
            .variants
            .partition_point(|(r, _)| r.min() < range.min());
        self.variants.insert(position, (range, value));
        Ok(())
    }

    /// The variant governing `version`: among the ranges containing it, the
    /// one with the highest minimum.
    pub fn select(&self, version: ApiVersion) -> Option<&T> {
        self.variants
            .iter()
            .rev()
            .find(|(range, _)| range.contains(version))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Variants in ascending order of their minimum version.
    pub fn iter(&self) -> impl Iterator<Item = (&VersionRange, &T)> {
        self.variants.iter().map(|(range, value)| (range, value))
    }
}
