//! Server version type and ordering.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::Milestone;

static VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<major>[0-9]+)\.(?<minor>[0-9]+)\.(?<micro>[0-9]+)(?:\.[0-9]+)?$").unwrap()
});

/// A server release as advertised by the capabilities endpoint.
///
/// Holds the raw string and, when it parses as three dot-separated
/// non-negative integers (an optional fourth build component is tolerated),
/// the ordered `(major, minor, micro)` triple. Input that does not parse
/// yields the *unknown sentinel*: a version with no triple that orders below
/// every known release and fails every milestone check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerVersion {
    raw: String,
    triple: Option<(u64, u64, u64)>,
}

impl ServerVersion {
    /// Parse a version string. Never fails; unparseable input becomes the
    /// unknown sentinel.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let triple = Self::triple_of(&raw);
        Self { raw, triple }
    }

    /// Build a known version from its triple.
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            raw: format!("{major}.{minor}.{micro}"),
            triple: Some((major, minor, micro)),
        }
    }

    /// The unknown sentinel. Orders below every known version.
    pub fn unknown() -> Self {
        Self {
            raw: String::new(),
            triple: None,
        }
    }

    fn triple_of(s: &str) -> Option<(u64, u64, u64)> {
        let caps = VERSION_REGEX.captures(s.trim())?;
        let part = |name: &str| caps.name(name)?.as_str().parse::<u64>().ok();
        Some((part("major")?, part("minor")?, part("micro")?))
    }

    /// Whether the version string carried a parseable triple.
    pub fn is_known(&self) -> bool {
        self.triple.is_some()
    }

    /// The raw string as received from the server.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed `(major, minor, micro)` triple, absent for the sentinel.
    pub fn triple(&self) -> Option<(u64, u64, u64)> {
        self.triple
    }

    pub fn major(&self) -> Option<u64> {
        self.triple.map(|(major, _, _)| major)
    }

    pub fn minor(&self) -> Option<u64> {
        self.triple.map(|(_, minor, _)| minor)
    }

    pub fn micro(&self) -> Option<u64> {
        self.triple.map(|(_, _, micro)| micro)
    }

    /// True iff this version is known and orders at or above the milestone.
    /// The unknown sentinel compares below every milestone.
    pub fn is_newer_or_equal(&self, milestone: Milestone) -> bool {
        self.triple
            .map(|triple| triple >= milestone.triple())
            .unwrap_or(false)
    }
}

impl PartialOrd for ServerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServerVersion {
    // None < Some keeps the sentinel below every known version. Raw strings
    // break ties so the order stays consistent with equality.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.triple
            .cmp(&other.triple)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl From<&str> for ServerVersion {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            write!(f, "unknown")
        } else {
            write!(f, "{}", self.raw)
        }
    }
}

impl Serialize for ServerVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ServerVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(raw))
    }
}
