//! Package version parsing and comparison.
//!
//! Package versions use the form `MAJOR.MINOR[.PATCH][ (Beta N)]`. Betas
//! order strictly before the release with the same numeric components, and
//! trailing zeros are insignificant (`1.10` equals `1.10.0`). Tag names
//! encode the beta marker as `-Beta_N`; the compact `1.10b4` form is also
//! accepted.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_util::errors::StrataError;

/// The two package identification schemes.
///
/// First-generation packages are identified by namespace plus a human
/// version string; second-generation packages by an opaque version id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageType {
    #[serde(rename = "1GP")]
    FirstGen,
    #[serde(rename = "2GP")]
    SecondGen,
}

impl FromStr for PackageType {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1GP" => Ok(Self::FirstGen),
            "2GP" => Ok(Self::SecondGen),
            _ => Err(StrataError::DependencyParse {
                message: format!("Unknown package type: {s}"),
            }),
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstGen => f.write_str("1GP"),
            Self::SecondGen => f.write_str("2GP"),
        }
    }
}

/// A parsed package version with total ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion {
    original: String,
    major: u32,
    minor: u32,
    patch: u32,
    beta: Option<u32>,
}

impl PackageVersion {
    /// Parse a version string like `1.10`, `1.10.2`, or `1.10 (Beta 4)`.
    pub fn parse(input: &str) -> Result<Self, StrataError> {
        let s = input.trim();
        let malformed = || StrataError::MalformedVersion {
            input: input.to_string(),
        };

        let (main, beta) = split_beta(s).ok_or_else(malformed)?;

        let mut numbers = Vec::with_capacity(3);
        for part in main.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            numbers.push(part.parse::<u32>().map_err(|_| malformed())?);
        }

        let (major, minor, patch) = match numbers.as_slice() {
            [major, minor] => (*major, *minor, 0),
            [major, minor, patch] => (*major, *minor, *patch),
            _ => return Err(malformed()),
        };

        Ok(Self {
            original: s.to_string(),
            major,
            minor,
            patch,
            beta,
        })
    }

    /// Parse a version from a tag name, stripping a beta or release prefix.
    ///
    /// `release/1.5` with prefix `release/` parses as `1.5`; a beta tag like
    /// `beta/1.2-Beta_3` parses as the third beta of 1.2.
    pub fn parse_tag(
        tag: &str,
        prefix_beta: &str,
        prefix_release: &str,
    ) -> Result<Self, StrataError> {
        let version = tag
            .strip_prefix(prefix_beta)
            .or_else(|| tag.strip_prefix(prefix_release))
            .unwrap_or(tag);
        Self::parse(version)
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn beta(&self) -> Option<u32> {
        self.beta
    }

    pub fn is_beta(&self) -> bool {
        self.beta.is_some()
    }

    /// The comparison key. A release sorts after every beta of the same
    /// numeric components.
    fn key(&self) -> (u32, u32, u32, u64) {
        let beta = self.beta.map(u64::from).unwrap_or(u64::MAX);
        (self.major, self.minor, self.patch, beta)
    }
}

fn split_beta(s: &str) -> Option<(&str, Option<u32>)> {
    if let Some((main, rest)) = s.split_once(" (") {
        let inner = rest.strip_suffix(')')?;
        let n = inner
            .strip_prefix("Beta ")
            .or_else(|| inner.strip_prefix("beta "))?;
        return Some((main, Some(n.parse().ok()?)));
    }
    if let Some((main, rest)) = s.split_once("-Beta_") {
        return Some((main, Some(rest.parse().ok()?)));
    }
    // Compact form: `1.10b4`
    if let Some(pos) = s.rfind('b') {
        let digits = &s[pos + 1..];
        if !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && s[..pos].ends_with(|c: char| c.is_ascii_digit())
        {
            return Some((&s[..pos], Some(digits.parse().ok()?)));
        }
    }
    Some((s, None))
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PackageVersion {}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl TryFrom<String> for PackageVersion {
    type Error = StrataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PackageVersion> for String {
    fn from(version: PackageVersion) -> Self {
        version.original
    }
}

impl FromStr for PackageVersion {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
