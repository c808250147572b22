use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic version as recorded in a manifest (`major.minor.patch`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionNumber {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionNumber {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        VersionNumber {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `X.Y.Z` string.
    ///
    /// Unlike tag parsing there is no prefix stripping: the manifest field must
    /// hold exactly three dot-separated non-negative integers without leading
    /// zeros, pre-release or build metadata.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = semver::Version::parse(text).map_err(|e| {
            ReleaseError::format(format!("'{}' - expected X.Y.Z ({})", text, e))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(ReleaseError::format(format!(
                "'{}' - pre-release and build metadata are not supported",
                text
            )));
        }

        let version = VersionNumber::new(parsed.major, parsed.minor, parsed.patch);
        if [version.major, version.minor, version.patch].contains(&u64::MAX) {
            return Err(ReleaseError::format(format!(
                "'{}' - component too large to increment",
                text
            )));
        }

        Ok(version)
    }

    /// Derive the next version; `self` is left untouched
    pub fn increment(&self, kind: Increment) -> Result<Self> {
        let next = match kind {
            Increment::Major => self.major.checked_add(1).map(|major| VersionNumber {
                major,
                minor: 0,
                patch: 0,
            }),
            Increment::Minor => self.minor.checked_add(1).map(|minor| VersionNumber {
                minor,
                patch: 0,
                ..*self
            }),
            Increment::Patch => self.patch.checked_add(1).map(|patch| VersionNumber {
                patch,
                ..*self
            }),
        };

        next.ok_or_else(|| {
            ReleaseError::format(format!("{} - {} component overflows", self, kind.name()))
        })
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VersionNumber {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        VersionNumber::parse(s)
    }
}

/// Which component of the version an operator chose to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Increment {
    Major,
    #[default]
    Minor,
    Patch,
}

impl Increment {
    /// All choices in display order
    pub const ALL: [Increment; 3] = [Increment::Major, Increment::Minor, Increment::Patch];

    pub fn name(&self) -> &'static str {
        match self {
            Increment::Major => "Major",
            Increment::Minor => "Minor",
            Increment::Patch => "Patch",
        }
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
