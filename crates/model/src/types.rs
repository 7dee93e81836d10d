//! Shared value types for the Wharf API domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (versions are ordered numerically,
//! statuses form a closed set) and participate in client-side decisions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::VersionParseError;

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// A `major.minor.patch` semantic version.
///
/// Ordering is lexicographic on `(major, minor, patch)`. Pre-release and build
/// metadata are accepted by [`FromStr`] but dropped, so `5.1.0-rc.1` and
/// `5.1.0+abc` both compare equal to `5.1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SemVer {
    /// Major version, bumped on breaking changes.
    pub major: u64,
    /// Minor version, bumped on additive changes.
    pub minor: u64,
    /// Patch version, bumped on fixes.
    pub patch: u64,
}

impl SemVer {
    /// Creates a new [`SemVer`].
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for SemVer {
    type Err = VersionParseError;

    /// Parses `1.2.3`, `v1.2.3`, `1.2.3-rc.1` and `1.2.3+build`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionParseError {
            input: value.to_string(),
        };

        let trimmed = value.trim();
        let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        let core = trimmed
            .split(['-', '+'])
            .next()
            .filter(|core| !core.is_empty())
            .ok_or_else(invalid)?;

        let mut parts = core.split('.');
        let mut component = || -> Result<u64, VersionParseError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        };

        let major = component()?;
        let minor = component()?;
        let patch = component()?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl std::fmt::Display for SemVer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC point in time as exchanged with the API.
///
/// Serialises as an RFC-3339 string; query parameters use the same form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Utc::now().into()
    }

    pub fn from_utc(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// State of a build.
///
/// ```text
///            Scheduling
///                |
///                V
///             Running
///               / \
///  Completed <-/   \-> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildStatus {
    /// Registered, but no code execution has begun yet.
    Scheduling,
    /// Executing right now.
    Running,
    /// Finished execution successfully.
    Completed,
    /// Something went wrong: a misconfigured `.wharf-ci.yml` or a failing step.
    Failed,
}

impl BuildStatus {
    /// Returns the wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduling => "Scheduling",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Returns the numeric status ID used by the `statusId` fields.
    pub fn id(self) -> u8 {
        match self {
            Self::Scheduling => 0,
            Self::Running => 1,
            Self::Completed => 2,
            Self::Failed => 3,
        }
    }
}

impl FromStr for BuildStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "scheduling" => Ok(Self::Scheduling),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!(
                "unknown build status '{other}', expected one of: Scheduling, Running, Completed, Failed"
            )),
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider plugins available for importing projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    /// <https://github.com/iver-wharf/wharf-provider-azuredevops>
    AzureDevOps,
    /// <https://github.com/iver-wharf/wharf-provider-gitlab>
    GitLab,
    /// <https://github.com/iver-wharf/wharf-provider-github>
    GitHub,
}

impl ProviderName {
    /// Returns the wire name of the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AzureDevOps => "azuredevops",
            Self::GitLab => "gitlab",
            Self::GitHub => "github",
        }
    }
}

impl std::fmt::Display for ProviderName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated outcome of the test results of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestStatus {
    /// No failing tests and at least one passing test.
    Success,
    /// At least one failing test.
    Failed,
    /// Neither passing nor failing tests.
    #[serde(rename = "No tests")]
    NoTests,
}

/// Outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestResultStatus {
    /// The test passed.
    Success,
    /// The test failed.
    Failed,
    /// The test was skipped.
    Skipped,
}
