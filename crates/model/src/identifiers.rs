//! Newtype identifiers for Wharf resources.
//!
//! Every Wharf resource that has a database identity is represented as a
//! distinct newtype wrapping the `u64` the API assigns. This prevents
//! accidentally passing, for example, an [`ArtifactId`] where a [`BuildId`]
//! is expected, even though both serialise as plain JSON numbers.

use serde::{Deserialize, Serialize};

/// Declares a `u64` newtype with `new`, `as_u64`, `From<u64>` and `Display`.
/// Serialises as the bare number.
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub const fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers assigned by the database
// ---------------------------------------------------------------------------

u64_id! {
    /// Identifies a build: one execution of a project stage.
    BuildId
}

u64_id! {
    /// Identifies a project registered in Wharf.
    ProjectId
}

u64_id! {
    /// Identifies a branch belonging to a project.
    BranchId
}

u64_id! {
    /// Identifies a file uploaded as a build artifact.
    ///
    /// Test result summaries are keyed by the artifact they were parsed from.
    ArtifactId
}

u64_id! {
    /// Identifies a remote provider connection (GitLab, GitHub, Azure DevOps).
    ProviderId
}

u64_id! {
    /// Identifies a credential used by provider plugins.
    TokenId
}

u64_id! {
    /// Identifies a single stored log line of a build.
    LogId
}

u64_id! {
    /// Identifies a single test case parsed from a test result file.
    TestResultDetailId
}

u64_id! {
    /// Identifies the summary of one parsed test result file.
    TestResultSummaryId
}

u64_id! {
    /// Log line identifier assigned by the execution worker, not by the API.
    WorkerLogId
}

u64_id! {
    /// Step identifier assigned by the execution worker, not by the API.
    WorkerStepId
}

// ---------------------------------------------------------------------------
// Identifiers backed by configuration names
// ---------------------------------------------------------------------------

/// Identifies an execution engine as configured on the server
/// (e.g. `"jenkins"`, `"wharf-cmd"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(String);

impl EngineId {
    /// Returns `None` for an empty name; the server never assigns one.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!value.is_empty()).then_some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EngineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
