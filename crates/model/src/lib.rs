//! Domain model for the Wharf API client.
//!
//! This crate contains the request and response payloads, newtype identifiers,
//! search records, error types and the version compatibility gate. The
//! transport crate implements the [`VersionSource`] port defined here; it never
//! adds domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is sent and *when* a call is allowed; the client crate
//! defines *how* it travels.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`BuildId`, `ProjectId`, etc.) |
//! | [`types`] | Shared value types (`SemVer`, `Timestamp`, `BuildStatus`, etc.) |
//! | [`errors`] | Compatibility, query and problem errors |
//! | [`problem`] | RFC-7807 problem payloads |
//! | [`version`] | Version gate, flags and the `VersionSource` port |
//! | [`search`] | Search records and query encoding |
//! | [`request`] | Request payloads |
//! | [`response`] | Response payloads |

pub mod errors;
pub mod identifiers;
mod nullable;
pub mod problem;
pub mod request;
pub mod response;
pub mod search;
pub mod types;
pub mod version;

// Re-export the types most callers need at the crate root.
pub use errors::{CompatibilityError, ProblemError, QueryError, VersionFetchError, VersionParseError};
pub use identifiers::{
    ArtifactId, BranchId, BuildId, EngineId, LogId, ProjectId, ProviderId, TestResultDetailId,
    TestResultSummaryId, TokenId, WorkerLogId, WorkerStepId,
};
pub use problem::{is_problem_content_type, ProblemResponse, PROBLEM_CONTENT_TYPE};
pub use search::{
    ArtifactSearch, BuildSearch, ProjectSearch, ProviderSearch, Query, ToQuery, TokenSearch,
};
pub use types::{BuildStatus, ProviderName, SemVer, TestResultStatus, TestStatus, Timestamp};
pub use version::{
    ClientCompatibility, EndpointRequirement, VersionFlags, VersionGate, VersionSource,
    HIGHEST_SUPPORTED_VERSION,
};
