//! Request payloads sent to the Wharf API.
//!
//! All payloads serialise with camelCase field names, matching the server's
//! JSON contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identifiers::{BuildId, ProviderId, TokenId, WorkerLogId, WorkerStepId};
use crate::types::{BuildStatus, ProviderName, Timestamp};

/// Placeholder printed instead of secret values in `Debug` output.
const REDACTED: &str = "*REDACTED*";

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Fields for creating a new token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewToken {
    pub token: String,
    pub user_name: String,
    pub provider_id: ProviderId,
}

impl std::fmt::Debug for NewToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewToken")
            .field("token", &REDACTED)
            .field("user_name", &self.user_name)
            .field("provider_id", &self.provider_id)
            .finish()
    }
}

/// Fields for updating an existing token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUpdate {
    pub token: String,
    pub user_name: String,
}

impl std::fmt::Debug for TokenUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenUpdate")
            .field("token", &REDACTED)
            .field("user_name", &self.user_name)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// Fields for adding a branch to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBranch {
    pub name: String,
    pub default: bool,
}

/// A single branch in a [`BranchListUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchUpdate {
    pub name: String,
}

/// Replaces all branches of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchListUpdate {
    pub default_branch: Option<String>,
    pub branches: Vec<BranchUpdate>,
}

// ---------------------------------------------------------------------------
// Builds
// ---------------------------------------------------------------------------

/// A single log line, or a build status update.
///
/// When `status` is set the server updates the build's status and ignores
/// `message` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogOrStatusUpdate {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BuildStatus>,
}

impl LogOrStatusUpdate {
    /// A log line stamped with the current time.
    pub fn log(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Timestamp::now(),
            status: None,
        }
    }

    /// A status change stamped with the current time.
    pub fn status(status: BuildStatus) -> Self {
        Self {
            message: String::new(),
            timestamp: Timestamp::now(),
            status: Some(status),
        }
    }
}

/// Sets the status of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatusUpdate {
    pub status: BuildStatus,
}

/// Input variables used when starting a build, keyed by variable name.
///
/// Values may be strings, booleans or numbers.
pub type BuildInputs = BTreeMap<String, serde_json::Value>;

/// Query parameters for starting a build of a project stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectBuildRequest {
    pub stage: String,
    pub branch: Option<String>,
    pub environment: Option<String>,
    pub engine: Option<String>,
}

impl ProjectBuildRequest {
    /// Starts `stage` on the project's default branch and engine.
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            ..Self::default()
        }
    }
}

/// A log line sent over the build log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLog {
    pub build_id: BuildId,
    pub worker_log_id: WorkerLogId,
    pub worker_step_id: WorkerStepId,
    pub timestamp: Timestamp,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Fields for creating a new project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub group_name: String,
    pub description: String,
    pub avatar_url: String,
    pub token_id: TokenId,
    pub provider_id: ProviderId,
    pub build_definition: String,
    pub git_url: String,
    pub remote_project_id: String,
}

/// Fields for updating an existing project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub name: String,
    pub group_name: String,
    pub description: String,
    pub avatar_url: String,
    pub token_id: TokenId,
    pub provider_id: ProviderId,
    pub build_definition: String,
    pub git_url: String,
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Fields for creating a new provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProvider {
    pub name: ProviderName,
    pub url: String,
    pub token_id: TokenId,
}

/// Fields for updating an existing provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUpdate {
    pub name: ProviderName,
    pub url: String,
    pub token_id: TokenId,
}
