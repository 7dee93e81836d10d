//! Response payloads returned by the Wharf API.
//!
//! Every field defaults when absent so older and newer servers can be read
//! without failing on missing keys. List fields also accept `null`.

use serde::{Deserialize, Serialize};

use crate::identifiers::{
    ArtifactId, BranchId, BuildId, EngineId, LogId, ProjectId, ProviderId, TestResultDetailId,
    TestResultSummaryId, TokenId,
};
use crate::types::{BuildStatus, ProviderName, TestResultStatus, TestStatus, Timestamp};

/// Creation and last-update times shared by stored records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeMetadata {
    pub updated_at: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
}

/// One page of a list endpoint, with the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paginated<T> {
    #[serde(
        default = "Vec::new",
        deserialize_with = "crate::nullable::null_as_default"
    )]
    pub list: Vec<T>,
    #[serde(default)]
    pub total_count: i64,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            total_count: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

/// Version information reported by `GET /api/version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppVersion {
    /// Semantic version string, e.g. `"v5.1.2"`.
    pub version: String,
    pub build_git_commit: String,
    pub build_date: Option<Timestamp>,
    pub build_ref: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthStatus {
    pub message: String,
    pub is_healthy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ping {
    pub message: String,
}

/// An execution engine configured on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub id: EngineId,
    #[serde(default)]
    pub name: String,
    /// Engine API flavour, e.g. `"jenkins-generic-webhook-trigger"` or `"wharf-cmd.v1"`.
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineList {
    pub default_engine: Option<Engine>,
    #[serde(default, deserialize_with = "crate::nullable::null_as_default")]
    pub list: Vec<Engine>,
}

// ---------------------------------------------------------------------------
// Builds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Build {
    #[serde(flatten)]
    pub time: TimeMetadata,
    pub build_id: BuildId,
    pub status_id: i32,
    pub status: Option<BuildStatus>,
    pub project_id: ProjectId,
    pub scheduled_on: Option<Timestamp>,
    pub started_on: Option<Timestamp>,
    #[serde(rename = "finishedOn")]
    pub completed_on: Option<Timestamp>,
    pub git_branch: String,
    pub environment: Option<String>,
    pub stage: String,
    #[serde(default, deserialize_with = "crate::nullable::null_as_default")]
    pub params: Vec<BuildParam>,
    pub is_invalid: bool,
    #[serde(default, deserialize_with = "crate::nullable::null_as_default")]
    pub test_result_summaries: Vec<TestResultSummary>,
    pub test_result_list_summary: TestResultListSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildParam {
    pub build_id: BuildId,
    pub name: String,
    pub value: String,
}

/// Returned when a build has been started.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildReferenceWrapper {
    /// ID of the new build, as a string.
    #[serde(rename = "buildRef")]
    pub build_reference: String,
}

/// A stored log line of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Log {
    pub log_id: LogId,
    pub build_id: BuildId,
    pub message: String,
    pub timestamp: Option<Timestamp>,
}

/// Final acknowledgement of a build log stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatedLogsSummary {
    pub logs_inserted: u64,
}

// ---------------------------------------------------------------------------
// Artifacts and test results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artifact {
    #[serde(flatten)]
    pub time: TimeMetadata,
    pub artifact_id: ArtifactId,
    pub build_id: BuildId,
    pub name: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestResultDetail {
    #[serde(flatten)]
    pub time: TimeMetadata,
    pub test_result_detail_id: TestResultDetailId,
    pub artifact_id: ArtifactId,
    pub build_id: BuildId,
    pub name: String,
    pub message: Option<String>,
    pub started_on: Option<Timestamp>,
    pub completed_on: Option<Timestamp>,
    pub status: Option<TestResultStatus>,
}

/// Pass/fail counts of one parsed test result file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestResultSummary {
    #[serde(flatten)]
    pub time: TimeMetadata,
    pub test_result_summary_id: TestResultSummaryId,
    pub file_name: String,
    pub artifact_id: ArtifactId,
    pub build_id: BuildId,
    pub total: u64,
    pub failed: u64,
    pub passed: u64,
    pub skipped: u64,
}

/// Pass/fail counts over all test result files of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestResultListSummary {
    pub build_id: BuildId,
    pub total: u64,
    pub failed: u64,
    pub passed: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestsResults {
    #[serde(default)]
    pub passed: u64,
    #[serde(default)]
    pub failed: u64,
    pub status: TestStatus,
}

// ---------------------------------------------------------------------------
// Projects, branches, providers, tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branch {
    #[serde(flatten)]
    pub time: TimeMetadata,
    pub branch_id: BranchId,
    pub project_id: ProjectId,
    pub name: String,
    pub default: bool,
    pub token_id: TokenId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchList {
    pub default_branch: Option<Branch>,
    #[serde(default, deserialize_with = "crate::nullable::null_as_default")]
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    #[serde(flatten)]
    pub time: TimeMetadata,
    pub project_id: ProjectId,
    pub remote_project_id: String,
    pub name: String,
    pub group_name: String,
    pub description: String,
    pub avatar_url: String,
    pub token_id: TokenId,
    pub provider_id: ProviderId,
    pub provider: Option<Provider>,
    pub build_definition: String,
    #[serde(default, deserialize_with = "crate::nullable::null_as_default")]
    pub branches: Vec<Branch>,
    pub git_url: String,
    /// The parsed `.wharf-ci.yml`, as free-form JSON.
    #[serde(rename = "build")]
    pub parsed_build_definition: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(flatten)]
    pub time: TimeMetadata,
    #[serde(default)]
    pub provider_id: ProviderId,
    pub name: ProviderName,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token_id: TokenId,
}

/// A stored credential. The secret is hidden from `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Token {
    #[serde(flatten)]
    pub time: TimeMetadata,
    pub token_id: TokenId,
    pub token: String,
    pub user_name: String,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("time", &self.time)
            .field("token_id", &self.token_id)
            .field("token", &"*REDACTED*")
            .field("user_name", &self.user_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_reads_finished_on_and_time_metadata() {
        let build: Build = serde_json::from_str(
            r#"{
                "buildId": 12,
                "statusId": 2,
                "status": "Completed",
                "projectId": 3,
                "finishedOn": "2022-05-01T10:00:00Z",
                "environment": null,
                "stage": "deploy",
                "createdAt": "2022-05-01T09:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(build.build_id, BuildId::new(12));
        assert_eq!(build.status, Some(BuildStatus::Completed));
        assert!(build.completed_on.is_some());
        assert!(build.time.created_at.is_some());
        assert!(build.time.updated_at.is_none());
        assert_eq!(build.environment, None);
        assert!(build.params.is_empty());
    }

    #[test]
    fn paginated_reads_list_and_total() {
        let page: Paginated<Artifact> = serde_json::from_str(
            r#"{"list":[{"artifactId":1,"buildId":2,"name":"a","fileName":"a.xml"}],"totalCount":7}"#,
        )
        .unwrap();
        assert_eq!(page.total_count, 7);
        assert_eq!(page.list[0].file_name, "a.xml");
    }

    #[test]
    fn paginated_tolerates_missing_fields() {
        let page: Paginated<Project> = serde_json::from_str("{}").unwrap();
        assert!(page.list.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn null_lists_read_as_empty() {
        let page: Paginated<Build> =
            serde_json::from_str(r#"{"list":null,"totalCount":0}"#).unwrap();
        assert!(page.list.is_empty());

        let build: Build = serde_json::from_str(
            r#"{"buildId":4,"params":null,"testResultSummaries":null}"#,
        )
        .unwrap();
        assert_eq!(build.build_id, BuildId::new(4));
        assert!(build.params.is_empty());
        assert!(build.test_result_summaries.is_empty());

        let project: Project =
            serde_json::from_str(r#"{"projectId":2,"branches":null}"#).unwrap();
        assert!(project.branches.is_empty());

        let branches: BranchList =
            serde_json::from_str(r#"{"defaultBranch":null,"branches":null}"#).unwrap();
        assert!(branches.branches.is_empty());

        let engines: EngineList = serde_json::from_str(r#"{"list":null}"#).unwrap();
        assert!(engines.list.is_empty());
    }

    #[test]
    fn engine_list_reads_default_engine() {
        let list: EngineList = serde_json::from_str(
            r#"{
                "defaultEngine": {"id":"jenkins","name":"Jenkins","api":"jenkins-generic-webhook-trigger","url":"http://jenkins"},
                "list": [{"id":"jenkins","name":"Jenkins"},{"id":"wharf-cmd","name":"wharf-cmd"}]
            }"#,
        )
        .unwrap();
        assert_eq!(list.default_engine.unwrap().id.as_str(), "jenkins");
        assert_eq!(list.list.len(), 2);
    }

    #[test]
    fn app_version_reads_build_metadata() {
        let version: AppVersion = serde_json::from_str(
            r#"{"version":"v5.1.2","buildGitCommit":"abc123","buildRef":42}"#,
        )
        .unwrap();
        assert_eq!(version.version, "v5.1.2");
        assert_eq!(version.build_ref, 42);
        assert!(version.build_date.is_none());
    }

    #[test]
    fn token_debug_hides_secret() {
        let token = Token {
            token: "s3cr3t".to_string(),
            ..Token::default()
        };
        assert!(!format!("{token:?}").contains("s3cr3t"));
    }
}
