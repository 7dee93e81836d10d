//! Search records and their query-string encoding.
//!
//! Each list endpoint takes a typed search record. [`ToQuery`] turns a record
//! into an ordered list of `(name, value)` pairs, checking the record's field
//! relations first:
//!
//! - `offset` requires `limit`;
//! - every `*Match` field is excluded with its exact-match counterpart.
//!
//! Unset fields are skipped, list fields repeat their key, and timestamps are
//! written as RFC-3339.

use std::fmt::Display;

use crate::errors::QueryError;
use crate::identifiers::{ProjectId, ProviderId, TokenId};
use crate::request::ProjectBuildRequest;
use crate::types::{BuildStatus, ProviderName, Timestamp};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// An ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: &str, value: impl Display) -> &mut Self {
        self.pairs.push((name.to_string(), value.to_string()));
        self
    }

    /// Appends a parameter if `value` is set.
    pub fn push_opt<V: Display>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    /// Appends one parameter per element, all under the same name.
    pub fn push_all<V: Display>(&mut self, name: &str, values: &[V]) -> &mut Self {
        for value in values {
            self.push(name, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Form-URL-encodes the parameters, without a leading `?`.
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{}={}", form_encode(name), form_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn form_encode(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

/// Fails if `field` is set but the field it depends on is not.
fn requires(
    field_set: bool,
    field: &'static str,
    required_set: bool,
    required: &'static str,
) -> Result<(), QueryError> {
    if field_set && !required_set {
        return Err(QueryError::MissingRequired {
            field,
            requires: required,
        });
    }
    Ok(())
}

/// Fails if `field` and `excluded` are both set.
fn excluded_with(
    field_set: bool,
    field: &'static str,
    excluded_set: bool,
    excluded: &'static str,
) -> Result<(), QueryError> {
    if field_set && excluded_set {
        return Err(QueryError::MutuallyExclusive { field, excluded });
    }
    Ok(())
}

/// Converts a search record into query parameters.
pub trait ToQuery {
    fn to_query(&self) -> Result<Query, QueryError>;
}

// ---------------------------------------------------------------------------
// Search records
// ---------------------------------------------------------------------------

/// Filters for `GET /api/build`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSearch {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Sort keys such as `"buildId desc"`.
    pub order_by: Vec<String>,
    pub project_id: Option<ProjectId>,

    pub scheduled_after: Option<Timestamp>,
    pub scheduled_before: Option<Timestamp>,
    pub finished_after: Option<Timestamp>,
    pub finished_before: Option<Timestamp>,

    pub is_invalid: Option<bool>,
    pub status: Option<BuildStatus>,
    pub status_id: Option<u8>,

    pub environment: Option<String>,
    pub git_branch: Option<String>,
    pub stage: Option<String>,

    pub environment_match: Option<String>,
    pub git_branch_match: Option<String>,
    pub stage_match: Option<String>,
    /// Soft match against any text field.
    pub any_match: Option<String>,
}

impl ToQuery for BuildSearch {
    fn to_query(&self) -> Result<Query, QueryError> {
        requires(self.offset.is_some(), "offset", self.limit.is_some(), "limit")?;
        excluded_with(
            self.environment_match.is_some(),
            "environmentMatch",
            self.environment.is_some(),
            "environment",
        )?;
        excluded_with(
            self.git_branch_match.is_some(),
            "gitBranchMatch",
            self.git_branch.is_some(),
            "gitBranch",
        )?;
        excluded_with(self.stage_match.is_some(), "stageMatch", self.stage.is_some(), "stage")?;

        let mut query = Query::new();
        query
            .push_opt("limit", self.limit)
            .push_opt("offset", self.offset)
            .push_all("orderby", &self.order_by)
            .push_opt("projectId", self.project_id)
            .push_opt("scheduledAfter", self.scheduled_after)
            .push_opt("scheduledBefore", self.scheduled_before)
            .push_opt("finishedAfter", self.finished_after)
            .push_opt("finishedBefore", self.finished_before)
            .push_opt("isInvalid", self.is_invalid)
            .push_opt("status", self.status)
            .push_opt("statusId", self.status_id)
            .push_opt("environment", self.environment.as_deref())
            .push_opt("gitBranch", self.git_branch.as_deref())
            .push_opt("stage", self.stage.as_deref())
            .push_opt("environmentMatch", self.environment_match.as_deref())
            .push_opt("gitBranchMatch", self.git_branch_match.as_deref())
            .push_opt("stageMatch", self.stage_match.as_deref())
            .push_opt("match", self.any_match.as_deref());
        Ok(query)
    }
}

/// Filters for `GET /api/project`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSearch {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: Vec<String>,

    pub name: Option<String>,
    pub group_name: Option<String>,
    pub description: Option<String>,
    pub token_id: Option<TokenId>,
    pub provider_id: Option<ProviderId>,
    pub git_url: Option<String>,

    pub name_match: Option<String>,
    pub group_name_match: Option<String>,
    pub description_match: Option<String>,
    pub git_url_match: Option<String>,
    pub any_match: Option<String>,
}

impl ToQuery for ProjectSearch {
    fn to_query(&self) -> Result<Query, QueryError> {
        requires(self.offset.is_some(), "offset", self.limit.is_some(), "limit")?;
        excluded_with(self.name_match.is_some(), "nameMatch", self.name.is_some(), "name")?;
        excluded_with(
            self.group_name_match.is_some(),
            "groupNameMatch",
            self.group_name.is_some(),
            "groupName",
        )?;
        excluded_with(
            self.description_match.is_some(),
            "descriptionMatch",
            self.description.is_some(),
            "description",
        )?;
        excluded_with(self.git_url_match.is_some(), "gitUrlMatch", self.git_url.is_some(), "gitUrl")?;

        let mut query = Query::new();
        query
            .push_opt("limit", self.limit)
            .push_opt("offset", self.offset)
            .push_all("orderby", &self.order_by)
            .push_opt("name", self.name.as_deref())
            .push_opt("groupName", self.group_name.as_deref())
            .push_opt("description", self.description.as_deref())
            .push_opt("tokenId", self.token_id)
            .push_opt("providerId", self.provider_id)
            .push_opt("gitUrl", self.git_url.as_deref())
            .push_opt("nameMatch", self.name_match.as_deref())
            .push_opt("groupNameMatch", self.group_name_match.as_deref())
            .push_opt("descriptionMatch", self.description_match.as_deref())
            .push_opt("gitUrlMatch", self.git_url_match.as_deref())
            .push_opt("match", self.any_match.as_deref());
        Ok(query)
    }
}

/// Filters for `GET /api/provider`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSearch {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: Vec<String>,

    pub name: Option<ProviderName>,
    pub url: Option<String>,
    pub token_id: Option<TokenId>,

    pub name_match: Option<String>,
    pub url_match: Option<String>,
    pub any_match: Option<String>,
}

impl ToQuery for ProviderSearch {
    fn to_query(&self) -> Result<Query, QueryError> {
        requires(self.offset.is_some(), "offset", self.limit.is_some(), "limit")?;
        excluded_with(self.name_match.is_some(), "nameMatch", self.name.is_some(), "name")?;
        excluded_with(self.url_match.is_some(), "urlMatch", self.url.is_some(), "url")?;

        let mut query = Query::new();
        query
            .push_opt("limit", self.limit)
            .push_opt("offset", self.offset)
            .push_all("orderby", &self.order_by)
            .push_opt("name", self.name)
            .push_opt("url", self.url.as_deref())
            .push_opt("tokenId", self.token_id)
            .push_opt("nameMatch", self.name_match.as_deref())
            .push_opt("urlMatch", self.url_match.as_deref())
            .push_opt("match", self.any_match.as_deref());
        Ok(query)
    }
}

/// Filters for `GET /api/token`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSearch {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: Vec<String>,

    pub user_name: Option<String>,
    pub user_name_match: Option<String>,
    pub any_match: Option<String>,
}

impl ToQuery for TokenSearch {
    fn to_query(&self) -> Result<Query, QueryError> {
        requires(self.offset.is_some(), "offset", self.limit.is_some(), "limit")?;
        excluded_with(
            self.user_name_match.is_some(),
            "userNameMatch",
            self.user_name.is_some(),
            "userName",
        )?;

        let mut query = Query::new();
        query
            .push_opt("limit", self.limit)
            .push_opt("offset", self.offset)
            .push_all("orderby", &self.order_by)
            .push_opt("userName", self.user_name.as_deref())
            .push_opt("userNameMatch", self.user_name_match.as_deref())
            .push_opt("match", self.any_match.as_deref());
        Ok(query)
    }
}

/// Filters for `GET /api/build/{buildId}/artifact`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSearch {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: Vec<String>,

    pub name: Option<String>,
    pub file_name: Option<String>,

    pub name_match: Option<String>,
    pub file_name_match: Option<String>,
    pub any_match: Option<String>,
}

impl ToQuery for ArtifactSearch {
    fn to_query(&self) -> Result<Query, QueryError> {
        requires(self.offset.is_some(), "offset", self.limit.is_some(), "limit")?;
        excluded_with(self.name_match.is_some(), "nameMatch", self.name.is_some(), "name")?;
        excluded_with(
            self.file_name_match.is_some(),
            "fileNameMatch",
            self.file_name.is_some(),
            "fileName",
        )?;

        let mut query = Query::new();
        query
            .push_opt("limit", self.limit)
            .push_opt("offset", self.offset)
            .push_all("orderby", &self.order_by)
            .push_opt("name", self.name.as_deref())
            .push_opt("fileName", self.file_name.as_deref())
            .push_opt("nameMatch", self.name_match.as_deref())
            .push_opt("fileNameMatch", self.file_name_match.as_deref())
            .push_opt("match", self.any_match.as_deref());
        Ok(query)
    }
}

impl ToQuery for ProjectBuildRequest {
    fn to_query(&self) -> Result<Query, QueryError> {
        let mut query = Query::new();
        query
            .push("stage", &self.stage)
            .push_opt("branch", self.branch.as_deref())
            .push_opt("environment", self.environment.as_deref())
            .push_opt("engine", self.engine.as_deref());
        Ok(query)
    }
}
