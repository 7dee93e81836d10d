//! Project and branch endpoints.

use model::request::{BranchListUpdate, BuildInputs, NewBranch, NewProject, ProjectBuildRequest, ProjectUpdate};
use model::response::{Branch, BranchList, BuildReferenceWrapper, Paginated, Project};
use model::{EndpointRequirement, ProjectId, ProjectSearch, Query, ToQuery};
use reqwest::Method;
use tracing::debug;

use crate::client::Client;
use crate::error::Result;

const PROJECT_API: EndpointRequirement = EndpointRequirement::new(5, 0, 0);

impl Client {
    /// Lists projects matching `search`.
    pub async fn get_project_list(&mut self, search: &ProjectSearch) -> Result<Paginated<Project>> {
        let query = search.to_query()?;
        self.validate_endpoint(PROJECT_API).await?;
        self.transport.get_json("/api/project", query).await
    }

    pub async fn get_project(&mut self, project_id: ProjectId) -> Result<Project> {
        self.validate_endpoint(PROJECT_API).await?;
        self.transport
            .get_json(&format!("/api/project/{project_id}"), Query::new())
            .await
    }

    pub async fn create_project(&mut self, project: &NewProject) -> Result<Project> {
        self.validate_endpoint(PROJECT_API).await?;
        self.transport
            .send_json(Method::POST, "/api/project", Query::new(), project)
            .await
    }

    pub async fn update_project(
        &mut self,
        project_id: ProjectId,
        project: &ProjectUpdate,
    ) -> Result<Project> {
        self.validate_endpoint(PROJECT_API).await?;
        self.transport
            .send_json(
                Method::PUT,
                &format!("/api/project/{project_id}"),
                Query::new(),
                project,
            )
            .await
    }

    pub async fn delete_project(&mut self, project_id: ProjectId) -> Result<()> {
        self.validate_endpoint(PROJECT_API).await?;
        self.transport
            .delete(&format!("/api/project/{project_id}"))
            .await
    }

    /// Starts a build of a project stage with the given input variables.
    pub async fn start_project_build(
        &mut self,
        project_id: ProjectId,
        request: &ProjectBuildRequest,
        inputs: &BuildInputs,
    ) -> Result<BuildReferenceWrapper> {
        let query = request.to_query()?;
        self.validate_endpoint(PROJECT_API).await?;
        let started: BuildReferenceWrapper = self
            .transport
            .send_json(
                Method::POST,
                &format!("/api/project/{project_id}/build"),
                query,
                inputs,
            )
            .await?;
        debug!(build_ref = %started.build_reference, "Started build.");
        Ok(started)
    }

    pub async fn get_project_branch_list(&mut self, project_id: ProjectId) -> Result<Vec<Branch>> {
        self.validate_endpoint(PROJECT_API).await?;
        self.transport
            .get_json(&format!("/api/project/{project_id}/branch"), Query::new())
            .await
    }

    pub async fn create_project_branch(
        &mut self,
        project_id: ProjectId,
        branch: &NewBranch,
    ) -> Result<Branch> {
        self.validate_endpoint(PROJECT_API).await?;
        self.transport
            .send_json(
                Method::POST,
                &format!("/api/project/{project_id}/branch"),
                Query::new(),
                branch,
            )
            .await
    }

    /// Replaces all branches of a project.
    pub async fn update_project_branch_list(
        &mut self,
        project_id: ProjectId,
        branches: &BranchListUpdate,
    ) -> Result<BranchList> {
        self.validate_endpoint(PROJECT_API).await?;
        self.transport
            .send_json(
                Method::PUT,
                &format!("/api/project/{project_id}/branch"),
                Query::new(),
                branches,
            )
            .await
    }
}
