//! Build artifact endpoints.

use model::response::{Artifact, Paginated};
use model::{ArtifactId, ArtifactSearch, BuildId, EndpointRequirement, ToQuery};
use reqwest::Method;

use crate::client::Client;
use crate::error::Result;
use crate::multipart::{upload_form, UploadFile};
use crate::request::{ApiRequest, RequestBody};

const ARTIFACT_API: EndpointRequirement = EndpointRequirement::new(5, 0, 0);

impl Client {
    /// Lists the artifacts of a build matching `search`.
    pub async fn get_build_artifact_list(
        &mut self,
        build_id: BuildId,
        search: &ArtifactSearch,
    ) -> Result<Paginated<Artifact>> {
        let query = search.to_query()?;
        self.validate_endpoint(ARTIFACT_API).await?;
        self.transport
            .get_json(&format!("/api/build/{build_id}/artifact"), query)
            .await
    }

    /// Downloads the content of an artifact.
    pub async fn get_build_artifact(
        &mut self,
        build_id: BuildId,
        artifact_id: ArtifactId,
    ) -> Result<Vec<u8>> {
        self.validate_endpoint(ARTIFACT_API).await?;
        self.transport
            .send(ApiRequest::new(
                Method::GET,
                format!("/api/build/{build_id}/artifact/{artifact_id}"),
            ))
            .await
    }

    /// Uploads one or more files as artifacts of a build.
    pub async fn create_build_artifact(
        &mut self,
        build_id: BuildId,
        files: Vec<UploadFile>,
    ) -> Result<Vec<Artifact>> {
        self.validate_endpoint(ARTIFACT_API).await?;
        let request = ApiRequest::new(Method::POST, format!("/api/build/{build_id}/artifact"))
            .with_body(RequestBody::Multipart(upload_form(files)));
        self.transport.send_decoded(request).await
    }
}
