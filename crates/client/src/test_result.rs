//! Build test result endpoints.

use model::response::{Paginated, TestResultDetail, TestResultListSummary, TestResultSummary};
use model::{ArtifactId, BuildId, EndpointRequirement, Query};
use reqwest::Method;

use crate::client::Client;
use crate::error::Result;
use crate::multipart::{upload_form, UploadFile};
use crate::request::{ApiRequest, RequestBody};

const TEST_RESULT_API: EndpointRequirement = EndpointRequirement::new(5, 0, 0);

impl Client {
    /// Lists the per-file test result summaries of a build.
    pub async fn get_build_test_result_summary_list(
        &mut self,
        build_id: BuildId,
    ) -> Result<Paginated<TestResultSummary>> {
        self.validate_endpoint(TEST_RESULT_API).await?;
        self.transport
            .get_json(&format!("/api/build/{build_id}/test-result/summary"), Query::new())
            .await
    }

    /// Gets the test result summary parsed from one artifact.
    pub async fn get_build_test_result_summary(
        &mut self,
        build_id: BuildId,
        artifact_id: ArtifactId,
    ) -> Result<TestResultSummary> {
        self.validate_endpoint(TEST_RESULT_API).await?;
        self.transport
            .get_json(
                &format!("/api/build/{build_id}/test-result/summary/{artifact_id}"),
                Query::new(),
            )
            .await
    }

    /// Lists every test case of a build.
    pub async fn get_build_test_result_detail_list(
        &mut self,
        build_id: BuildId,
    ) -> Result<Paginated<TestResultDetail>> {
        self.validate_endpoint(TEST_RESULT_API).await?;
        self.transport
            .get_json(&format!("/api/build/{build_id}/test-result/detail"), Query::new())
            .await
    }

    /// Lists the test cases parsed from one artifact.
    pub async fn get_build_test_result_detail_list_for_artifact(
        &mut self,
        build_id: BuildId,
        artifact_id: ArtifactId,
    ) -> Result<Paginated<TestResultDetail>> {
        self.validate_endpoint(TEST_RESULT_API).await?;
        self.transport
            .get_json(
                &format!("/api/build/{build_id}/test-result/summary/{artifact_id}/detail"),
                Query::new(),
            )
            .await
    }

    /// Gets the test counts summed over all test result files of a build.
    pub async fn get_build_test_result_list_summary(
        &mut self,
        build_id: BuildId,
    ) -> Result<TestResultListSummary> {
        self.validate_endpoint(TEST_RESULT_API).await?;
        self.transport
            .get_json(
                &format!("/api/build/{build_id}/test-result/list-summary"),
                Query::new(),
            )
            .await
    }

    /// Uploads test result files (e.g. `.trx`) to a build.
    pub async fn create_build_test_result(
        &mut self,
        build_id: BuildId,
        files: Vec<UploadFile>,
    ) -> Result<Vec<TestResultSummary>> {
        self.validate_endpoint(TEST_RESULT_API).await?;
        let request = ApiRequest::new(Method::POST, format!("/api/build/{build_id}/test-result"))
            .with_body(RequestBody::Multipart(upload_form(files)));
        self.transport.send_decoded(request).await
    }
}
