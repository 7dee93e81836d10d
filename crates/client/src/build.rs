//! Build endpoints, including build logs.

use model::request::{BuildStatusUpdate, LogOrStatusUpdate};
use model::response::{Build, Log, Paginated};
use model::{BuildId, BuildSearch, EndpointRequirement, Query, ToQuery};
use reqwest::Method;

use crate::client::Client;
use crate::error::{ClientError, Result};
use crate::log_stream::{self, LogStream, DEFAULT_LOG_STREAM_CAPACITY};

const BUILD_API: EndpointRequirement = EndpointRequirement::new(5, 0, 0);
const LOG_STREAM_API: EndpointRequirement = EndpointRequirement::new(5, 1, 0);

impl Client {
    /// Lists builds matching `search`.
    pub async fn get_build_list(&mut self, search: &BuildSearch) -> Result<Paginated<Build>> {
        let query = search.to_query()?;
        self.validate_endpoint(BUILD_API).await?;
        self.transport.get_json("/api/build", query).await
    }

    pub async fn get_build(&mut self, build_id: BuildId) -> Result<Build> {
        self.validate_endpoint(BUILD_API).await?;
        self.transport
            .get_json(&format!("/api/build/{build_id}"), Query::new())
            .await
    }

    /// Sets the status of a build and returns the updated build.
    pub async fn update_build_status(
        &mut self,
        build_id: BuildId,
        update: BuildStatusUpdate,
    ) -> Result<Build> {
        self.validate_endpoint(BUILD_API).await?;
        self.transport
            .send_json(
                Method::PUT,
                &format!("/api/build/{build_id}/status"),
                Query::new(),
                &update,
            )
            .await
    }

    /// Appends a log line (or a status change) to a build.
    pub async fn create_build_log(
        &mut self,
        build_id: BuildId,
        log: &LogOrStatusUpdate,
    ) -> Result<()> {
        self.validate_endpoint(BUILD_API).await?;
        self.transport
            .send_json_no_content(Method::POST, &format!("/api/build/{build_id}/log"), log)
            .await
    }

    pub async fn get_build_log_list(&mut self, build_id: BuildId) -> Result<Vec<Log>> {
        self.validate_endpoint(BUILD_API).await?;
        self.transport
            .get_json(&format!("/api/build/{build_id}/log"), Query::new())
            .await
    }

    /// Server-sent log streaming is not provided by this client.
    pub async fn stream_build_log(&mut self, _build_id: BuildId) -> Result<()> {
        Err(ClientError::NotImplemented("stream_build_log"))
    }

    /// Opens a gRPC stream for uploading build log lines.
    pub async fn create_build_log_stream(&mut self) -> Result<LogStream> {
        self.create_build_log_stream_with_capacity(DEFAULT_LOG_STREAM_CAPACITY)
            .await
    }

    /// Same as [`create_build_log_stream`](Self::create_build_log_stream)
    /// with a custom buffer size.
    pub async fn create_build_log_stream_with_capacity(
        &mut self,
        capacity: usize,
    ) -> Result<LogStream> {
        self.validate_endpoint(LOG_STREAM_API).await?;
        log_stream::open(
            self.transport.base_url(),
            self.transport.auth_header(),
            capacity,
        )
        .await
    }
}
