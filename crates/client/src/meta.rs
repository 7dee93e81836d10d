//! Server metadata endpoints: version, health, ping and engines.

use model::response::{AppVersion, EngineList, HealthStatus, Ping};
use model::{EndpointRequirement, Query};

use crate::client::Client;
use crate::error::Result;

const HEALTH_API: EndpointRequirement = EndpointRequirement::new(0, 7, 1);
const PING_API: EndpointRequirement = EndpointRequirement::new(4, 2, 0);
const ENGINE_API: EndpointRequirement = EndpointRequirement::new(5, 1, 0);

impl Client {
    /// Fetches the server's version information.
    ///
    /// Never version gated; the gate itself relies on this endpoint.
    pub async fn get_version(&self) -> Result<AppVersion> {
        self.transport.get_json("/api/version", Query::new()).await
    }

    /// Checks whether the API is healthy.
    pub async fn get_health(&mut self) -> Result<HealthStatus> {
        self.validate_endpoint(HEALTH_API).await?;
        self.transport.get_json("/api/health", Query::new()).await
    }

    /// Pings the API.
    pub async fn ping(&mut self) -> Result<Ping> {
        self.validate_endpoint(PING_API).await?;
        self.transport.get_json("/api/ping", Query::new()).await
    }

    /// Lists the execution engines configured on the server.
    pub async fn get_engine_list(&mut self) -> Result<EngineList> {
        self.validate_endpoint(ENGINE_API).await?;
        self.transport.get_json("/api/engine", Query::new()).await
    }
}
