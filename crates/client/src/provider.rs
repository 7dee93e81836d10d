//! Provider endpoints.

use model::request::{NewProvider, ProviderUpdate};
use model::response::{Paginated, Provider};
use model::{EndpointRequirement, ProviderId, ProviderSearch, Query, ToQuery};
use reqwest::Method;

use crate::client::Client;
use crate::error::Result;

const PROVIDER_API: EndpointRequirement = EndpointRequirement::new(5, 0, 0);

impl Client {
    pub async fn get_provider_list(&mut self, search: &ProviderSearch) -> Result<Paginated<Provider>> {
        let query = search.to_query()?;
        self.validate_endpoint(PROVIDER_API).await?;
        self.transport.get_json("/api/provider", query).await
    }

    pub async fn get_provider(&mut self, provider_id: ProviderId) -> Result<Provider> {
        self.validate_endpoint(PROVIDER_API).await?;
        self.transport
            .get_json(&format!("/api/provider/{provider_id}"), Query::new())
            .await
    }

    pub async fn create_provider(&mut self, provider: &NewProvider) -> Result<Provider> {
        self.validate_endpoint(PROVIDER_API).await?;
        self.transport
            .send_json(Method::POST, "/api/provider", Query::new(), provider)
            .await
    }

    pub async fn update_provider(
        &mut self,
        provider_id: ProviderId,
        provider: &ProviderUpdate,
    ) -> Result<Provider> {
        self.validate_endpoint(PROVIDER_API).await?;
        self.transport
            .send_json(
                Method::PUT,
                &format!("/api/provider/{provider_id}"),
                Query::new(),
                provider,
            )
            .await
    }
}
