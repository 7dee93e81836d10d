//! Token endpoints.
//!
//! Token secrets travel in request and response bodies; the request trace log
//! redacts them.

use model::request::{NewToken, TokenUpdate};
use model::response::{Paginated, Token};
use model::{EndpointRequirement, Query, TokenId, TokenSearch, ToQuery};
use reqwest::Method;

use crate::client::Client;
use crate::error::Result;

const TOKEN_API: EndpointRequirement = EndpointRequirement::new(5, 0, 0);

impl Client {
    pub async fn get_token_list(&mut self, search: &TokenSearch) -> Result<Paginated<Token>> {
        let query = search.to_query()?;
        self.validate_endpoint(TOKEN_API).await?;
        self.transport.get_json("/api/token", query).await
    }

    pub async fn get_token(&mut self, token_id: TokenId) -> Result<Token> {
        self.validate_endpoint(TOKEN_API).await?;
        self.transport
            .get_json(&format!("/api/token/{token_id}"), Query::new())
            .await
    }

    pub async fn create_token(&mut self, token: &NewToken) -> Result<Token> {
        self.validate_endpoint(TOKEN_API).await?;
        self.transport
            .send_json(Method::POST, "/api/token", Query::new(), token)
            .await
    }

    pub async fn update_token(&mut self, token_id: TokenId, token: &TokenUpdate) -> Result<Token> {
        self.validate_endpoint(TOKEN_API).await?;
        self.transport
            .send_json(
                Method::PUT,
                &format!("/api/token/{token_id}"),
                Query::new(),
                token,
            )
            .await
    }
}
