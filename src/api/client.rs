//! reqwest-backed GraphQL client for the company backend

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::types::{
    BlueTickActionData, BlueTickActionVariables, BlueTickData, BlueTickVariables,
    CompanyListData, CompanyListVariables, GraphqlRequest, GraphqlResponse,
    BLUE_TICK_ACTION_MUTATION, BLUE_TICK_QUERY, COMPANY_LIST_QUERY,
};
use super::{ApiError, CompanyApi};
use crate::config::Config;
use crate::models::{BlueTickAction, BlueTickDetails, CompanyId, CompanyListQuery, CompanyPage};

/// HTTP client speaking the backend's GraphQL dialect
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl GraphqlClient {
    /// Build a client from the application configuration
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api.endpoint.clone(),
            token: config.api.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<V, T>(
        &self,
        operation: &'static str,
        query: &str,
        variables: V,
    ) -> Result<T, ApiError>
    where
        V: Serialize + Send,
        T: DeserializeOwned + Send,
    {
        debug!("Executing {} against {}", operation, self.endpoint);

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GraphqlRequest { query, variables });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_response(operation, status, &body).map_err(|e| {
            warn!("{} failed: {}", operation, e);
            e
        })
    }
}

/// Turn a raw HTTP response into the operation's data payload
pub(crate) fn decode_response<T: DeserializeOwned>(
    operation: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<T, ApiError> {
    if !status.is_success() {
        // GraphQL servers often explain a failed status in the error list
        let message = serde_json::from_str::<GraphqlResponse<serde_json::Value>>(body)
            .ok()
            .and_then(|parsed| parsed.errors.into_iter().next())
            .map(|error| error.message)
            .unwrap_or_else(|| body.to_string());
        return Err(ApiError::Status {
            status_code: status.as_u16(),
            message,
        });
    }

    let parsed: GraphqlResponse<T> = serde_json::from_str(body)
        .map_err(|source| ApiError::Decode { operation, source })?;

    if !parsed.errors.is_empty() {
        return Err(ApiError::GraphQl(
            parsed.errors.into_iter().map(|error| error.message).collect(),
        ));
    }

    parsed.data.ok_or(ApiError::MissingData(operation))
}

#[async_trait]
impl CompanyApi for GraphqlClient {
    async fn list_companies(&self, query: &CompanyListQuery) -> Result<CompanyPage, ApiError> {
        let variables = CompanyListVariables::from(query);
        debug!("Company list variables: {:?}", variables);

        let data: CompanyListData = self
            .execute("getCompanyList", COMPANY_LIST_QUERY, variables)
            .await?;

        data.get_company_list
            .and_then(|envelope| envelope.list_response)
            .ok_or(ApiError::MissingData("getCompanyList"))
    }

    async fn get_blue_tick(&self, company_id: CompanyId) -> Result<BlueTickDetails, ApiError> {
        let data: BlueTickData = self
            .execute(
                "getCompanyBlueTick",
                BLUE_TICK_QUERY,
                BlueTickVariables { id: company_id.0 },
            )
            .await?;

        data.get_company_blue_tick
            .ok_or(ApiError::MissingData("getCompanyBlueTick"))
    }

    async fn submit_blue_tick_action(&self, action: &BlueTickAction) -> Result<(), ApiError> {
        let _: BlueTickActionData = self
            .execute(
                "blueTickAction",
                BLUE_TICK_ACTION_MUTATION,
                BlueTickActionVariables::from(action),
            )
            .await?;
        Ok(())
    }
}
