use reqwest::StatusCode;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::ingest::{self, RawUserRecord};
use crate::models::{
    DiscoveryRequest, DiscoveryResponse, DistressReason, Intervention, UserProfile, UserRecord,
};

/// Client for the risk-engine API.
#[derive(Clone)]
pub struct RiskApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl RiskApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| ApiError::Request {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the full user list. There is no paging; every call pulls
    /// the entire dataset.
    pub async fn fetch_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        let url = format!("{}/api/users", self.base_url);
        tracing::info!("Fetching users from {}", url);

        let response = self.send(self.client.get(&url), &url).await?;
        let rows: Vec<RawUserRecord> = response
            .json()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.clone(),
                source,
            })?;

        let users = ingest::validate_all(rows)?;
        tracing::debug!(count = users.len(), "users fetched");
        Ok(users)
    }

    pub async fn fetch_user_profile(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        let url = format!("{}/api/users/{}", self.base_url, user_id);
        tracing::info!("Fetching profile {} from {}", user_id, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(user_id.to_string()));
        }
        let response = Self::check_status(response, &url).await?;

        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }

    pub async fn request_intervention(
        &self,
        user_id: &str,
        reason: DistressReason,
    ) -> Result<Intervention, ApiError> {
        let url = format!("{}/api/discovery", self.base_url);
        tracing::info!("Requesting intervention for {} ({:?})", user_id, reason);

        let body = DiscoveryRequest { user_id, reason };
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(user_id.to_string()));
        }
        let response = Self::check_status(response, &url).await?;

        let payload: DiscoveryResponse = response
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })?;
        Ok(payload.intervention)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Request {
            url: url.to_string(),
            source,
        })?;
        Self::check_status(response, url).await
    }

    async fn check_status(
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::error!("{} returned {}: {}", url, status, body);
        Err(ApiError::Status {
            url: url.to_string(),
            status,
            body,
        })
    }
}
