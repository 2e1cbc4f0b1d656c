use std::time::Duration;

use async_trait::async_trait;
use prospector_core::{Job, JobId, JobParams, Lead, MetricsSnapshot};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{map_reqwest_error, ApiError, FailureKind};

/// Transport settings for the dashboard API client.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ApiSettings {
    /// Parse the backend base URL and apply the default transport timeouts.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url.as_ref())
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        // Endpoint paths are joined relative to the base; a missing trailing
        // slash would make `join` drop the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        })
    }
}

/// One method per consumed endpoint. No retries, no state; every other
/// component builds on these single-shot fetches.
#[async_trait]
pub trait LeadApi: Send + Sync {
    async fn start_job(&self, params: &JobParams) -> Result<Job, ApiError>;
    async fn job_status(&self, job_id: &JobId) -> Result<Job, ApiError>;
    async fn leads_with_email(&self) -> Result<Vec<Lead>, ApiError>;
    async fn leads_without_email(&self) -> Result<Vec<Lead>, ApiError>;
    async fn add_email(&self, channel_id: &str, email: &str) -> Result<(), ApiError>;
    async fn metrics_snapshot(&self) -> Result<MetricsSnapshot, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestLeadApi {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestLeadApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            base_url: settings.base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        decode(response).await
    }
}

#[async_trait]
impl LeadApi for ReqwestLeadApi {
    async fn start_job(&self, params: &JobParams) -> Result<Job, ApiError> {
        let url = self.endpoint("api/lead-generation/start")?;
        let response = self
            .client
            .post(url)
            .json(params)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }

    async fn job_status(&self, job_id: &JobId) -> Result<Job, ApiError> {
        self.get_json(&format!("api/lead-generation/status/{job_id}"))
            .await
    }

    async fn leads_with_email(&self) -> Result<Vec<Lead>, ApiError> {
        self.get_json("api/leads/main").await
    }

    async fn leads_without_email(&self) -> Result<Vec<Lead>, ApiError> {
        self.get_json("api/leads/no-email").await
    }

    async fn add_email(&self, channel_id: &str, email: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/leads/add-email/{channel_id}"))?;
        let response = self
            .client
            .post(url)
            .query(&[("email", email)])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }

    async fn metrics_snapshot(&self) -> Result<MetricsSnapshot, ApiError> {
        self.get_json("api/monitoring/performance-dashboard").await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    response.json().await.map_err(map_reqwest_error)
}
