use super::{MessageSource, ReportLookup};
use crate::error::{Result, UsageError};
use crate::types::{Message, MessagesResponse, Report, ReportId};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Shared HTTP client for both record stores
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(UsageError::HttpClient)
}

/// GET `url` and decode the JSON body. 404 yields `Ok(None)`.
async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<Option<T>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| UsageError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    debug!(url, status = %status, "upstream response received");

    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(UsageError::UpstreamStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| UsageError::Transport {
            url: url.to_string(),
            source,
        })?;

    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|source| UsageError::Validation {
            context: format!("response from {url}"),
            source,
        })
}

/// Message listing served as `{"messages": [...]}`
#[derive(Debug, Clone)]
pub struct HttpMessageSource {
    client: Client,
    url: String,
}

impl HttpMessageSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl MessageSource for HttpMessageSource {
    async fn list(&self) -> Result<Vec<Message>> {
        // The listing itself must exist; a 404 here is a transport failure
        match fetch_json::<MessagesResponse>(&self.client, &self.url).await? {
            Some(response) => Ok(response.messages),
            None => Err(UsageError::UpstreamStatus {
                url: self.url.clone(),
                status: StatusCode::NOT_FOUND.as_u16(),
            }),
        }
    }
}

/// Report store addressed as `{base_url}/{report_id}`
#[derive(Debug, Clone)]
pub struct HttpReportLookup {
    client: Client,
    base_url: String,
}

impl HttpReportLookup {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn report_url(&self, report_id: ReportId) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), report_id)
    }
}

#[async_trait]
impl ReportLookup for HttpReportLookup {
    async fn get(&self, report_id: ReportId) -> Result<Option<Report>> {
        let url = self.report_url(report_id);
        let report = fetch_json::<Report>(&self.client, &url).await?;

        match report {
            Some(report) if report.credit_cost.is_negative() => Err(UsageError::InvalidData {
                message: format!(
                    "report {} has negative credit_cost {}",
                    report.id, report.credit_cost
                ),
            }),
            Some(report) => Ok(Some(report)),
            None => {
                warn!(%report_id, "report does not exist");
                Ok(None)
            }
        }
    }
}
