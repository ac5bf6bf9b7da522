use api_types::contact::ContactMessage;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::RemoteError;

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Rejected { status: StatusCode, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Posts contact-form messages to the dispatch endpoint.
#[derive(Debug, Clone)]
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ContactClient {
    pub fn new(endpoint: &str) -> Result<Self, RemoteError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| RemoteError::InvalidUrl(format!("{endpoint}: {err}")))?;
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            endpoint,
        })
    }

    pub async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        tracing::debug!(endpoint = %self.endpoint, "sending contact message");
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(message)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(err) => err.error,
            Err(_) => "dispatch failed".to_string(),
        };
        tracing::warn!(%status, "contact message rejected: {message}");
        Err(ContactError::Rejected { status, message })
    }
}
