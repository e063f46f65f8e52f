use std::time::Duration;

use async_trait::async_trait;
use derive_more::Display;
use mockall::automock;

use crate::entities::contact::ContactForm;

/// How the endpoint answered a submission that made it onto the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Accepted,
    RateLimited,
    Rejected(u16),
}

#[derive(Debug, Display)]
pub enum TransportError {
    #[display("Network error: {_0}")]
    Network(String),
}

/// The network seam of the submission controller.
#[automock]
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn send(&self, form: &ContactForm) -> Result<SendStatus, TransportError>;
}

/// JSON POST to the submission endpoint with an explicit request deadline.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport {
            http,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn send(&self, form: &ContactForm) -> Result<SendStatus, TransportError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(SendStatus::Accepted)
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Ok(SendStatus::RateLimited)
        } else {
            Ok(SendStatus::Rejected(status.as_u16()))
        }
    }
}
