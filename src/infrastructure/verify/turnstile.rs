use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;

use crate::constants::TURNSTILE_VERIFY_URL;

/// Server-to-server token redemption against the challenge service.
#[automock]
#[async_trait]
pub trait BotVerifier: Send + Sync {
    /// True only for a positive answer from the verification service.
    /// Transport failures, timeouts and unparseable bodies all verify as
    /// false (fail closed).
    async fn verify(&self, token: &str) -> bool;
}

pub struct TurnstileVerifier {
    http: reqwest::Client,
    secret: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
}

impl TurnstileVerifier {
    pub fn new(secret: String, timeout: Duration) -> anyhow::Result<Self> {
        Self::with_endpoint(secret, TURNSTILE_VERIFY_URL, timeout)
    }

    /// Redeem tokens against a different siteverify endpoint.
    pub fn with_endpoint(
        secret: String,
        endpoint: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(TurnstileVerifier {
            http,
            secret,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl BotVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str) -> bool {
        let params = [("secret", self.secret.as_str()), ("response", token)];

        let response = match self.http.post(&self.endpoint).form(&params).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Turnstile verification call failed: {}", e);
                return false;
            }
        };

        match response.json::<SiteverifyResponse>().await {
            Ok(body) => body.success,
            Err(e) => {
                tracing::warn!("Turnstile verification returned an unreadable body: {}", e);
                false
            }
        }
    }
}
