use std::sync::Arc;

use crate::{
    entities::contact::ContactForm,
    errors::ContactError,
    infrastructure::{limiter::SlidingWindowLimiter, mailer::Mailer, verify::BotVerifier},
};

/// Authoritative gatekeeper for the submission endpoint: revalidate, verify
/// provenance, enforce the per-address rate limit, dispatch the notification.
pub struct ContactHandler {
    verifier: Option<Arc<dyn BotVerifier>>,
    mailer: Arc<dyn Mailer>,
    limiter: SlidingWindowLimiter,
}

impl ContactHandler {
    pub fn new(
        verifier: Option<Arc<dyn BotVerifier>>,
        mailer: Arc<dyn Mailer>,
        limiter: SlidingWindowLimiter,
    ) -> Self {
        ContactHandler {
            verifier,
            mailer,
            limiter,
        }
    }

    /// Handles one submission from `caller`.
    ///
    /// Ordering is fixed: presence check, bot verification (when configured),
    /// rate limit, dispatch. The rate limit is only charged for requests that
    /// passed verification, so bots cannot exhaust a caller's budget.
    pub async fn handle_submission(
        &self,
        form: &ContactForm,
        caller: &str,
    ) -> Result<(), ContactError> {
        if !form.has_required_fields() {
            return Err(ContactError::MissingFields);
        }

        if let Some(verifier) = &self.verifier {
            let token = form.turnstile_token.as_deref().unwrap_or_default();
            if token.is_empty() || !verifier.verify(token).await {
                tracing::warn!(caller, "submission rejected: bot verification failed");
                return Err(ContactError::BotVerificationFailed);
            }
        }

        if !self.limiter.check(caller) {
            tracing::warn!(caller, "submission rejected: rate limit exceeded");
            return Err(ContactError::TooManyRequests);
        }

        self.mailer.send_contact(form).await?;
        tracing::info!(caller, sender = %form.email, "contact message dispatched");
        Ok(())
    }
}
