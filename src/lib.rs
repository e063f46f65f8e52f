use std::{sync::Arc, time::Duration};

mod domain;
mod infrastructure;
mod interfaces;
pub mod client;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::{i18n, limiter, mailer, utils, verify};
pub use interfaces::{handlers, routes};

use constants::{RATE_LIMIT_MAX, RATE_LIMIT_WINDOW};
use limiter::SlidingWindowLimiter;
use mailer::{Mailer, SmtpMailer};
use use_cases::contact::ContactHandler;
use verify::{BotVerifier, TurnstileVerifier};

pub struct AppState {
    pub contact_handler: ContactHandler,
    /// See [`settings::AppConfig::trust_forwarded`].
    pub trust_forwarded: bool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.outbound_timeout_secs);

        let verifier: Option<Arc<dyn BotVerifier>> = match &config.turnstile_secret {
            Some(secret) if config.turnstile_enabled() => {
                Some(Arc::new(TurnstileVerifier::new(secret.clone(), timeout)?))
            }
            _ => {
                tracing::warn!("Turnstile secret not configured; bot verification disabled");
                None
            }
        };

        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(config)?);
        let limiter = SlidingWindowLimiter::new(RATE_LIMIT_MAX, RATE_LIMIT_WINDOW);

        Ok(AppState {
            contact_handler: ContactHandler::new(verifier, mailer, limiter),
            trust_forwarded: config.trust_forwarded,
        })
    }

    /// Assemble state around a pre-built handler. Used by tests to inject
    /// mock collaborators.
    pub fn with_handler(contact_handler: ContactHandler) -> Self {
        AppState {
            contact_handler,
            trust_forwarded: true,
        }
    }
}
