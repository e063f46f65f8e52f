use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::{
    client::{
        store::CooldownStore,
        transport::{SendStatus, SubmissionTransport},
        widget::CaptchaWidget,
    },
    constants::{COOLDOWN_SECONDS, COOLDOWN_STORAGE_KEY, EMAIL_REGEX, MESSAGE_MAX_CHARS},
    entities::contact::ContactForm,
    infrastructure::i18n::MessageCatalog,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Message => "message",
        }
    }
}

/// Terminal result of one submission attempt. Every attempt resolves to one
/// of these; nothing is swallowed.
#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Endpoint accepted the message; cooldown started.
    Sent,
    /// No-op: a submission was already in flight or the cooldown is active.
    Ignored,
    /// Captcha is configured but no token has been earned yet.
    CaptchaRequired,
    /// Local validation failed; no network traffic was issued.
    ValidationFailed(BTreeMap<FormField, String>),
    /// Endpoint rejected with 429.
    RateLimited,
    /// Endpoint rejected with some other non-success status.
    ServerRejected(u16),
    /// The request never completed (DNS, connect, timeout).
    TransportFailed,
}

pub struct ControllerConfig {
    pub cooldown_secs: u32,
    /// Mirrors the presence of the widget site key: when set, a token is
    /// mandatory before any network call.
    pub captcha_required: bool,
    pub locale: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            cooldown_secs: COOLDOWN_SECONDS,
            captcha_required: false,
            locale: "en".to_string(),
        }
    }
}

#[derive(Default)]
struct FormState {
    name: String,
    email: String,
    message: String,
}

struct ControllerInner<S, W, T> {
    config: ControllerConfig,
    catalog: MessageCatalog,
    store: S,
    widget: W,
    transport: T,
    form: Mutex<FormState>,
    errors: Mutex<BTreeMap<FormField, String>>,
    sending: AtomicBool,
    cooldown: AtomicU32,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

/// Client-side submission controller: gathers and validates input, gates
/// sending on the cooldown and the captcha token, and reports the outcome of
/// every attempt.
///
/// Must be constructed on a tokio runtime; the countdown runs as a spawned
/// one-second tick task that self-cancels at zero.
pub struct SubmissionController<S, W, T> {
    inner: Arc<ControllerInner<S, W, T>>,
}

impl<S, W, T> Clone for SubmissionController<S, W, T> {
    fn clone(&self) -> Self {
        SubmissionController {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, W, T> SubmissionController<S, W, T>
where
    S: CooldownStore + 'static,
    W: CaptchaWidget + 'static,
    T: SubmissionTransport + 'static,
{
    pub fn new(
        config: ControllerConfig,
        catalog: MessageCatalog,
        store: S,
        widget: W,
        transport: T,
    ) -> Self {
        let controller = SubmissionController {
            inner: Arc::new(ControllerInner {
                config,
                catalog,
                store,
                widget,
                transport,
                form: Mutex::new(FormState::default()),
                errors: Mutex::new(BTreeMap::new()),
                sending: AtomicBool::new(false),
                cooldown: AtomicU32::new(0),
                ticker: Mutex::new(None),
            }),
        };
        controller.resume_cooldown();
        controller
    }

    /// Restore the countdown from persisted state: a timestamp less than one
    /// window old resumes at the remaining seconds, anything else is cleared
    /// as stale.
    fn resume_cooldown(&self) {
        let Some(raw) = self.inner.store.get(COOLDOWN_STORAGE_KEY) else {
            return;
        };
        let window = self.inner.config.cooldown_secs;
        let elapsed_secs = raw
            .parse::<i64>()
            .ok()
            .map(|ts| (Utc::now().timestamp_millis() - ts) / 1000)
            .map(|secs| secs.max(0));

        match elapsed_secs {
            Some(elapsed) if elapsed < i64::from(window) => {
                self.start_countdown(window - elapsed as u32);
            }
            _ => self.inner.store.remove(COOLDOWN_STORAGE_KEY),
        }
    }

    pub fn update_field(&self, field: FormField, value: &str) {
        {
            let mut form = self.inner.form.lock();
            match field {
                FormField::Name => form.name = value.to_string(),
                FormField::Email => form.email = value.to_string(),
                FormField::Message => form.message = value.to_string(),
            }
        }
        self.inner.errors.lock().remove(&field);
    }

    /// Per-field constraint check. Returns a message for exactly the failing
    /// fields; an empty map means the form is valid. Pure with respect to the
    /// current input, so repeated calls agree.
    pub fn validate(&self) -> BTreeMap<FormField, String> {
        let form = self.inner.form.lock();
        let mut errors = BTreeMap::new();

        if form.name.trim().is_empty() {
            errors.insert(
                FormField::Name,
                self.msg("contact.errors.name_required", "Name is required."),
            );
        }

        let email = form.email.trim();
        if email.is_empty() {
            errors.insert(
                FormField::Email,
                self.msg("contact.errors.email_required", "Email is required."),
            );
        } else if !EMAIL_REGEX.is_match(email) {
            errors.insert(
                FormField::Email,
                self.msg("contact.errors.email_invalid", "Email is invalid."),
            );
        }

        if form.message.trim().is_empty() {
            errors.insert(
                FormField::Message,
                self.msg("contact.errors.message_required", "Message is required."),
            );
        } else if form.message.chars().count() > MESSAGE_MAX_CHARS {
            errors.insert(
                FormField::Message,
                self.msg("contact.errors.message_too_long", "Message is too long."),
            );
        }

        errors
    }

    /// Run one submission attempt end to end.
    ///
    /// At most one attempt is in flight at a time; re-entrant calls and calls
    /// during the cooldown return [`SubmitOutcome::Ignored`] without touching
    /// the network. The sending flag is cleared on every path out.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.inner.sending.swap(true, Ordering::SeqCst) {
            return SubmitOutcome::Ignored;
        }
        let outcome = self.attempt().await;
        self.inner.sending.store(false, Ordering::SeqCst);
        outcome
    }

    async fn attempt(&self) -> SubmitOutcome {
        if self.cooldown_remaining() > 0 {
            return SubmitOutcome::Ignored;
        }

        let token = if self.inner.config.captcha_required {
            match self.inner.widget.token() {
                Some(token) => Some(token),
                None => return SubmitOutcome::CaptchaRequired,
            }
        } else {
            None
        };

        let errors = self.validate();
        if !errors.is_empty() {
            *self.inner.errors.lock() = errors.clone();
            return SubmitOutcome::ValidationFailed(errors);
        }

        let payload = {
            let form = self.inner.form.lock();
            ContactForm {
                name: form.name.clone(),
                email: form.email.clone(),
                message: form.message.clone(),
                turnstile_token: token,
            }
        };

        match self.inner.transport.send(&payload).await {
            Ok(SendStatus::Accepted) => {
                self.after_accepted();
                SubmitOutcome::Sent
            }
            Ok(SendStatus::RateLimited) => SubmitOutcome::RateLimited,
            Ok(SendStatus::Rejected(status)) => SubmitOutcome::ServerRejected(status),
            Err(e) => {
                tracing::warn!("contact submission did not reach the endpoint: {}", e);
                SubmitOutcome::TransportFailed
            }
        }
    }

    /// Success side effects, in order: reset fields, persist the timestamp,
    /// start the countdown, invalidate the used token. None of this happens
    /// on any failure path.
    fn after_accepted(&self) {
        *self.inner.form.lock() = FormState::default();
        self.inner.errors.lock().clear();
        self.inner
            .store
            .put(COOLDOWN_STORAGE_KEY, &Utc::now().timestamp_millis().to_string());
        self.start_countdown(self.inner.config.cooldown_secs);
        self.inner.widget.reset();
    }

    fn start_countdown(&self, secs: u32) {
        if secs == 0 {
            return;
        }
        self.inner.cooldown.store(secs, Ordering::SeqCst);

        let mut ticker = self.inner.ticker.lock();
        if let Some(handle) = ticker.take() {
            handle.abort();
        }

        let inner = Arc::clone(&self.inner);
        *ticker = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            // The first interval tick completes immediately.
            tick.tick().await;
            loop {
                tick.tick().await;
                let remaining = inner
                    .cooldown
                    .load(Ordering::SeqCst)
                    .saturating_sub(1);
                inner.cooldown.store(remaining, Ordering::SeqCst);
                if remaining == 0 {
                    inner.store.remove(COOLDOWN_STORAGE_KEY);
                    inner.widget.reset();
                    break;
                }
            }
        }));
    }

    /// Cancel the countdown task. State in the durable store is left alone so
    /// a later controller can resume from it.
    pub fn teardown(&self) {
        if let Some(handle) = self.inner.ticker.lock().take() {
            handle.abort();
        }
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.inner.cooldown.load(Ordering::SeqCst)
    }

    pub fn is_sending(&self) -> bool {
        self.inner.sending.load(Ordering::SeqCst)
    }

    pub fn field_errors(&self) -> BTreeMap<FormField, String> {
        self.inner.errors.lock().clone()
    }

    /// Current field values, without any captcha token.
    pub fn current_form(&self) -> ContactForm {
        let form = self.inner.form.lock();
        ContactForm {
            name: form.name.clone(),
            email: form.email.clone(),
            message: form.message.clone(),
            turnstile_token: None,
        }
    }

    /// Message shown when [`SubmitOutcome::CaptchaRequired`] is returned.
    pub fn captcha_prompt(&self) -> String {
        self.msg(
            "contact.errors.captcha_required",
            "Please complete the captcha to prove you're human.",
        )
    }

    fn msg(&self, key: &str, fallback: &str) -> String {
        self.inner
            .catalog
            .text(&self.inner.config.locale, key, fallback)
            .to_string()
    }
}
