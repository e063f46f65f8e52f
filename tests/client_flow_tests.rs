use std::{sync::Arc, time::Duration};

use chrono::Utc;
use portfolio_contact::{
    client::{
        CallbackWidget, CaptchaWidget, ControllerConfig, CooldownStore, FormField, MemoryStore,
        MockSubmissionTransport, SendStatus, SubmissionController, SubmitOutcome, TransportError,
    },
    constants::{COOLDOWN_SECONDS, COOLDOWN_STORAGE_KEY},
    i18n::MessageCatalog,
};

type TestController =
    SubmissionController<Arc<MemoryStore>, Arc<CallbackWidget>, MockSubmissionTransport>;

struct Harness {
    controller: TestController,
    store: Arc<MemoryStore>,
    widget: Arc<CallbackWidget>,
}

fn harness(captcha_required: bool, transport: MockSubmissionTransport) -> Harness {
    let store = Arc::new(MemoryStore::default());
    let widget = Arc::new(CallbackWidget::default());
    let controller = SubmissionController::new(
        ControllerConfig {
            captcha_required,
            ..ControllerConfig::default()
        },
        MessageCatalog::empty("en"),
        store.clone(),
        widget.clone(),
        transport,
    );
    Harness {
        controller,
        store,
        widget,
    }
}

fn fill_valid(controller: &TestController) {
    controller.update_field(FormField::Name, "Jane");
    controller.update_field(FormField::Email, "jane@example.com");
    controller.update_field(FormField::Message, "hi");
}

fn accepting_transport(times: usize) -> MockSubmissionTransport {
    let mut transport = MockSubmissionTransport::new();
    transport
        .expect_send()
        .times(times)
        .returning(|_| Ok(SendStatus::Accepted));
    transport
}

#[tokio::test(start_paused = true)]
async fn successful_submit_starts_cooldown_and_resets_the_widget() {
    let h = harness(true, accepting_transport(1));
    fill_valid(&h.controller);
    h.widget.set_token("tok-1");

    assert_eq!(h.controller.submit().await, SubmitOutcome::Sent);

    assert_eq!(h.controller.cooldown_remaining(), COOLDOWN_SECONDS);
    assert!(h.store.get(COOLDOWN_STORAGE_KEY).is_some());
    // Token consumed; a fresh challenge is needed for the next attempt.
    assert_eq!(h.widget.token(), None);
    // Fields reset on success.
    assert!(h.controller.current_form().name.is_empty());
    assert!(!h.controller.is_sending());

    h.controller.teardown();
}

#[tokio::test(start_paused = true)]
async fn countdown_ticks_to_zero_and_clears_persisted_state() {
    let h = harness(false, accepting_transport(1));
    fill_valid(&h.controller);

    assert_eq!(h.controller.submit().await, SubmitOutcome::Sent);
    assert_eq!(h.controller.cooldown_remaining(), COOLDOWN_SECONDS);

    // Half a second past the 10th tick, so the decrement count is unambiguous.
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    assert_eq!(h.controller.cooldown_remaining(), COOLDOWN_SECONDS - 10);

    tokio::time::sleep(Duration::from_secs(u64::from(COOLDOWN_SECONDS))).await;
    assert_eq!(h.controller.cooldown_remaining(), 0);
    assert_eq!(h.store.get(COOLDOWN_STORAGE_KEY), None);

    h.controller.teardown();
}

#[tokio::test(start_paused = true)]
async fn submit_during_cooldown_is_a_no_op() {
    let h = harness(false, accepting_transport(1));
    fill_valid(&h.controller);

    assert_eq!(h.controller.submit().await, SubmitOutcome::Sent);

    fill_valid(&h.controller);
    // Still inside the window; the mock would panic on a second send.
    assert_eq!(h.controller.submit().await, SubmitOutcome::Ignored);

    h.controller.teardown();
}

#[tokio::test]
async fn captcha_gate_blocks_before_any_network_traffic() {
    let mut transport = MockSubmissionTransport::new();
    transport.expect_send().times(0);
    let h = harness(true, transport);
    fill_valid(&h.controller);

    assert_eq!(h.controller.submit().await, SubmitOutcome::CaptchaRequired);
    assert_eq!(
        h.controller.captcha_prompt(),
        "Please complete the captcha to prove you're human."
    );
}

#[tokio::test]
async fn validation_failure_blocks_before_any_network_traffic() {
    let mut transport = MockSubmissionTransport::new();
    transport.expect_send().times(0);
    let h = harness(false, transport);
    h.controller.update_field(FormField::Name, "Jane");

    match h.controller.submit().await {
        SubmitOutcome::ValidationFailed(errors) => {
            assert!(errors.contains_key(&FormField::Email));
            assert!(errors.contains_key(&FormField::Message));
            assert!(!errors.contains_key(&FormField::Name));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    // Errors are also retained for inline rendering.
    assert_eq!(h.controller.field_errors().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn reload_within_the_window_resumes_the_remaining_countdown() {
    let store = Arc::new(MemoryStore::default());
    let sent_at = Utc::now().timestamp_millis() - 12_000;
    store.put(COOLDOWN_STORAGE_KEY, &sent_at.to_string());

    let mut transport = MockSubmissionTransport::new();
    transport.expect_send().times(0);
    let controller = SubmissionController::new(
        ControllerConfig::default(),
        MessageCatalog::empty("en"),
        store.clone(),
        Arc::new(CallbackWidget::default()),
        transport,
    );

    assert_eq!(controller.cooldown_remaining(), COOLDOWN_SECONDS - 12);
    fill_valid(&controller);
    assert_eq!(controller.submit().await, SubmitOutcome::Ignored);

    controller.teardown();
}

#[tokio::test]
async fn stale_cooldown_state_is_cleared_on_load() {
    let store = Arc::new(MemoryStore::default());
    let sent_at = Utc::now().timestamp_millis() - 60_000;
    store.put(COOLDOWN_STORAGE_KEY, &sent_at.to_string());

    let mut transport = MockSubmissionTransport::new();
    transport.expect_send().times(0);
    let controller = SubmissionController::new(
        ControllerConfig::default(),
        MessageCatalog::empty("en"),
        store.clone(),
        Arc::new(CallbackWidget::default()),
        transport,
    );

    assert_eq!(controller.cooldown_remaining(), 0);
    assert_eq!(store.get(COOLDOWN_STORAGE_KEY), None);
}

#[tokio::test]
async fn rate_limited_response_is_an_observable_outcome() {
    let mut transport = MockSubmissionTransport::new();
    transport
        .expect_send()
        .returning(|_| Ok(SendStatus::RateLimited));
    let h = harness(false, transport);
    fill_valid(&h.controller);

    assert_eq!(h.controller.submit().await, SubmitOutcome::RateLimited);
    // Nothing persisted and no cooldown on failure.
    assert_eq!(h.controller.cooldown_remaining(), 0);
    assert_eq!(h.store.get(COOLDOWN_STORAGE_KEY), None);
    // Input is retained for a manual retry.
    assert_eq!(h.controller.current_form().name, "Jane");
}

#[tokio::test]
async fn server_and_transport_failures_are_distinguished() {
    let mut transport = MockSubmissionTransport::new();
    transport
        .expect_send()
        .times(1)
        .returning(|_| Ok(SendStatus::Rejected(500)));
    transport
        .expect_send()
        .times(1)
        .returning(|_| Err(TransportError::Network("connection reset".into())));

    let h = harness(false, transport);
    fill_valid(&h.controller);

    assert_eq!(h.controller.submit().await, SubmitOutcome::ServerRejected(500));
    assert!(!h.controller.is_sending());

    assert_eq!(h.controller.submit().await, SubmitOutcome::TransportFailed);
    assert!(!h.controller.is_sending());
}
