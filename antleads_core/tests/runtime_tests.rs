use antleads_core::runtime::{AUTO_CLOSE_DELAY, GENERIC_ERROR_MESSAGE, SUBMITTING_LABEL};
use antleads_core::{
    EmbedAttributes, Feedback, FormValues, StaticPage, SubmissionPayload, SubmitResponse, Trigger,
    WidgetApi, WidgetConfig, WidgetError, WidgetEvent, WidgetRuntime, WidgetState,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::sleep;

const WIDGET_ID: &str = "wgt_test123";
const PAGE_URL: &str = "https://shop.example/pricing";

struct MockApi {
    config: Result<WidgetConfig, u16>,
    responses: Mutex<VecDeque<Result<SubmitResponse, u16>>>,
    submissions: Mutex<Vec<SubmissionPayload>>,
    config_calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl MockApi {
    fn with_config(config: WidgetConfig) -> Self {
        Self {
            config: Ok(config),
            responses: Mutex::new(VecDeque::new()),
            submissions: Mutex::new(Vec::new()),
            config_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    fn failing_config(status: u16) -> Self {
        Self {
            config: Err(status),
            ..Self::with_config(WidgetConfig::default())
        }
    }

    fn respond(self, response: Result<SubmitResponse, u16>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl WidgetApi for MockApi {
    async fn fetch_config(&self, widget_id: &str) -> Result<WidgetConfig, WidgetError> {
        assert_eq!(widget_id, WIDGET_ID);
        self.config_calls.fetch_add(1, Ordering::SeqCst);
        self.config
            .clone()
            .map_err(|status| WidgetError::ConfigUnavailable { status })
    }

    async fn submit(
        &self,
        _widget_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmitResponse, WidgetError> {
        self.submissions.lock().unwrap().push(payload.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(SubmitResponse::default()));
        next.map_err(|status| WidgetError::SubmissionRejected { status })
    }
}

fn page() -> StaticPage {
    StaticPage::new(PAGE_URL)
        .with_referrer("https://search.example/")
        .with_element("#contact-cta")
}

fn runtime_with(api: Arc<MockApi>, attrs: EmbedAttributes) -> WidgetRuntime {
    WidgetRuntime::new(api, Arc::new(page()), attrs)
}

async fn ready_runtime(api: Arc<MockApi>) -> WidgetRuntime {
    let runtime = runtime_with(api, EmbedAttributes::new(WIDGET_ID));
    runtime.initialize().await.unwrap();
    runtime
}

fn jane() -> FormValues {
    FormValues::new()
        .with("name", "Jane")
        .with("email", "j@x.com")
}

#[tokio::test]
async fn missing_widget_id_fails_closed_without_fetching() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = runtime_with(api.clone(), EmbedAttributes::default());

    let err = runtime.initialize().await.unwrap_err();
    assert!(matches!(err, WidgetError::MissingWidgetId));
    assert_eq!(runtime.state(), WidgetState::Failed);
    assert_eq!(api.config_calls.load(Ordering::SeqCst), 0);
    assert!(runtime.mounted().is_none());
    assert!(!runtime.open());
    assert!(!runtime.is_open());
}

#[tokio::test]
async fn config_error_fails_closed() {
    let api = Arc::new(MockApi::failing_config(404));
    let runtime = WidgetRuntime::embed(
        api.clone(),
        Arc::new(page()),
        EmbedAttributes::new(WIDGET_ID),
    )
    .await;

    assert_eq!(runtime.state(), WidgetState::Failed);
    assert!(runtime.mounted().is_none());
    assert!(!runtime.handle(WidgetEvent::TriggerClicked));
    assert!(matches!(
        runtime.submit(jane()).await,
        Err(WidgetError::InvalidState {
            state: WidgetState::Failed,
            ..
        })
    ));
}

#[tokio::test]
async fn initialize_mounts_modal_and_floating_button() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = ready_runtime(api).await;

    assert_eq!(runtime.state(), WidgetState::Closed);
    let mounted = runtime.mounted().unwrap();
    assert_eq!(mounted.widget_id, WIDGET_ID);
    assert_eq!(mounted.modal.controls().len(), 6);
    assert!(matches!(mounted.trigger, Trigger::FloatingButton(_)));

    let view = runtime.view();
    assert!(!view.modal_visible);
    assert_eq!(view.submit_label, "Submit");
    assert!(!view.submit_disabled);
}

#[tokio::test]
async fn initialize_only_runs_once() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = ready_runtime(api.clone()).await;

    assert!(matches!(
        runtime.initialize().await,
        Err(WidgetError::InvalidState {
            operation: "initialize",
            ..
        })
    ));
    assert_eq!(api.config_calls.load(Ordering::SeqCst), 1);
    assert_eq!(runtime.state(), WidgetState::Closed);
}

#[tokio::test(start_paused = true)]
async fn bound_element_replaces_button_and_disables_auto_open() {
    let config = WidgetConfig {
        auto_open: true,
        auto_open_delay: 1.0,
        ..WidgetConfig::default()
    };
    let api = Arc::new(MockApi::with_config(config));
    let runtime = runtime_with(api, EmbedAttributes::new(WIDGET_ID).bind_to("#contact-cta"));
    runtime.initialize().await.unwrap();

    assert_eq!(
        runtime.mounted().unwrap().trigger,
        Trigger::BoundElement {
            selector: "#contact-cta".to_string()
        }
    );

    sleep(Duration::from_secs(10)).await;
    assert_eq!(runtime.state(), WidgetState::Closed);

    assert!(runtime.handle(WidgetEvent::TriggerClicked));
    assert!(runtime.is_open());
}

#[tokio::test]
async fn unresolved_bind_target_falls_back_to_button() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = runtime_with(api, EmbedAttributes::new(WIDGET_ID).bind_to("#nope"));
    runtime.initialize().await.unwrap();

    assert!(matches!(
        runtime.mounted().unwrap().trigger,
        Trigger::FloatingButton(_)
    ));
}

#[tokio::test]
async fn open_and_close_are_idempotent() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = ready_runtime(api).await;

    assert!(!runtime.close());
    assert_eq!(runtime.state(), WidgetState::Closed);

    assert!(runtime.open());
    assert!(!runtime.open());
    assert_eq!(runtime.state(), WidgetState::Open);
    assert!(runtime.view().modal_visible);

    assert!(runtime.handle(WidgetEvent::BackdropClicked));
    assert!(!runtime.handle(WidgetEvent::CloseClicked));
    assert!(!runtime.is_open());
}

#[tokio::test(start_paused = true)]
async fn auto_open_fires_at_configured_delay() {
    let config = WidgetConfig {
        auto_open: true,
        auto_open_delay: 5.0,
        ..WidgetConfig::default()
    };
    let runtime = ready_runtime(Arc::new(MockApi::with_config(config))).await;

    sleep(Duration::from_millis(4999)).await;
    assert_eq!(runtime.state(), WidgetState::Closed);

    sleep(Duration::from_millis(2)).await;
    assert_eq!(runtime.state(), WidgetState::Open);
}

#[tokio::test(start_paused = true)]
async fn zero_auto_open_delay_never_opens() {
    let config = WidgetConfig {
        auto_open: true,
        auto_open_delay: 0.0,
        ..WidgetConfig::default()
    };
    let runtime = ready_runtime(Arc::new(MockApi::with_config(config))).await;
    assert!(matches!(
        runtime.mounted().unwrap().trigger,
        Trigger::FloatingButton(_)
    ));

    sleep(Duration::from_secs(60)).await;
    assert_eq!(runtime.state(), WidgetState::Closed);
    assert!(runtime.open());
}

#[tokio::test(start_paused = true)]
async fn manual_open_before_auto_open_wins() {
    let config = WidgetConfig {
        auto_open: true,
        auto_open_delay: 5.0,
        ..WidgetConfig::default()
    };
    let runtime = ready_runtime(Arc::new(MockApi::with_config(config))).await;

    sleep(Duration::from_secs(2)).await;
    assert!(runtime.open());

    sleep(Duration::from_secs(4)).await;
    assert_eq!(runtime.state(), WidgetState::Open);

    // The pending auto-open was cancelled, so closing sticks.
    assert!(runtime.close());
    sleep(Duration::from_secs(10)).await;
    assert_eq!(runtime.state(), WidgetState::Closed);
}

#[tokio::test(start_paused = true)]
async fn successful_submit_shows_message_and_auto_closes() {
    let api = Arc::new(
        MockApi::with_config(WidgetConfig::default()).respond(Ok(SubmitResponse {
            success: Some(true),
            message: Some("Thanks".to_string()),
            lead_id: Some("lead-1".to_string()),
        })),
    );
    let runtime = ready_runtime(api.clone()).await;
    runtime.open();

    let outcome = runtime.submit(jane()).await.unwrap();
    assert_eq!(outcome.message, "Thanks");
    assert_eq!(outcome.lead_id.as_deref(), Some("lead-1"));

    let view = runtime.view();
    assert_eq!(view.state, WidgetState::Open);
    assert_eq!(view.feedback, Some(Feedback::Success("Thanks".to_string())));
    assert!(view.form.is_empty());
    assert_eq!(view.submit_label, "Submit");
    assert!(!view.submit_disabled);

    sleep(AUTO_CLOSE_DELAY - Duration::from_millis(1)).await;
    assert!(runtime.is_open());

    sleep(Duration::from_millis(2)).await;
    let view = runtime.view();
    assert_eq!(view.state, WidgetState::Closed);
    assert_eq!(view.feedback, None);

    let sent = api.submissions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].widget_id, WIDGET_ID);
    assert_eq!(sent[0].name, "Jane");
    assert_eq!(sent[0].email.as_deref(), Some("j@x.com"));
    assert_eq!(sent[0].url, PAGE_URL);
    assert_eq!(sent[0].referrer.as_deref(), Some("https://search.example/"));
}

#[tokio::test]
async fn empty_server_message_uses_configured_success_message() {
    let config = WidgetConfig {
        success_message: "We'll call you.".to_string(),
        ..WidgetConfig::default()
    };
    let api = Arc::new(MockApi::with_config(config).respond(Ok(SubmitResponse {
        message: Some(String::new()),
        ..SubmitResponse::default()
    })));
    let runtime = ready_runtime(api).await;
    runtime.open();

    let outcome = runtime.submit(jane()).await.unwrap();
    assert_eq!(outcome.message, "We'll call you.");
}

#[tokio::test(start_paused = true)]
async fn server_error_keeps_modal_open_with_form_intact() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()).respond(Err(500)));
    let runtime = ready_runtime(api.clone()).await;
    runtime.open();

    let values = jane().with("company", "Acme");
    let err = runtime.submit(values.clone()).await.unwrap_err();
    assert!(matches!(err, WidgetError::SubmissionRejected { status: 500 }));

    let view = runtime.view();
    assert_eq!(view.state, WidgetState::Open);
    assert!(!view.submit_disabled);
    assert_eq!(view.submit_label, "Submit");
    assert_eq!(
        view.feedback,
        Some(Feedback::Error(GENERIC_ERROR_MESSAGE.to_string()))
    );
    assert_eq!(view.form, values);

    // No automatic retry, no auto-close.
    sleep(Duration::from_secs(10)).await;
    assert_eq!(api.submissions().len(), 1);
    assert!(runtime.is_open());

    // Manual retry succeeds and clears the error.
    runtime.submit(FormValues::new()).await.unwrap();
    assert!(matches!(runtime.view().feedback, Some(Feedback::Success(_))));
    assert_eq!(api.submissions().len(), 2);
}

#[tokio::test]
async fn submit_control_is_disabled_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()).gated(gate.clone()));
    let runtime = ready_runtime(api.clone()).await;
    runtime.open();

    let in_flight = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.submit(jane()).await })
    };
    while runtime.state() != WidgetState::Submitting {
        tokio::task::yield_now().await;
    }

    let view = runtime.view();
    assert!(view.submit_disabled);
    assert_eq!(view.submit_label, SUBMITTING_LABEL);
    assert!(view.modal_visible);
    assert!(matches!(
        runtime.submit(jane()).await,
        Err(WidgetError::InvalidState {
            state: WidgetState::Submitting,
            ..
        })
    ));

    gate.notify_one();
    in_flight.await.unwrap().unwrap();
    assert_eq!(api.submissions().len(), 1);
    assert_eq!(runtime.state(), WidgetState::Open);
}

#[tokio::test(start_paused = true)]
async fn manual_close_cancels_pending_auto_close() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = ready_runtime(api).await;
    runtime.open();
    runtime.submit(jane()).await.unwrap();

    sleep(Duration::from_millis(1000)).await;
    assert!(runtime.close());
    sleep(Duration::from_millis(500)).await;
    assert!(runtime.open());
    assert_eq!(runtime.view().feedback, None);

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(runtime.state(), WidgetState::Open);
}

#[tokio::test]
async fn submit_requires_open_modal() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = ready_runtime(api.clone()).await;

    assert!(matches!(
        runtime.submit(jane()).await,
        Err(WidgetError::InvalidState {
            state: WidgetState::Closed,
            ..
        })
    ));
    assert!(api.submissions().is_empty());
}

#[tokio::test]
async fn missing_required_field_is_rejected_locally() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = ready_runtime(api.clone()).await;
    runtime.open();

    let err = runtime
        .submit(FormValues::new().with("email", "j@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, WidgetError::Validation(_)));

    let view = runtime.view();
    assert_eq!(view.state, WidgetState::Open);
    assert_eq!(
        view.feedback,
        Some(Feedback::Error("Name is required.".to_string()))
    );
    assert!(api.submissions().is_empty());
}

#[tokio::test]
async fn unparsable_estimate_is_sent_as_null() {
    let api = Arc::new(MockApi::with_config(WidgetConfig::default()));
    let runtime = ready_runtime(api.clone()).await;
    runtime.open();
    runtime.set_field("estimated_value", "abc");

    runtime.submit(jane()).await.unwrap();
    assert_eq!(api.submissions()[0].estimated_value, None);
}

#[tokio::test]
async fn close_during_submission_hides_outcome() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(
        MockApi::with_config(WidgetConfig::default())
            .gated(gate.clone())
            .respond(Err(502)),
    );
    let runtime = ready_runtime(api).await;
    runtime.open();

    let in_flight = {
        let runtime = runtime.clone();
        tokio::spawn(async move { runtime.submit(jane()).await })
    };
    while runtime.state() != WidgetState::Submitting {
        tokio::task::yield_now().await;
    }
    assert!(runtime.close());

    gate.notify_one();
    assert!(in_flight.await.unwrap().is_err());

    let view = runtime.view();
    assert_eq!(view.state, WidgetState::Closed);
    assert_eq!(view.feedback, None);
    assert!(!view.submit_disabled);
    assert_eq!(view.form, jane());
}
