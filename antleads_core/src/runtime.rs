//! One embedded widget instance and its open/close/submit lifecycle.
//!
//! ```text
//! Uninitialized --config ok--> Closed <--close/auto-close-- Open
//!       |                        |                          ^  |
//!       +--config error--> Failed +--trigger/auto-open------+  | submit
//!                                                              v
//!                                 Open (feedback shown) <-- Submitting
//! ```
//!
//! All state lives behind one mutex owned by the instance; timers hold only a
//! weak reference, so dropping every handle to the runtime cancels them.

use crate::client::WidgetApi;
use crate::config::WidgetConfig;
use crate::embed::{EmbedAttributes, HostPage};
use crate::error::WidgetError;
use crate::payload::{validate, FormValues, SubmissionPayload};
use crate::render::{render_button, render_modal, Element};
use crate::schedule::ScheduledAction;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How long a success message stays up before the modal closes itself.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(2000);
pub const SUBMITTING_LABEL: &str = "Submitting...";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    Uninitialized,
    Closed,
    Open,
    Submitting,
    /// Terminal. Nothing is rendered.
    Failed,
}

impl WidgetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetState::Uninitialized => "uninitialized",
            WidgetState::Closed => "closed",
            WidgetState::Open => "open",
            WidgetState::Submitting => "submitting",
            WidgetState::Failed => "failed",
        }
    }

    /// Whether the modal is on screen.
    pub fn is_visible(&self) -> bool {
        matches!(self, WidgetState::Open | WidgetState::Submitting)
    }
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Feedback {
    Success(String),
    Error(String),
}

impl Feedback {
    pub fn message(&self) -> &str {
        match self {
            Feedback::Success(m) | Feedback::Error(m) => m,
        }
    }
}

/// The affordance that opens the modal. Exactly one per instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    FloatingButton(Element),
    BoundElement { selector: String },
}

/// UI events the host forwards to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    TriggerClicked,
    CloseClicked,
    BackdropClicked,
}

/// Everything built at initialization. Never changes afterwards.
#[derive(Debug)]
pub struct Mounted {
    pub widget_id: String,
    pub config: WidgetConfig,
    pub modal: Element,
    pub trigger: Trigger,
}

/// Snapshot of what the visitor currently sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub state: WidgetState,
    pub modal_visible: bool,
    pub feedback: Option<Feedback>,
    pub submit_label: String,
    pub submit_disabled: bool,
    pub form: FormValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub message: String,
    pub lead_id: Option<String>,
}

struct Shared {
    state: WidgetState,
    loading: bool,
    mounted: Option<Arc<Mounted>>,
    form: FormValues,
    feedback: Option<Feedback>,
    submit_label: String,
    submit_disabled: bool,
    auto_open: Option<ScheduledAction>,
    auto_close: Option<ScheduledAction>,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: WidgetState::Uninitialized,
            loading: false,
            mounted: None,
            form: FormValues::new(),
            feedback: None,
            submit_label: String::new(),
            submit_disabled: false,
            auto_open: None,
            auto_close: None,
        }
    }

    fn open(&mut self) -> bool {
        if self.state != WidgetState::Closed {
            return false;
        }
        self.state = WidgetState::Open;
        if let Some(timer) = self.auto_open.take() {
            timer.cancel();
        }
        true
    }

    fn close(&mut self) -> bool {
        if !self.state.is_visible() {
            return false;
        }
        self.state = WidgetState::Closed;
        self.feedback = None;
        if let Some(timer) = self.auto_close.take() {
            timer.cancel();
        }
        true
    }
}

fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A widget instance. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct WidgetRuntime {
    attrs: EmbedAttributes,
    api: Arc<dyn WidgetApi>,
    page: Arc<dyn HostPage>,
    shared: Arc<Mutex<Shared>>,
}

impl fmt::Debug for WidgetRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRuntime")
            .field("attrs", &self.attrs)
            .field("state", &self.state())
            .finish()
    }
}

impl WidgetRuntime {
    pub fn new(api: Arc<dyn WidgetApi>, page: Arc<dyn HostPage>, attrs: EmbedAttributes) -> Self {
        Self {
            attrs,
            api,
            page,
            shared: Arc::new(Mutex::new(Shared::new())),
        }
    }

    /// Builds a runtime and initializes it. Load failures leave it `Failed`;
    /// they are logged and never returned, so the host page is unaffected.
    pub async fn embed(
        api: Arc<dyn WidgetApi>,
        page: Arc<dyn HostPage>,
        attrs: EmbedAttributes,
    ) -> Self {
        let runtime = Self::new(api, page, attrs);
        let _ = runtime.initialize().await;
        runtime
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock_shared(&self.shared)
    }

    /// Loads the remote config and mounts the modal and trigger.
    pub async fn initialize(&self) -> Result<(), WidgetError> {
        {
            let mut shared = self.lock();
            if shared.state != WidgetState::Uninitialized || shared.loading {
                return Err(WidgetError::InvalidState {
                    operation: "initialize",
                    state: shared.state,
                });
            }
            shared.loading = true;
        }

        let result = self.load().await;

        let mut shared = self.lock();
        shared.loading = false;
        match result {
            Ok(mounted) => {
                tracing::info!(
                    widget_id = %mounted.widget_id,
                    fields = mounted.config.fields.len(),
                    bound = matches!(mounted.trigger, Trigger::BoundElement { .. }),
                    "Widget initialized"
                );
                let auto_open = match mounted.trigger {
                    Trigger::FloatingButton(_) => mounted.config.auto_open_after(),
                    Trigger::BoundElement { .. } => None,
                };
                shared.submit_label = mounted.config.submit_label().to_string();
                shared.mounted = Some(Arc::new(mounted));
                shared.state = WidgetState::Closed;
                if let Some(delay) = auto_open {
                    shared.auto_open = Some(self.schedule_auto_open(delay));
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    widget_id = self.attrs.widget_id.as_deref().unwrap_or(""),
                    code = err.code_str(),
                    error = %err,
                    "Failed to load widget configuration"
                );
                shared.state = WidgetState::Failed;
                Err(err)
            }
        }
    }

    async fn load(&self) -> Result<Mounted, WidgetError> {
        let widget_id = self.attrs.require_widget_id()?.to_string();
        let config = self.api.fetch_config(&widget_id).await?;
        let modal = render_modal(&config);
        let trigger = self.resolve_trigger(&config);
        Ok(Mounted {
            widget_id,
            config,
            modal,
            trigger,
        })
    }

    fn resolve_trigger(&self, config: &WidgetConfig) -> Trigger {
        if let Some(selector) = self.attrs.bind_to.as_deref() {
            if self.page.has_element(selector) {
                return Trigger::BoundElement {
                    selector: selector.to_string(),
                };
            }
            tracing::warn!(selector, "Bind target not found, using floating button");
        }
        Trigger::FloatingButton(render_button(config))
    }

    fn schedule_auto_open(&self, delay: Duration) -> ScheduledAction {
        let weak = Arc::downgrade(&self.shared);
        ScheduledAction::after("auto_open", delay, move || {
            let Some(shared) = weak.upgrade() else { return };
            let mut shared = lock_shared(&shared);
            if let Some(timer) = shared.auto_open.take() {
                timer.disarm();
            }
            if shared.open() {
                tracing::debug!("Widget auto-opened");
            }
        })
    }

    fn schedule_auto_close(&self) -> ScheduledAction {
        let weak = Arc::downgrade(&self.shared);
        ScheduledAction::after("auto_close", AUTO_CLOSE_DELAY, move || {
            let Some(shared) = weak.upgrade() else { return };
            let mut shared = lock_shared(&shared);
            if let Some(timer) = shared.auto_close.take() {
                timer.disarm();
            }
            shared.close();
        })
    }

    pub fn state(&self) -> WidgetState {
        self.lock().state
    }

    pub fn is_open(&self) -> bool {
        self.lock().state.is_visible()
    }

    /// Shows the modal. No-op unless `Closed`; returns whether anything changed.
    pub fn open(&self) -> bool {
        self.lock().open()
    }

    /// Hides the modal and clears feedback. No-op when nothing is shown.
    pub fn close(&self) -> bool {
        self.lock().close()
    }

    pub fn handle(&self, event: WidgetEvent) -> bool {
        match event {
            WidgetEvent::TriggerClicked => self.open(),
            WidgetEvent::CloseClicked | WidgetEvent::BackdropClicked => self.close(),
        }
    }

    pub fn mounted(&self) -> Option<Arc<Mounted>> {
        self.lock().mounted.clone()
    }

    /// Records a value typed into a field.
    pub fn set_field(&self, field: impl Into<String>, value: impl Into<String>) {
        self.lock().form.set(field, value);
    }

    pub fn view(&self) -> WidgetView {
        let shared = self.lock();
        WidgetView {
            state: shared.state,
            modal_visible: shared.state.is_visible(),
            feedback: shared.feedback.clone(),
            submit_label: shared.submit_label.clone(),
            submit_disabled: shared.submit_disabled,
            form: shared.form.clone(),
        }
    }

    /// Submits the form with `values` merged over what was already typed.
    ///
    /// Only valid while `Open` with the submit control enabled. Failures keep
    /// the typed values and show a generic message; nothing is retried.
    pub async fn submit(&self, values: FormValues) -> Result<SubmitOutcome, WidgetError> {
        let (mounted, payload) = {
            let mut shared = self.lock();
            if shared.state != WidgetState::Open || shared.submit_disabled {
                return Err(WidgetError::InvalidState {
                    operation: "submit",
                    state: shared.state,
                });
            }
            let Some(mounted) = shared.mounted.clone() else {
                return Err(WidgetError::InvalidState {
                    operation: "submit",
                    state: shared.state,
                });
            };

            shared.form.merge(values);
            shared.feedback = None;
            if let Some(timer) = shared.auto_close.take() {
                timer.cancel();
            }
            if let Err(err) = validate(&mounted.config.fields, &shared.form) {
                shared.feedback = Some(Feedback::Error(err.to_string()));
                return Err(err);
            }

            let payload = SubmissionPayload::from_form(
                &mounted.widget_id,
                &shared.form,
                self.page.location(),
                self.page.referrer(),
            );
            shared.state = WidgetState::Submitting;
            shared.submit_disabled = true;
            shared.submit_label = SUBMITTING_LABEL.to_string();
            (mounted, payload)
        };

        let result = self.api.submit(&mounted.widget_id, &payload).await;

        let mut shared = self.lock();
        shared.submit_disabled = false;
        shared.submit_label = mounted.config.submit_label().to_string();
        // A close while the request was in flight hides the outcome.
        let visible = shared.state == WidgetState::Submitting;
        if visible {
            shared.state = WidgetState::Open;
        }

        match result {
            Ok(response) => {
                let message = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| mounted.config.success_message.clone());
                shared.form.clear();
                if visible {
                    shared.feedback = Some(Feedback::Success(message.clone()));
                    shared.auto_close = Some(self.schedule_auto_close());
                }
                tracing::info!(
                    widget_id = %mounted.widget_id,
                    lead_id = response.lead_id.as_deref().unwrap_or(""),
                    "Widget submission accepted"
                );
                Ok(SubmitOutcome {
                    message,
                    lead_id: response.lead_id,
                })
            }
            Err(err) => {
                tracing::warn!(
                    widget_id = %mounted.widget_id,
                    code = err.code_str(),
                    error = %err,
                    "Widget submission failed"
                );
                if visible {
                    shared.feedback = Some(Feedback::Error(GENERIC_ERROR_MESSAGE.to_string()));
                }
                Err(err)
            }
        }
    }
}
