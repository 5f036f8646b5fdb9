// src/error.rs
use crate::runtime::WidgetState;

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Settings file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Missing data-widget-id attribute")]
    MissingWidgetId,

    #[error("Failed to load widget config: {status}")]
    ConfigUnavailable { status: u16 },

    #[error("Submission failed: {status}")]
    SubmissionRejected { status: u16 },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("{0}")]
    Validation(String),

    #[error("Cannot {operation} while widget is {state}")]
    InvalidState {
        operation: &'static str,
        state: WidgetState,
    },
}

impl WidgetError {
    pub fn code_str(&self) -> &'static str {
        match self {
            WidgetError::MissingWidgetId => "missing_widget_id",
            WidgetError::ConfigUnavailable { .. } => "config_unavailable",
            WidgetError::SubmissionRejected { .. } => "submission_rejected",
            WidgetError::HttpRequest(_) => "upstream_error",
            WidgetError::SerdeJson(_) => "parse_error",
            WidgetError::Toml(_) => "invalid_settings",
            WidgetError::InvalidSettings(_) => "invalid_settings",
            WidgetError::Validation(_) => "invalid_input",
            WidgetError::InvalidState { .. } => "invalid_state",
            WidgetError::Io(_) => "internal_error",
        }
    }

    /// Whether the visitor can fix this by editing the form and resubmitting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WidgetError::SubmissionRejected { .. }
                | WidgetError::HttpRequest(_)
                | WidgetError::Validation(_)
        )
    }
}
