// src/lib.rs
//! Headless runtime for the AntLeads contact widget.
//!
//! A [`WidgetRuntime`] loads a widget's public configuration from the CRM
//! backend, renders the trigger and modal form as an [`Element`] tree, and
//! forwards visitor submissions to the backend as leads.
pub mod client;
pub mod config;
pub mod embed;
pub mod error;
pub mod fields;
pub mod payload;
pub mod render;
pub mod runtime;
pub mod schedule;
pub mod settings;

pub use crate::client::{HttpWidgetApi, WidgetApi};
pub use crate::config::{ButtonPosition, WidgetConfig};
pub use crate::embed::{embed_snippet, EmbedAttributes, HostPage, StaticPage};
pub use crate::error::WidgetError;
pub use crate::payload::{FormValues, SubmissionPayload, SubmitResponse};
pub use crate::render::Element;
pub use crate::runtime::{
    Feedback, Mounted, SubmitOutcome, Trigger, WidgetEvent, WidgetRuntime, WidgetState,
    WidgetView,
};
pub use crate::settings::ClientSettings;
