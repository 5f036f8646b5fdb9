use crate::cli::OutputFormat;
use crate::commands::Result;
use antleads_core::{SubmitOutcome, WidgetConfig};
use serde::Serialize;

mod pretty;
pub use pretty::format_pretty;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    WidgetConfig {
        widget_id: String,
        config: WidgetConfig,
    },
    Preview {
        widget_id: String,
        trigger: String,
        path: Option<String>,
    },
    EmbedCode {
        widget_id: String,
        snippet: String,
    },
    Submission {
        widget_id: String,
        outcome: SubmitOutcome,
    },
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Text => {
            format_text_output(data);
        }
        OutputFormat::Pretty => {
            format_pretty(data);
        }
    }
    Ok(())
}

fn format_text_output(data: &OutputData) {
    match data {
        OutputData::WidgetConfig { widget_id, config } => {
            println!("widget_id: {}", widget_id);
            println!("title: {}", config.title);
            if let Some(description) = &config.description {
                println!("description: {}", description);
            }
            println!("fields: {}", config.fields.join(","));
            println!("submit_button_text: {}", config.submit_button_text);
            println!("success_message: {}", config.success_message);
            println!("primary_color: {}", config.primary_color);
            println!("button_position: {}", config.button_position);
            println!("auto_open: {}", config.auto_open);
            println!("auto_open_delay: {}", config.auto_open_delay);
        }
        OutputData::Preview { path, .. } => {
            if let Some(path) = path {
                println!("{}", path);
            }
        }
        OutputData::EmbedCode { snippet, .. } => {
            println!("{}", snippet);
        }
        OutputData::Submission { outcome, .. } => {
            println!("{}", outcome.message);
            if let Some(lead_id) = &outcome.lead_id {
                println!("lead_id: {}", lead_id);
            }
        }
    }
}
