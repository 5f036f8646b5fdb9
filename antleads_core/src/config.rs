use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const DEFAULT_TITLE: &str = "Get in Touch";
pub const DEFAULT_SUBMIT_TEXT: &str = "Submit";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you! We'll be in touch soon.";
pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";
pub const DEFAULT_AUTO_OPEN_DELAY: f64 = 5.0;

/// Fields rendered when the backend does not send a list.
pub const DEFAULT_FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "company",
    "estimated_value",
    "message",
];

static CSS_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(#[0-9a-fA-F]{3,8}|[a-zA-Z]{3,20}|(rgb|rgba|hsl|hsla)\([0-9.,% /]+\))$",
    )
    .expect("valid color regex")
});

/// Public widget configuration served by `GET /api/v1/widgets/{id}/config`.
///
/// Loaded once per runtime and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_submit_text")]
    pub submit_button_text: String,
    #[serde(default = "default_success_message")]
    pub success_message: String,
    #[serde(default = "default_fields", deserialize_with = "fields_or_default")]
    pub fields: Vec<String>,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default)]
    pub button_position: ButtonPosition,
    #[serde(default)]
    pub auto_open: bool,
    #[serde(default = "default_auto_open_delay")]
    pub auto_open_delay: f64,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_submit_text() -> String {
    DEFAULT_SUBMIT_TEXT.to_string()
}

fn default_success_message() -> String {
    DEFAULT_SUCCESS_MESSAGE.to_string()
}

fn default_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect()
}

fn default_primary_color() -> String {
    DEFAULT_PRIMARY_COLOR.to_string()
}

fn default_auto_open_delay() -> f64 {
    DEFAULT_AUTO_OPEN_DELAY
}

// `"fields": null` means the same thing as a missing key.
fn fields_or_default<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let fields: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(fields.unwrap_or_else(default_fields))
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            widget_id: None,
            title: default_title(),
            description: None,
            submit_button_text: default_submit_text(),
            success_message: default_success_message(),
            fields: default_fields(),
            primary_color: default_primary_color(),
            button_position: ButtonPosition::default(),
            auto_open: false,
            auto_open_delay: DEFAULT_AUTO_OPEN_DELAY,
        }
    }
}

impl WidgetConfig {
    /// Primary color safe to interpolate into an inline style.
    pub fn accent_color(&self) -> &str {
        let color = self.primary_color.trim();
        if CSS_COLOR.is_match(color) {
            color
        } else {
            DEFAULT_PRIMARY_COLOR
        }
    }

    /// Label shown on the submit control when it is idle.
    pub fn submit_label(&self) -> &str {
        if self.submit_button_text.trim().is_empty() {
            DEFAULT_SUBMIT_TEXT
        } else {
            &self.submit_button_text
        }
    }

    /// Auto-open delay as a duration, if auto-open is enabled.
    ///
    /// A zero, negative or non-finite delay disables auto-open; absurdly large
    /// ones saturate.
    pub fn auto_open_after(&self) -> Option<std::time::Duration> {
        let secs = self.auto_open_delay;
        if !self.auto_open || !secs.is_finite() || secs <= 0.0 {
            return None;
        }
        Some(std::time::Duration::try_from_secs_f64(secs).unwrap_or(std::time::Duration::MAX))
    }
}

/// Corner the floating trigger is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ButtonPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl ButtonPosition {
    /// Parses a position name. Unknown values fall back to bottom-right.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bottom-left" => ButtonPosition::BottomLeft,
            "top-right" => ButtonPosition::TopRight,
            "top-left" => ButtonPosition::TopLeft,
            _ => ButtonPosition::BottomRight,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonPosition::BottomRight => "bottom-right",
            ButtonPosition::BottomLeft => "bottom-left",
            ButtonPosition::TopRight => "top-right",
            ButtonPosition::TopLeft => "top-left",
        }
    }

    /// CSS offsets pinning the trigger 20px in from the corner.
    pub fn offsets(&self) -> [(&'static str, &'static str); 2] {
        match self {
            ButtonPosition::BottomRight => [("bottom", "20px"), ("right", "20px")],
            ButtonPosition::BottomLeft => [("bottom", "20px"), ("left", "20px")],
            ButtonPosition::TopRight => [("top", "20px"), ("right", "20px")],
            ButtonPosition::TopLeft => [("top", "20px"), ("left", "20px")],
        }
    }
}

impl<'de> Deserialize<'de> for ButtonPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(ButtonPosition::parse_lenient)
            .unwrap_or_default())
    }
}

impl fmt::Display for ButtonPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
