use crate::error::WidgetError;
use crate::fields::{display_name, input_kind, is_required, InputKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw values typed into the form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Trimmed value, `None` when missing or blank.
    pub fn non_empty(&self, field: &str) -> Option<String> {
        self.get(field)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn merge(&mut self, other: FormValues) {
        self.0.extend(other.0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Body of `POST /api/v1/widgets/{id}/submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub widget_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub estimated_value: Option<f64>,
    pub url: String,
    pub referrer: Option<String>,
}

impl SubmissionPayload {
    pub fn from_form(
        widget_id: &str,
        form: &FormValues,
        url: impl Into<String>,
        referrer: Option<String>,
    ) -> Self {
        Self {
            widget_id: widget_id.to_string(),
            name: form.non_empty("name").unwrap_or_default(),
            email: form.non_empty("email"),
            phone: form.non_empty("phone"),
            company: form.non_empty("company"),
            message: form.non_empty("message"),
            estimated_value: form.get("estimated_value").and_then(parse_estimated_value),
            url: url.into(),
            referrer: referrer.filter(|r| !r.is_empty()),
        }
    }
}

/// Parses a numeric form value. Blank, unparsable and non-finite input is `None`.
pub fn parse_estimated_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Checks the constraints the rendered controls declare.
///
/// Only fields that are actually rendered are checked: a required field missing
/// from the configured list cannot be filled in, so it is not enforced here.
pub fn validate<S: AsRef<str>>(fields: &[S], form: &FormValues) -> Result<(), WidgetError> {
    for field in fields.iter().map(AsRef::as_ref) {
        let value = form.non_empty(field);
        if is_required(field) && value.is_none() {
            return Err(WidgetError::Validation(format!(
                "{} is required.",
                display_name(field)
            )));
        }
        let Some(value) = value else { continue };
        match input_kind(field) {
            InputKind::Email if !looks_like_email(&value) => {
                return Err(WidgetError::Validation(
                    "Please enter a valid email address.".to_string(),
                ));
            }
            InputKind::Number { min, .. } => {
                if let Some(number) = parse_estimated_value(&value) {
                    if number < min {
                        return Err(WidgetError::Validation(format!(
                            "{} must be at least {}.",
                            display_name(field),
                            min
                        )));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Response of a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lead_id: Option<String>,
}
