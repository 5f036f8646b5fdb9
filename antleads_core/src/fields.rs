//! Field-name policy for the widget form.
//!
//! The input type, required flag and label of a form field are derived from its
//! name alone. Unknown names are not rejected; they become plain text inputs.

use serde::Serialize;

/// Kind of control rendered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Number { min: f64, step: f64 },
    TextArea { rows: u32 },
}

impl InputKind {
    /// Value of the `type` attribute for `<input>` controls.
    pub fn input_type(&self) -> Option<&'static str> {
        match self {
            InputKind::Text => Some("text"),
            InputKind::Email => Some("email"),
            InputKind::Tel => Some("tel"),
            InputKind::Number { .. } => Some("number"),
            InputKind::TextArea { .. } => None,
        }
    }
}

/// Maps a field name to its control kind.
pub fn input_kind(field: &str) -> InputKind {
    match field {
        "message" => InputKind::TextArea { rows: 4 },
        "estimated_value" => InputKind::Number {
            min: 0.0,
            step: 0.01,
        },
        "email" => InputKind::Email,
        "phone" => InputKind::Tel,
        _ => InputKind::Text,
    }
}

/// `name` and `email` are required whenever they are rendered.
pub fn is_required(field: &str) -> bool {
    matches!(field, "name" | "email")
}

/// Display text for a field key: underscores become spaces, words are capitalized.
pub fn display_name(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Everything needed to render one labeled control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: InputKind,
    pub required: bool,
    pub placeholder: String,
}

impl FieldSpec {
    pub fn for_field(name: &str) -> Self {
        let kind = input_kind(name);
        let required = is_required(name);
        let display = display_name(name);
        let label = if required {
            format!("{} *", display)
        } else {
            display.clone()
        };
        let placeholder = match kind {
            InputKind::Number { .. } => format!("Enter your {} (e.g., 50000)", display.to_lowercase()),
            _ => format!("Enter your {}...", display.to_lowercase()),
        };
        Self {
            name: name.to_string(),
            label,
            kind,
            required,
            placeholder,
        }
    }
}

/// One spec per entry, in the given order. Duplicates are kept as-is.
pub fn field_specs<S: AsRef<str>>(fields: &[S]) -> Vec<FieldSpec> {
    fields
        .iter()
        .map(|f| FieldSpec::for_field(f.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_fields_to_controls() {
        assert_eq!(input_kind("message"), InputKind::TextArea { rows: 4 });
        assert_eq!(
            input_kind("estimated_value"),
            InputKind::Number {
                min: 0.0,
                step: 0.01
            }
        );
        assert_eq!(input_kind("email"), InputKind::Email);
        assert_eq!(input_kind("phone"), InputKind::Tel);
        assert_eq!(input_kind("company"), InputKind::Text);
        assert_eq!(input_kind("favourite_colour"), InputKind::Text);
    }

    #[test]
    fn only_name_and_email_are_required() {
        assert!(is_required("name"));
        assert!(is_required("email"));
        assert!(!is_required("phone"));
        assert!(!is_required("message"));
    }

    #[test]
    fn display_name_replaces_every_underscore() {
        assert_eq!(display_name("estimated_value"), "Estimated Value");
        assert_eq!(display_name("job_title_role"), "Job Title Role");
        assert_eq!(display_name("name"), "Name");
    }

    #[test]
    fn specs_preserve_order() {
        let specs = field_specs(&["company", "name", "message"]);
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["company", "name", "message"]);
        assert_eq!(specs[1].label, "Name *");
        assert!(specs[1].required);
        assert_eq!(specs[0].placeholder, "Enter your company...");
    }

    #[test]
    fn number_placeholder_has_example() {
        let spec = FieldSpec::for_field("estimated_value");
        assert_eq!(spec.placeholder, "Enter your estimated value (e.g., 50000)");
        assert_eq!(spec.kind.input_type(), Some("number"));
    }
}
