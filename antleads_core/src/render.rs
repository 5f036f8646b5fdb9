//! Declarative element tree for the widget UI.
//!
//! Rendering is a pure function of [`WidgetConfig`]: the same config always
//! produces the same tree. Hosts mount the tree once; state changes are
//! reflected through [`crate::runtime::WidgetView`] rather than by rebuilding.

use crate::config::WidgetConfig;
use crate::fields::{field_specs, FieldSpec, InputKind};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use std::fmt::Write as _;

pub const MODAL_CLASS: &str = "antleads-widget-modal";
pub const MODAL_CONTENT_CLASS: &str = "antleads-widget-modal-content";
pub const BUTTON_CLASS: &str = "antleads-widget-button";
pub const CLOSE_BUTTON_CLASS: &str = "antleads-close-button";
pub const FORM_ID: &str = "antleads-widget-form";
pub const SUCCESS_ID: &str = "antleads-success-message";
pub const ERROR_ID: &str = "antleads-error-message";

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "path"];

const CHAT_ICON_PATH: &str = "M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z";

const INPUT_STYLE: &[(&str, &str)] = &[
    ("width", "100%"),
    ("padding", "10px"),
    ("border", "1px solid #d1d5db"),
    ("border-radius", "6px"),
    ("font-size", "14px"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Element {
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub style: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Boolean attribute such as `required`.
    pub fn flag(self, name: impl Into<String>) -> Self {
        self.attr(name, "")
    }

    pub fn css(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((property.into(), value.into()));
        self
    }

    pub fn css_all(mut self, rules: &[(&str, &str)]) -> Self {
        for (property, value) in rules {
            self.style.push((property.to_string(), value.to_string()));
        }
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    /// Replaces an existing style property, or appends it.
    pub fn set_css(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.style.iter_mut().find(|(k, _)| k == property) {
            slot.1 = value;
            return;
        }
        self.style.push((property.to_string(), value));
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => out.push_str(&e.text_content()),
            }
        }
        out
    }

    /// Depth-first, document-order search over this element and its descendants.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Element) -> bool) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(pred, &mut found);
        found
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        if pred(self) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(e) = child {
                e.collect(pred, found);
            }
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.find_all(&|e| e.get_attr("id") == Some(id))
            .into_iter()
            .next()
    }

    /// Form controls (`input`, `textarea`) in document order.
    pub fn controls(&self) -> Vec<&Element> {
        self.find_all(&|e| {
            (e.tag == "input" || e.tag == "textarea") && e.has_attr("name")
        })
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attrs {
            if value.is_empty() {
                let _ = write!(out, " {}", name);
            } else {
                let _ = write!(out, " {}=\"{}\"", name, encode_double_quoted_attribute(value));
            }
        }
        if !self.style.is_empty() {
            let css = self
                .style
                .iter()
                .map(|(k, v)| format!("{}: {};", k, v))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(out, " style=\"{}\"", encode_double_quoted_attribute(&css));
        }
        if VOID_TAGS.contains(&self.tag.as_str()) && self.children.is_empty() {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(&encode_text(t)),
                Node::Element(e) => e.write_html(out),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// One labeled control per field, in the given order.
pub fn render_fields<S: AsRef<str>>(fields: &[S]) -> Vec<Element> {
    field_specs(fields).iter().map(render_field).collect()
}

fn render_field(spec: &FieldSpec) -> Element {
    let label = Element::new("label")
        .attr("for", format!("antleads-field-{}", spec.name))
        .css_all(&[
            ("display", "block"),
            ("margin-bottom", "8px"),
            ("font-weight", "500"),
            ("color", "#374151"),
        ])
        .text(spec.label.clone());

    let mut control = match spec.kind {
        InputKind::TextArea { rows } => Element::new("textarea")
            .attr("rows", rows.to_string())
            .css_all(INPUT_STYLE)
            .css("font-family", "inherit")
            .css("resize", "vertical"),
        InputKind::Number { min, step } => Element::new("input")
            .attr("type", "number")
            .attr("min", min.to_string())
            .attr("step", step.to_string())
            .css_all(INPUT_STYLE),
        kind => Element::new("input")
            .attr("type", kind.input_type().unwrap_or("text"))
            .css_all(INPUT_STYLE),
    };
    control = control
        .attr("id", format!("antleads-field-{}", spec.name))
        .attr("name", spec.name.clone())
        .attr("placeholder", spec.placeholder.clone());
    if spec.required {
        control = control.flag("required");
    }

    Element::new("div")
        .css("margin-bottom", "16px")
        .child(label)
        .child(control)
}

/// Modal overlay with header, optional description, form and feedback slots.
pub fn render_modal(config: &WidgetConfig) -> Element {
    let accent = config.accent_color();

    let header = Element::new("div")
        .css_all(&[
            ("display", "flex"),
            ("justify-content", "space-between"),
            ("align-items", "center"),
            ("margin-bottom", "20px"),
        ])
        .child(
            Element::new("h2")
                .css_all(&[
                    ("margin", "0"),
                    ("font-size", "24px"),
                    ("font-weight", "600"),
                    ("color", "#111827"),
                ])
                .text(config.title.clone()),
        )
        .child(
            Element::new("button")
                .attr("type", "button")
                .attr("class", CLOSE_BUTTON_CLASS)
                .attr("aria-label", "Close")
                .css_all(&[
                    ("background", "none"),
                    ("border", "none"),
                    ("font-size", "28px"),
                    ("cursor", "pointer"),
                    ("color", "#6b7280"),
                ])
                .text("\u{00d7}"),
        );

    let submit = Element::new("div").css("margin-top", "24px").child(
        Element::new("button")
            .attr("type", "submit")
            .css_all(&[
                ("width", "100%"),
                ("padding", "12px"),
                ("color", "white"),
                ("border", "none"),
                ("border-radius", "6px"),
                ("font-size", "16px"),
                ("cursor", "pointer"),
            ])
            .css("background", accent)
            .text(config.submit_label()),
    );

    let form = Element::new("form")
        .attr("id", FORM_ID)
        .children(render_fields(&config.fields))
        .child(submit);

    let mut body = Element::new("div").css("padding", "24px").child(header);
    if let Some(description) = config.description.as_deref().filter(|d| !d.is_empty()) {
        body = body.child(
            Element::new("p")
                .css_all(&[
                    ("margin-bottom", "20px"),
                    ("color", "#6b7280"),
                    ("line-height", "1.6"),
                ])
                .text(description),
        );
    }
    body = body
        .child(form)
        .child(
            Element::new("div")
                .attr("id", SUCCESS_ID)
                .attr("role", "status")
                .css_all(&[
                    ("display", "none"),
                    ("padding", "16px"),
                    ("background", "#d1fae5"),
                    ("color", "#065f46"),
                ])
                .text(config.success_message.clone()),
        )
        .child(
            Element::new("div")
                .attr("id", ERROR_ID)
                .attr("role", "alert")
                .css_all(&[
                    ("display", "none"),
                    ("padding", "16px"),
                    ("background", "#fee2e2"),
                    ("color", "#991b1b"),
                ]),
        );

    Element::new("div")
        .attr("class", MODAL_CLASS)
        .css_all(&[
            ("display", "none"),
            ("position", "fixed"),
            ("z-index", "9999"),
            ("left", "0"),
            ("top", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("background", "rgba(0, 0, 0, 0.5)"),
            ("align-items", "center"),
            ("justify-content", "center"),
        ])
        .child(
            Element::new("div")
                .attr("class", MODAL_CONTENT_CLASS)
                .css_all(&[
                    ("background", "white"),
                    ("border-radius", "8px"),
                    ("max-width", "500px"),
                    ("width", "90%"),
                    ("max-height", "90vh"),
                    ("overflow-y", "auto"),
                ])
                .child(body),
        )
}

/// Floating round trigger pinned to the configured corner.
pub fn render_button(config: &WidgetConfig) -> Element {
    let [(vertical, v_offset), (horizontal, h_offset)] = config.button_position.offsets();

    let icon = Element::new("svg")
        .attr("width", "24")
        .attr("height", "24")
        .attr("viewBox", "0 0 24 24")
        .attr("fill", "none")
        .attr("stroke", "currentColor")
        .attr("stroke-width", "2")
        .child(Element::new("path").attr("d", CHAT_ICON_PATH));

    Element::new("button")
        .attr("type", "button")
        .attr("class", BUTTON_CLASS)
        .attr("aria-label", config.title.clone())
        .css_all(&[
            ("position", "fixed"),
            ("z-index", "9998"),
            ("width", "60px"),
            ("height", "60px"),
            ("border-radius", "50%"),
        ])
        .css("background", config.accent_color())
        .css_all(&[
            ("color", "white"),
            ("border", "none"),
            ("cursor", "pointer"),
            ("box-shadow", "0 4px 12px rgba(0,0,0,0.15)"),
            ("display", "flex"),
            ("align-items", "center"),
            ("justify-content", "center"),
        ])
        .css(vertical, v_offset)
        .css(horizontal, h_offset)
        .child(icon)
}
