//! The embedding contract between a host page and the widget.

use crate::error::WidgetError;
use html_escape::encode_double_quoted_attribute;
use std::collections::HashSet;

pub const WIDGET_ID_ATTR: &str = "data-widget-id";
pub const BIND_TO_ATTR: &str = "data-bind-to";

/// Attributes read from the hosting `<script>` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedAttributes {
    pub widget_id: Option<String>,
    pub bind_to: Option<String>,
}

impl EmbedAttributes {
    pub fn new(widget_id: impl Into<String>) -> Self {
        Self {
            widget_id: Some(widget_id.into()),
            bind_to: None,
        }
    }

    pub fn bind_to(mut self, selector: impl Into<String>) -> Self {
        self.bind_to = Some(selector.into());
        self
    }

    /// Picks the widget attributes out of a script tag's attribute list.
    /// Blank values count as absent.
    pub fn from_attributes<I, K, V>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut out = Self::default();
        for (name, value) in attrs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match name.as_ref() {
                WIDGET_ID_ATTR => out.widget_id = Some(value.to_string()),
                BIND_TO_ATTR => out.bind_to = Some(value.to_string()),
                _ => {}
            }
        }
        out
    }

    pub fn require_widget_id(&self) -> Result<&str, WidgetError> {
        self.widget_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(WidgetError::MissingWidgetId)
    }
}

/// What the widget needs to know about the page it is embedded in.
pub trait HostPage: Send + Sync {
    /// Current page location, sent as the submission `url`.
    fn location(&self) -> String;

    fn referrer(&self) -> Option<String>;

    /// Whether `selector` resolves to an element the widget can bind to.
    fn has_element(&self, selector: &str) -> bool;
}

/// A fixed page description, for previews, the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    pub location: String,
    pub referrer: Option<String>,
    pub selectors: HashSet<String>,
}

impl StaticPage {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_element(mut self, selector: impl Into<String>) -> Self {
        self.selectors.insert(selector.into());
        self
    }
}

impl HostPage for StaticPage {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn referrer(&self) -> Option<String> {
        self.referrer.clone()
    }

    fn has_element(&self, selector: &str) -> bool {
        self.selectors.contains(selector)
    }
}

/// The `<script>` tag a site owner pastes into their page.
pub fn embed_snippet(script_src: &str, widget_id: &str, bind_to: Option<&str>) -> String {
    let mut tag = format!(
        "<script src=\"{}\" {}=\"{}\"",
        encode_double_quoted_attribute(script_src),
        WIDGET_ID_ATTR,
        encode_double_quoted_attribute(widget_id)
    );
    if let Some(selector) = bind_to.filter(|s| !s.trim().is_empty()) {
        tag.push_str(&format!(
            " {}=\"{}\"",
            BIND_TO_ATTR,
            encode_double_quoted_attribute(selector)
        ));
    }
    tag.push_str("></script>");
    tag
}
