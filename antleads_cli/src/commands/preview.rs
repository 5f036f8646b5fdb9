use crate::cli::Cli;
use crate::commands::{http_api, spinner, CommandError, Result};
use crate::output::{format_output, OutputData};
use antleads_core::{EmbedAttributes, StaticPage, Trigger, WidgetRuntime};
use html_escape::encode_text;
use std::path::Path;
use std::sync::Arc;

pub async fn run(
    cli: &Cli,
    widget_id: &str,
    bind_to: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let api = Arc::new(http_api(cli)?);

    let mut attrs = EmbedAttributes::new(widget_id);
    let mut page = StaticPage::new("about:blank");
    if let Some(selector) = bind_to {
        attrs = attrs.bind_to(selector);
        page = page.with_element(selector);
    }

    let progress = spinner(format!("Rendering widget {}...", widget_id));
    let runtime = WidgetRuntime::new(api, Arc::new(page), attrs);
    let result = runtime.initialize().await;
    progress.finish_and_clear();
    result?;

    let mounted = runtime
        .mounted()
        .ok_or_else(|| CommandError::WidgetUnavailable(widget_id.to_string()))?;
    runtime.open();

    // The mounted tree is the closed modal; show it as an opened widget would.
    let mut modal = mounted.modal.clone();
    if runtime.view().modal_visible {
        modal.set_css("display", "flex");
    }

    let (trigger_html, trigger) = match &mounted.trigger {
        Trigger::FloatingButton(button) => (
            button.to_html(),
            format!("floating button ({})", mounted.config.button_position),
        ),
        Trigger::BoundElement { selector } => (
            format!(
                "<button type=\"button\" data-bound-selector=\"{}\">{}</button>",
                html_escape::encode_double_quoted_attribute(selector),
                encode_text(selector)
            ),
            format!("bound to {}", selector),
        ),
    };

    let html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} preview</title>\n</head>\n<body>\n{}\n{}\n</body>\n</html>\n",
        encode_text(&mounted.config.title),
        trigger_html,
        modal.to_html()
    );

    let Some(path) = out else {
        print!("{}", html);
        tracing::debug!(%trigger, "Preview written to stdout");
        return Ok(());
    };

    std::fs::write(path, &html)?;
    let output_data = OutputData::Preview {
        widget_id: mounted.widget_id.clone(),
        trigger,
        path: Some(path.display().to_string()),
    };
    format_output(&output_data, &cli.output)
}
