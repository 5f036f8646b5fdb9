use crate::cli::Cli;
use crate::commands::Result;
use crate::output::{format_output, OutputData};
use antleads_core::{embed_snippet, EmbedAttributes};

pub fn run(cli: &Cli, widget_id: &str, script_src: &str, bind_to: Option<&str>) -> Result<()> {
    let attrs = EmbedAttributes::from_attributes([
        ("data-widget-id", widget_id),
        ("data-bind-to", bind_to.unwrap_or_default()),
    ]);
    let widget_id = attrs.require_widget_id()?;

    let output_data = OutputData::EmbedCode {
        widget_id: widget_id.to_string(),
        snippet: embed_snippet(script_src, widget_id, attrs.bind_to.as_deref()),
    };
    format_output(&output_data, &cli.output)
}
