use crate::cli::Cli;
use crate::commands::{http_api, spinner, Result};
use crate::output::{format_output, OutputData};
use antleads_core::WidgetApi;

pub async fn run(cli: &Cli, widget_id: &str) -> Result<()> {
    let api = http_api(cli)?;

    let progress = spinner(format!("Loading widget {}...", widget_id));
    let result = api.fetch_config(widget_id).await;
    progress.finish_and_clear();

    let config = result?;
    let output_data = OutputData::WidgetConfig {
        widget_id: config
            .widget_id
            .clone()
            .unwrap_or_else(|| widget_id.to_string()),
        config,
    };
    format_output(&output_data, &cli.output)
}
