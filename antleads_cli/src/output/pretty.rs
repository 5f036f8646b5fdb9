//! Pretty formatter for terminal output.

use super::OutputData;
use antleads_core::fields::field_specs;
use antleads_core::WidgetConfig;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

pub fn format_pretty(data: &OutputData) {
    match data {
        OutputData::WidgetConfig { widget_id, config } => print_config(widget_id, config),
        OutputData::Preview {
            widget_id,
            trigger,
            path,
        } => {
            println!();
            println!("{} {}", "Preview".bold().cyan(), widget_id.dimmed());
            println!("  Trigger: {}", trigger);
            match path {
                Some(path) => println!("  Written to {}", path.green()),
                None => println!("  {}", "(HTML written to stdout)".dimmed()),
            }
            println!();
        }
        OutputData::EmbedCode { widget_id, snippet } => {
            println!();
            println!(
                "{} {}",
                "Embed code for".bold().cyan(),
                widget_id.bold()
            );
            println!();
            println!("  {}", snippet);
            println!();
            println!(
                "{} Paste it before the closing {} tag of your page.",
                "Tip:".dimmed(),
                "</body>".cyan()
            );
            println!();
        }
        OutputData::Submission { widget_id, outcome } => {
            println!();
            println!("{} {}", "✓".green().bold(), outcome.message.bold());
            if let Some(lead_id) = &outcome.lead_id {
                println!("  Lead: {}", lead_id.cyan());
            }
            println!("  Widget: {}", widget_id.dimmed());
            println!();
        }
    }
}

fn print_config(widget_id: &str, config: &WidgetConfig) {
    println!();
    println!("{}  {}", config.title.bold().cyan(), widget_id.dimmed());
    if let Some(description) = &config.description {
        println!("{}", description.dimmed());
    }
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Field"),
            Cell::new("Label"),
            Cell::new("Input"),
            Cell::new("Required"),
        ]);
    for spec in field_specs(&config.fields) {
        let input = match spec.kind.input_type() {
            Some(kind) => kind.to_string(),
            None => "textarea".to_string(),
        };
        table.add_row(vec![
            Cell::new(&spec.name),
            Cell::new(&spec.label),
            Cell::new(input),
            Cell::new(if spec.required { "yes" } else { "" }),
        ]);
    }
    println!("{table}");
    println!();

    println!("  Submit button:  {}", config.submit_label());
    println!("  Success:        {}", config.success_message);
    println!(
        "  Button:         {} ({})",
        config.button_position,
        config.accent_color()
    );
    if let Some(delay) = config.auto_open_after() {
        println!("  Auto-open:      after {:.1}s", delay.as_secs_f64());
    } else {
        println!("  Auto-open:      {}", "off".dimmed());
    }
    println!();
}
