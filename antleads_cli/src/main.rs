use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose > 0 {
        "antleads_cli=debug,antleads_core=debug"
    } else {
        "antleads_cli=info,antleads_core=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Config { widget_id } => config::run(&cli, widget_id).await,
        Commands::Preview {
            widget_id,
            bind_to,
            out,
        } => preview::run(&cli, widget_id, bind_to.as_deref(), out.as_deref()).await,
        Commands::Embed {
            widget_id,
            script_src,
            bind_to,
        } => embed::run(&cli, widget_id, script_src, bind_to.as_deref()),
        Commands::Submit {
            widget_id,
            name,
            email,
            phone,
            company,
            message,
            estimated_value,
            page_url,
            referrer,
            fields,
        } => {
            let args = submit::SubmitArgs {
                widget_id,
                name,
                email: email.as_deref(),
                phone: phone.as_deref(),
                company: company.as_deref(),
                message: message.as_deref(),
                estimated_value: estimated_value.as_deref(),
                page_url,
                referrer: referrer.as_deref(),
                fields,
            };
            submit::run(&cli, args).await
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
