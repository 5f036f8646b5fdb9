pub mod config;
pub mod embed;
pub mod preview;
pub mod submit;

use crate::cli::Cli;
use antleads_core::{ClientSettings, HttpWidgetApi};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Widget '{0}' could not be loaded")]
    WidgetUnavailable(String),

    #[error("{message}")]
    SubmissionFailed {
        message: String,
        #[source]
        source: antleads_core::WidgetError,
    },

    #[error("Core library error: {0}")]
    Core(#[from] antleads_core::WidgetError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Settings file and environment, then the global flags on top.
pub fn client_settings(cli: &Cli) -> Result<ClientSettings> {
    let mut settings = ClientSettings::load()?;
    if let Some(base_url) = &cli.base_url {
        settings = settings.with_base_url(base_url)?;
    }
    if let Some(secs) = cli.timeout {
        settings = settings.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }
    tracing::debug!(base_url = %settings.base_url, timeout = ?settings.timeout, "Resolved client settings");
    Ok(settings)
}

pub fn http_api(cli: &Cli) -> Result<HttpWidgetApi> {
    let settings = client_settings(cli)?;
    Ok(HttpWidgetApi::new(&settings)?)
}

pub fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
