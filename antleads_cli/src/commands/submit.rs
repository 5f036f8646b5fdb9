use crate::cli::Cli;
use crate::commands::{http_api, spinner, CommandError, Result};
use crate::output::{format_output, OutputData};
use antleads_core::{EmbedAttributes, FormValues, StaticPage, WidgetRuntime};
use std::sync::Arc;

pub struct SubmitArgs<'a> {
    pub widget_id: &'a str,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
    pub message: Option<&'a str>,
    pub estimated_value: Option<&'a str>,
    pub page_url: &'a str,
    pub referrer: Option<&'a str>,
    pub fields: &'a [(String, String)],
}

impl SubmitArgs<'_> {
    fn form_values(&self) -> FormValues {
        let mut values = FormValues::new().with("name", self.name);
        let optional = [
            ("email", self.email),
            ("phone", self.phone),
            ("company", self.company),
            ("message", self.message),
            ("estimated_value", self.estimated_value),
        ];
        for (field, value) in optional
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field, v)))
        {
            values.set(field, value);
        }
        for (field, value) in self.fields {
            values.set(field.as_str(), value.as_str());
        }
        values
    }
}

pub async fn run(cli: &Cli, args: SubmitArgs<'_>) -> Result<()> {
    let api = Arc::new(http_api(cli)?);
    let mut page = StaticPage::new(args.page_url);
    if let Some(referrer) = args.referrer {
        page = page.with_referrer(referrer);
    }

    let runtime = WidgetRuntime::new(api, Arc::new(page), EmbedAttributes::new(args.widget_id));

    let progress = spinner(format!("Loading widget {}...", args.widget_id));
    let loaded = runtime.initialize().await;
    progress.finish_and_clear();
    loaded?;
    runtime.open();

    let progress = spinner("Submitting...".to_string());
    let result = runtime.submit(args.form_values()).await;
    progress.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) if err.is_recoverable() => {
            tracing::debug!(error = %err, "Submission failed");
            let message = runtime
                .view()
                .feedback
                .map(|feedback| feedback.message().to_string())
                .unwrap_or_else(|| err.to_string());
            return Err(CommandError::SubmissionFailed { message, source: err });
        }
        Err(err) => return Err(err.into()),
    };

    let output_data = OutputData::Submission {
        widget_id: args.widget_id.to_string(),
        outcome,
    };
    format_output(&output_data, &cli.output)
}
