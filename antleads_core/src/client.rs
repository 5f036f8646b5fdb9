use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::payload::{SubmissionPayload, SubmitResponse};
use crate::settings::ClientSettings;
use async_trait::async_trait;

/// The two backend calls the widget makes.
#[async_trait]
pub trait WidgetApi: Send + Sync {
    /// `GET /api/v1/widgets/{id}/config`
    async fn fetch_config(&self, widget_id: &str) -> Result<WidgetConfig, WidgetError>;

    /// `POST /api/v1/widgets/{id}/submit`
    async fn submit(
        &self,
        widget_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmitResponse, WidgetError>;
}

pub struct HttpWidgetApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWidgetApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, WidgetError> {
        let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(WidgetError::HttpRequest)?;

        Ok(Self {
            client,
            base_url: settings.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn config_url(&self, widget_id: &str) -> String {
        format!(
            "{}/api/v1/widgets/{}/config",
            self.base_url,
            urlencoding::encode(widget_id)
        )
    }

    pub fn submit_url(&self, widget_id: &str) -> String {
        format!(
            "{}/api/v1/widgets/{}/submit",
            self.base_url,
            urlencoding::encode(widget_id)
        )
    }
}

#[async_trait]
impl WidgetApi for HttpWidgetApi {
    async fn fetch_config(&self, widget_id: &str) -> Result<WidgetConfig, WidgetError> {
        let url = self.config_url(widget_id);
        tracing::debug!(url = %url, "Fetching widget config");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::ConfigUnavailable {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let config: WidgetConfig = serde_json::from_str(&body)?;
        Ok(config)
    }

    async fn submit(
        &self,
        widget_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmitResponse, WidgetError> {
        let url = self.submit_url(widget_id);
        tracing::debug!(url = %url, "Submitting widget form");

        let response = self.client.post(&url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::SubmissionRejected {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let result: SubmitResponse = serde_json::from_str(&body)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_for(base: &str) -> HttpWidgetApi {
        let settings = ClientSettings::default().with_base_url(base).unwrap();
        HttpWidgetApi::new(&settings).unwrap()
    }

    #[test]
    fn builds_endpoint_urls() {
        let api = api_for("https://crm.example.com/");
        assert_eq!(
            api.config_url("wgt_abc"),
            "https://crm.example.com/api/v1/widgets/wgt_abc/config"
        );
        assert_eq!(
            api.submit_url("wgt_abc"),
            "https://crm.example.com/api/v1/widgets/wgt_abc/submit"
        );
    }

    #[test]
    fn keeps_base_path_and_encodes_id() {
        let api = api_for("https://example.com/crm");
        assert_eq!(
            api.config_url("a/b c"),
            "https://example.com/crm/api/v1/widgets/a%2Fb%20c/config"
        );
    }
}
