use std::time::Duration;

use tracing::{debug, instrument};

use crate::config::Config;
use crate::fetch_error::FetchError;

/// HTTP client for the alert site: fixed user agent and per-request timeouts,
/// no retries.
#[derive(Clone)]
pub struct AlertaClient {
    client: reqwest::Client,
    base_url: String,
    pdf_timeout: Duration,
}

impl AlertaClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pdf_timeout: Duration::from_secs(config.pdf_timeout_secs),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a site path such as `/alertas`.
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch an HTML page, failing on transport errors and non-2xx statuses.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        debug!("Sending HTTP request for page");
        let response = self.client.get(url).send().await?;
        debug!("Received HTTP response with status: {}", response.status());

        let html = response.error_for_status()?.text().await?;
        debug!("Retrieved HTML content, size: {} bytes", html.len());

        Ok(html)
    }

    /// Download a PDF fully into memory.
    #[instrument(skip(self))]
    pub async fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("Downloading PDF");
        let response = self
            .client
            .get(url)
            .timeout(self.pdf_timeout)
            .send()
            .await?;
        debug!("Received HTTP response with status: {}", response.status());

        let bytes = response.error_for_status()?.bytes().await?;
        debug!("Downloaded PDF ({} bytes)", bytes.len());

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_joins_base_and_path() {
        let client = AlertaClient::new(&Config::with_base_url("https://alerta.es.gov.br/")).unwrap();
        assert_eq!(client.base_url(), "https://alerta.es.gov.br");
        assert_eq!(
            client.page_url("/boletim-meteorologico"),
            "https://alerta.es.gov.br/boletim-meteorologico"
        );
    }

    #[test]
    fn test_invalid_user_agent_is_client_error() {
        let mut config = Config::with_base_url("https://alerta.es.gov.br");
        config.user_agent = "bad\nagent".to_string();

        let result = AlertaClient::new(&config);
        assert!(matches!(result, Err(FetchError::Client(_))));
    }
}
