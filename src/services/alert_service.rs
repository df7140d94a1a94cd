use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::alerts::{extract_alerts, AlertFilter};
use crate::fetch_error::FetchError;
use crate::fetcher::AlertaClient;
use crate::regions::{ALERTS_PATH, BOILERPLATE_PHRASES, SERRANA_FILTER_MUNICIPALITIES};

// Query parameters of /api/alertas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertQuery {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub filtro_serrana: bool,
    pub termo: Option<String>,
}

/// Parse a query flag, accepting the usual spellings of a boolean
/// (`true`/`false`, `1`/`0`, `on`/`off`, `yes`/`no`, `t`/`f`, `y`/`n`).
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "on" | "yes" | "t" | "y" => Some(true),
        "false" | "0" | "off" | "no" | "f" | "n" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid boolean value '{raw}'")))
}

impl From<AlertQuery> for AlertFilter {
    fn from(query: AlertQuery) -> Self {
        AlertFilter {
            serrana: query.filtro_serrana,
            termo: query.termo,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertListResponse {
    pub fonte: String,
    pub total_encontrado: usize,
    pub filtros_aplicados: AlertFilter,
    pub dados_extraidos: Vec<String>,
}

#[derive(Clone)]
pub struct AlertService {
    client: AlertaClient,
}

impl AlertService {
    pub fn new(client: AlertaClient) -> Self {
        Self { client }
    }

    /// Fetch the alert listing and return the blocks that survive `filter`.
    #[instrument(skip(self))]
    pub async fn list_alerts(&self, filter: AlertFilter) -> Result<AlertListResponse, FetchError> {
        let url = self.client.page_url(ALERTS_PATH);
        let html = self.client.fetch_page(&url).await?;

        let alerts = extract_alerts(
            &html,
            &filter,
            BOILERPLATE_PHRASES,
            SERRANA_FILTER_MUNICIPALITIES,
        );
        info!("Extracted {} alerts from {}", alerts.len(), url);

        Ok(AlertListResponse {
            fonte: url,
            total_encontrado: alerts.len(),
            filtros_aplicados: filter,
            dados_extraidos: alerts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_into_filter() {
        let query = AlertQuery {
            filtro_serrana: true,
            termo: Some("chuva".to_string()),
        };

        let filter: AlertFilter = query.into();
        assert!(filter.serrana);
        assert_eq!(filter.termo.as_deref(), Some("chuva"));
    }

    #[test]
    fn test_response_serializes_filters() {
        let response = AlertListResponse {
            fonte: "https://alerta.es.gov.br/alertas".to_string(),
            total_encontrado: 0,
            filtros_aplicados: AlertFilter::default(),
            dados_extraidos: vec![],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["filtros_aplicados"]["serrana"], false);
        assert!(json["filtros_aplicados"]["termo"].is_null());
    }

    #[test]
    fn test_parse_flag_spellings() {
        for raw in ["true", "1", "on", "YES", " y "] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["false", "0", "off", "No", "f"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("talvez"), None);
        assert_eq!(parse_flag(""), None);
    }
}
