use std::env;

use crate::regions::DEFAULT_TARGET_LOCALITIES;

pub const DEFAULT_BASE_URL: &str = "https://alerta.es.gov.br";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub pdf_timeout_secs: u64,
    pub user_agent: String,
    pub target_localities: Vec<String>,
}

/// Read an environment variable, treating "not set" as the given default.
/// A value that is set but not valid unicode is still an error.
fn var_or(name: &str, default: &str) -> Result<String, env::VarError> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e),
    }
}

/// Split a comma-separated locality list, lower-casing each entry.
pub fn parse_localities(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let target_localities = parse_localities(&var_or(
            "TARGET_LOCALITIES",
            &DEFAULT_TARGET_LOCALITIES.join(","),
        )?);

        Ok(Config {
            server_host: var_or("SERVER_HOST", "0.0.0.0")?,
            server_port: var_or("SERVER_PORT", "8080")?.parse().unwrap_or(8080),
            base_url: var_or("ALERTA_BASE_URL", DEFAULT_BASE_URL)?
                .trim_end_matches('/')
                .to_string(),
            request_timeout_secs: var_or("REQUEST_TIMEOUT_SECS", "10")?
                .parse()
                .unwrap_or(10),
            pdf_timeout_secs: var_or("PDF_TIMEOUT_SECS", "15")?.parse().unwrap_or(15),
            user_agent: var_or("USER_AGENT", DEFAULT_USER_AGENT)?,
            target_localities: if target_localities.is_empty() {
                DEFAULT_TARGET_LOCALITIES.iter().map(|s| s.to_string()).collect()
            } else {
                target_localities
            },
        })
    }

    /// Configuration pointing at a different site origin, used by tests and
    /// the CLI tools.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: 10,
            pdf_timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            target_localities: DEFAULT_TARGET_LOCALITIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
