use std::env;

/// Runtime settings for the service and its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub ledger_relay_url: Option<String>,
    pub ledger_cluster: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-3.5-turbo".to_string(),
            ledger_relay_url: None,
            ledger_cluster: "devnet".to_string(),
        }
    }
}

impl Config {
    /// Loads config from env vars, reading a `.env` file first when one exists:
    /// - `HOST` (default: `0.0.0.0`), `PORT` (default: `8000`)
    /// - `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`
    /// - `LEDGER_RELAY_URL`, `LEDGER_CLUSTER` (default: `devnet`)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            ledger_relay_url: get("LEDGER_RELAY_URL"),
            ledger_cluster: get("LEDGER_CLUSTER").unwrap_or(defaults.ledger_cluster),
        }
    }
}
