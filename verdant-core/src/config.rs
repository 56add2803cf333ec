use std::env;
use std::net::SocketAddr;

use anyhow::Context as _;

use verdant_llm::LlmConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Application configuration, resolved from the environment exactly once at
/// startup and handed to collaborators by parameter.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub auto_run_migrations: bool,
    pub llm: Option<LlmConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a valid socket address")?;

        Ok(Self {
            database_url,
            bind_addr,
            auto_run_migrations: env_bool("AUTO_RUN_MIGRATIONS", true),
            llm: LlmConfig::from_env_optional(),
        })
    }
}

pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}
