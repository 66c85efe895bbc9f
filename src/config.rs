use config::ConfigError;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub cache_ttl_secs: u64,
    pub refresh_interval_secs: u64,
    pub fetch_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Reject currency codes other than ARS/BRL instead of defaulting to ARS
    pub strict_currency: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                var("DB_USER").unwrap_or_else(|| "postgres".to_string()),
                var("DB_PASSWORD").unwrap_or_else(|| "postgres".to_string()),
                var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                parse_or(&var, "DB_PORT", 5432u16)?,
                var("DB_NAME").unwrap_or_else(|| "currency_db".to_string()),
            ),
        };

        let bind_address = match var("BIND_ADDRESS") {
            Some(address) => address,
            None => format!("0.0.0.0:{}", parse_or(&var, "PORT", 3000u16)?),
        };

        Ok(Self {
            database_url,
            bind_address,
            cache_ttl_secs: parse_or(&var, "CACHE_TTL_SECS", 60)?,
            refresh_interval_secs: parse_or(&var, "REFRESH_INTERVAL_SECS", 30)?,
            fetch_timeout_secs: parse_or(&var, "FETCH_TIMEOUT_SECS", 10)?,
            request_timeout_secs: parse_or(&var, "REQUEST_TIMEOUT_SECS", 60)?,
            strict_currency: parse_or(&var, "STRICT_CURRENCY", false)?,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("{} has an invalid value: {:?}", key, raw))),
    }
}
