use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Postgres URL. `None` is fine for commands that never connect.
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Geocoder API key. `None` disables provider lookups; cached entries still resolve.
    pub geocoder_api_key: Option<String>,
    pub geocoder_base_url: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_max_concurrent: usize,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// The API key to hand to the geocode cache; empty when unset.
    #[must_use]
    pub fn geocoder_api_key_or_empty(&self) -> &str {
        self.geocoder_api_key.as_deref().unwrap_or("")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "geocoder_api_key",
                &self.geocoder_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("geocoder_max_concurrent", &self.geocoder_max_concurrent)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
