use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Environment variables without which the backing store cannot be reached.
const STORE_ENV_KEYS: [&str; 3] = [
    "SUPABASE_URL",
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_ANON_KEY",
];

const DEFAULT_TABLE: &str = "afiliados_personal";
const DEFAULT_MAX_PAGE_SIZE: u64 = 10_000;

/// Connection settings for the backing PostgREST store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Key sent as the `Authorization: Bearer` credential.
    pub service_role_key: String,
    /// Key sent as the `apikey` header.
    pub anon_key: String,
    /// Table exposed through the list endpoint.
    pub table: String,
    /// Timeout for list/detail calls.
    pub request_timeout: Duration,
    /// Timeout for the lightweight readiness probe.
    pub probe_timeout: Duration,
    /// Retries on transient 429/5xx responses before giving up.
    pub max_retries: u32,
}

/// Process-wide configuration, resolved once at startup and injected
/// read-only into the request handlers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_page_size: u64,
    /// Store variables absent from the environment; non-empty means the
    /// service runs degraded.
    pub missing_store_vars: Vec<String>,
    pub store: Option<StoreConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_origins: vec!["http://localhost:5173".to_string()],
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            missing_store_vars: STORE_ENV_KEYS.iter().map(ToString::to_string).collect(),
            store: None,
        }
    }
}

impl AppConfig {
    /// Read the configuration from the environment.
    ///
    /// Missing store variables do not fail startup: the store stays
    /// unconfigured and the affected endpoints degrade instead, so the
    /// deployment defect is visible through `/readyz` rather than a crash
    /// loop.
    #[must_use]
    pub fn from_env() -> Self {
        let missing: Vec<String> = STORE_ENV_KEYS
            .iter()
            .filter(|key| env_var(key).is_none())
            .map(ToString::to_string)
            .collect();

        let store = missing.is_empty().then(|| StoreConfig {
            base_url: env_var("SUPABASE_URL").unwrap_or_default(),
            service_role_key: env_var("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_default(),
            anon_key: env_var("SUPABASE_ANON_KEY").unwrap_or_default(),
            table: env_var("SUPABASE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            request_timeout: Duration::from_secs(env_parse("STORE_TIMEOUT_SECS", 30)),
            probe_timeout: Duration::from_secs(env_parse("STORE_PROBE_TIMEOUT_SECS", 5)),
            max_retries: env_parse("STORE_MAX_RETRIES", 2),
        });

        Self {
            port: env_parse("PORT", 5000),
            cors_origins: env_var("CORS_ORIGINS")
                .unwrap_or_else(|| "http://localhost:5173".to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            max_page_size: env_parse("MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE).max(1),
            missing_store_vars: missing,
            store,
        }
    }
}

/// Non-empty environment variable, trimmed.
fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env_var(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
