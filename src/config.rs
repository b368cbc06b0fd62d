//! Runtime configuration read from the environment (and `.env`).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub supabase_url: String,
    /// Held server-side only.
    pub supabase_service_role_key: Option<String>,
    pub delivery_url: Option<String>,
    pub delivery_timeout: Duration,
    pub render_command: String,
    pub allowed_origins: Vec<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_service_role_key",
                &self.supabase_service_role_key.as_ref().map(|_| "<redacted>"),
            )
            .field("delivery_url", &self.delivery_url)
            .field("delivery_timeout", &self.delivery_timeout)
            .field("render_command", &self.render_command)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            supabase_url: String::new(),
            supabase_service_role_key: None,
            delivery_url: None,
            delivery_timeout: Duration::from_secs(60),
            render_command: "wkhtmltoimage".to_string(),
            allowed_origins: DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber { var: "PORT", value })?,
            None => defaults.port,
        };
        let delivery_timeout = match get("MANUDOCS_DELIVERY_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(value.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                var: "MANUDOCS_DELIVERY_TIMEOUT_SECS",
                value,
            })?),
            None => defaults.delivery_timeout,
        };
        let allowed_origins = match get("MANUDOCS_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.allowed_origins,
        };

        Ok(Self {
            bind_addr: get("MANUDOCS_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port,
            data_dir: get("MANUDOCS_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            supabase_url: get("SUPABASE_URL").unwrap_or_default(),
            supabase_service_role_key: get("SUPABASE_SERVICE_ROLE_KEY"),
            delivery_url: get("MANUDOCS_DELIVERY_URL"),
            delivery_timeout,
            render_command: get("MANUDOCS_RENDER_COMMAND").unwrap_or(defaults.render_command),
            allowed_origins,
        })
    }
}
