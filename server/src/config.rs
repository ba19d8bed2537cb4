use anyhow::{Context, Result};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Flat JSON file on local disk (the default)
    File,
    /// Process-local map, lost on restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Verbose logging toggle
    pub debug: bool,

    /// Location of the long URL -> short URL mapping file
    pub database_path: PathBuf,

    /// Which mapping store to run with
    pub storage_backend: StorageBackend,

    /// Provider endpoint taking `?url=<long url>` and answering with the short URL
    /// as plain text. Must NOT have a trailing slash.
    pub shortener_api_url: String,

    /// Upper bound on a single provider call
    pub shortener_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            debug: false,
            database_path: PathBuf::from("url_database.txt"),
            storage_backend: StorageBackend::File,
            shortener_api_url: "https://tinyurl.com/api-create.php".into(),
            shortener_timeout: Duration::from_secs(2),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy before this is called).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number (1–65535)")?,
            None => defaults.port,
        };

        let storage_backend = match var("STORAGE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("file") => StorageBackend::File,
            Some("memory") => StorageBackend::Memory,
            Some(other) => anyhow::bail!("STORAGE_BACKEND must be 'file' or 'memory', got '{other}'"),
        };

        let shortener_timeout = var("SHORTENER_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.shortener_timeout);

        let shortener_api_url = var("SHORTENER_API_URL")
            .unwrap_or(defaults.shortener_api_url)
            .trim_end_matches('/')
            .to_owned();

        if shortener_api_url.is_empty() {
            anyhow::bail!("SHORTENER_API_URL must not be empty");
        }

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            debug: var("DEBUG").map(|raw| is_truthy(&raw)).unwrap_or(false),
            database_path: var("URL_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            storage_backend,
            shortener_api_url,
            shortener_timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
