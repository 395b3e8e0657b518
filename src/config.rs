//! Application configuration loaded from environment variables.

use axum::http::HeaderValue;
use serde::Deserialize;

use crate::error::GatewayError;

/// Naver Shopping search endpoint.
pub const NAVER_SHOP_URL: &str = "https://openapi.naver.com/v1/search/shop.json";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Single origin allowed by CORS.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    // === Document Store ===
    /// MongoDB connection string.
    #[serde(default)]
    pub db_uri: Option<String>,

    // === Naver Shopping Credentials ===
    /// Value of the `X-Naver-Client-Id` header.
    #[serde(default)]
    pub client_id: String,

    /// Value of the `X-Naver-Client-Secret` header.
    #[serde(default)]
    pub client_secret: String,

    /// Search endpoint, overridable for local testing.
    #[serde(default = "default_naver_shop_url")]
    pub naver_shop_url: String,

    // === Observability ===
    /// Expose Prometheus metrics on `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_naver_shop_url() -> String {
    NAVER_SHOP_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors_origin: default_cors_origin(),
            db_uri: None,
            client_id: String::new(),
            client_secret: String::new(),
            naver_shop_url: default_naver_shop_url(),
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Load configuration and reject invalid values.
    pub fn load_validated() -> crate::Result<Self> {
        let config = Self::load()?;
        config.validate().map_err(GatewayError::InvalidConfig)?;
        Ok(config)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.client_id.trim().is_empty() {
            return Err("CLIENT_ID is required".to_string());
        }

        if self.client_secret.trim().is_empty() {
            return Err("CLIENT_SECRET is required".to_string());
        }

        if let Err(e) = url::Url::parse(&self.naver_shop_url) {
            return Err(format!("NAVER_SHOP_URL is not a valid URL: {}", e));
        }

        if HeaderValue::from_str(&self.cors_origin).is_err() {
            return Err(format!(
                "CORS_ORIGIN is not a valid header value: {}",
                self.cors_origin
            ));
        }

        Ok(())
    }

    /// Check if a document store URI is configured.
    pub fn has_db(&self) -> bool {
        self.db_uri
            .as_deref()
            .map(|uri| !uri.trim().is_empty())
            .unwrap_or(false)
    }
}
