// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! The OAuth client secret and the token store secret are read once at
//! startup and kept in memory for the lifetime of the process.

use std::env;
use std::path::PathBuf;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- OAuth application (public) ---
    /// OAuth client ID (the provider's "access key")
    pub access_key: String,
    /// Redirect URI registered for the application
    pub redirect_uri: String,
    /// Space-separated OAuth scopes
    pub access_scope: String,

    // --- Endpoints ---
    /// REST API base URL (`/me`, `/users`, `/photos`)
    pub api_base_url: String,
    /// OAuth base URL (`/oauth/authorize`, `/oauth/token`)
    pub auth_base_url: String,

    // --- Local storage ---
    /// Location of the encrypted token file
    pub token_store_path: PathBuf,

    // --- Secrets ---
    /// OAuth client secret
    pub secret_key: String,
    /// Secret the token store encryption key is derived from
    pub token_store_secret: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            access_key: "test_access_key".to_string(),
            redirect_uri: "urn:ietf:wg:oauth:2.0:oob".to_string(),
            access_scope: "public read_user write_likes".to_string(),
            api_base_url: "https://api.test.local".to_string(),
            auth_base_url: "https://auth.test.local".to_string(),
            token_store_path: PathBuf::from("imagefeed_token.json"),
            secret_key: "test_secret_key".to_string(),
            token_store_secret: "test_token_store_secret".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            access_key: required("IMAGEFEED_ACCESS_KEY")?,
            redirect_uri: env::var("IMAGEFEED_REDIRECT_URI")
                .unwrap_or_else(|_| "urn:ietf:wg:oauth:2.0:oob".to_string()),
            access_scope: env::var("IMAGEFEED_ACCESS_SCOPE")
                .unwrap_or_else(|_| "public read_user write_likes".to_string()),
            api_base_url: env::var("IMAGEFEED_API_BASE_URL")
                .map(|v| trim_base(&v))
                .unwrap_or_else(|_| "https://api.unsplash.com".to_string()),
            auth_base_url: env::var("IMAGEFEED_AUTH_BASE_URL")
                .map(|v| trim_base(&v))
                .unwrap_or_else(|_| "https://unsplash.com".to_string()),
            token_store_path: env::var("IMAGEFEED_TOKEN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("imagefeed_token.json")),

            secret_key: required("IMAGEFEED_SECRET_KEY")?,
            token_store_secret: required("IMAGEFEED_TOKEN_STORE_SECRET")?,
        })
    }

    /// OAuth token exchange endpoint.
    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.auth_base_url)
    }

    /// Browser authorization endpoint.
    pub fn authorize_url(&self) -> String {
        format!("{}/oauth/authorize", self.auth_base_url)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("IMAGEFEED_ACCESS_KEY", "test_id");
        env::set_var("IMAGEFEED_SECRET_KEY", " test_secret ");
        env::set_var("IMAGEFEED_TOKEN_STORE_SECRET", "store_secret");
        env::set_var("IMAGEFEED_API_BASE_URL", "https://api.example.com/");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.access_key, "test_id");
        assert_eq!(config.secret_key, "test_secret");
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.redirect_uri, "urn:ietf:wg:oauth:2.0:oob");
    }

    #[test]
    fn test_derived_endpoints() {
        let config = Config {
            auth_base_url: "https://unsplash.com".to_string(),
            ..Config::default()
        };

        assert_eq!(config.token_url(), "https://unsplash.com/oauth/token");
        assert_eq!(
            config.authorize_url(),
            "https://unsplash.com/oauth/authorize"
        );
    }
}
