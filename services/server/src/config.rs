use serde::Deserialize;

use scoreqr_core::config::Config;

/// Verification server configuration loaded from environment variables.
///
/// The secret key and salt feed the sync-protocol API key derivation; there
/// is no built-in default for either — an operator must supply them.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// Shared secret for the sync API key. Env var: `SECRET_KEY`.
    pub secret_key: String,
    /// Salt string hashed under the secret. Env var: `API_KEY_SALT`.
    pub api_key_salt: String,
    /// TCP port to listen on (default 3500). Env var: `SERVER_PORT`.
    #[serde(default = "default_port")]
    pub server_port: u16,
}

fn default_port() -> u16 {
    3500
}

impl Config for ServerConfig {}
