use std::fmt::Display;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Server configuration, read once at startup.
///
/// Everything has a local-development default except the JWT secret, which
/// [`JwtConfig::from_env`] insists on.
///
/// | Env var                | Default                 |
/// |------------------------|-------------------------|
/// | `HOST`                 | `0.0.0.0`               |
/// | `PORT`                 | `3000`                  |
/// | `CORS_ORIGINS`         | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated list in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse an env var, falling back to `default` when unset. An unparseable
/// value is a configuration mistake and panics at startup.
fn env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value: {e}")),
        Err(_) => default,
    }
}
