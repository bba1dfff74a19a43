use std::fmt;

use thiserror::Error;
use url::Url;

use crate::logging::LoggingConfig;

const MIN_SESSION_SECRET_LEN: usize = 16;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    /// Capability key required on every admin-panel request.
    pub access_key: String,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
    pub secure_cookie: bool,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

#[derive(Clone)]
pub struct MediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("folder", &self.folder)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    pub url: Url,
    pub cron: String,
}

/// Process-wide configuration, built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub admin: AdminConfig,
    pub session: SessionConfig,
    pub media: MediaConfig,
    pub max_upload_bytes: usize,
    pub keepalive: Option<KeepAliveConfig>,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "SESSION_SECRET",
                reason: format!("must be at least {} bytes", MIN_SESSION_SECRET_LEN),
            });
        }

        let ttl_hours: i64 = parse_or(&lookup, "SESSION_TTL_HOURS", 12)?;
        if ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                reason: "must be positive".to_string(),
            });
        }

        let max_upload_mb: usize = parse_or(&lookup, "MAX_UPLOAD_MB", 20)?;

        let keepalive = match lookup("KEEPALIVE_URL").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(KeepAliveConfig {
                url: Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                    key: "KEEPALIVE_URL",
                    reason: e.to_string(),
                })?,
                cron: lookup("KEEPALIVE_CRON").unwrap_or_else(|| "0 */10 * * * *".to_string()),
            }),
            None => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            port: parse_or(&lookup, "PORT", 3000)?,
            admin: AdminConfig {
                username: required("ADMIN_USERNAME")?,
                password: required("ADMIN_PASSWORD")?,
                access_key: required("ADMIN_ACCESS_KEY")?,
            },
            session: SessionConfig {
                secret: session_secret,
                ttl_hours,
                secure_cookie: parse_or(&lookup, "SESSION_COOKIE_SECURE", false)?,
            },
            media: MediaConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
                folder: lookup("MEDIA_FOLDER").unwrap_or_else(|| "accounts".to_string()),
            },
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            keepalive,
            logging: LoggingConfig::from_lookup(&lookup)?,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
