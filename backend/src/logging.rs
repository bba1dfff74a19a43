use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use crate::config::ConfigError;

/// Log output settings, parsed as part of [`crate::config::AppConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `service` label on every shipped line.
    pub service_name: String,
    pub environment: String,
    /// `EnvFilter` directive, e.g. `info` or `storefront_backend=debug`.
    pub filter: String,
    /// Set only when Loki shipping is switched on.
    pub loki_url: Option<Url>,
}

impl LoggingConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let loki_enabled = match value("LOKI_ENABLED") {
            Some(raw) => raw.trim().parse::<bool>().map_err(|e| ConfigError::Invalid {
                key: "LOKI_ENABLED",
                reason: e.to_string(),
            })?,
            None => false,
        };
        let loki_url = if loki_enabled {
            let raw = value("LOKI_URL").ok_or(ConfigError::Missing("LOKI_URL"))?;
            Some(Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
                key: "LOKI_URL",
                reason: e.to_string(),
            })?)
        } else {
            None
        };

        Ok(Self {
            service_name: value("SERVICE_NAME").unwrap_or_else(|| "storefront".to_string()),
            environment: value("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            filter: value("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            loki_url,
        })
    }
}

/// Installs the global subscriber. Call once, before anything logs.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "loki")]
    {
        if let Some(loki_url) = &config.loki_url {
            return init_with_loki(config, loki_url.clone());
        }
    }

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::info!(
        "📊 Console logging for {} ({})",
        config.service_name,
        config.environment
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn init_with_loki(config: &LoggingConfig, loki_url: Url) -> Result<(), Box<dyn std::error::Error>> {
    let (loki_layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(loki_url.clone())?;

    // Ships buffered lines in the background
    tokio::spawn(task);

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(tracing_subscriber::fmt::layer())
        .with(loki_layer)
        .init();

    tracing::info!("✅ Loki logging for {} at {}", config.service_name, loki_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(pairs: &[(&str, &str)]) -> Result<LoggingConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LoggingConfig::from_lookup(&|key: &str| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.service_name, "storefront");
        assert_eq!(config.environment, "development");
        assert_eq!(config.filter, "info");
        assert!(config.loki_url.is_none());
    }

    #[test]
    fn test_loki_requires_url() {
        assert_eq!(
            parse(&[("LOKI_ENABLED", "true")]).unwrap_err(),
            ConfigError::Missing("LOKI_URL")
        );
        let config = parse(&[("LOKI_ENABLED", "true"), ("LOKI_URL", "http://loki:3100")]).unwrap();
        assert_eq!(config.loki_url.unwrap().host_str(), Some("loki"));
    }

    #[test]
    fn test_loki_url_ignored_when_disabled() {
        let config = parse(&[("LOKI_ENABLED", "false"), ("LOKI_URL", "http://loki:3100")]).unwrap();
        assert!(config.loki_url.is_none());
    }

    #[test]
    fn test_bad_flag_rejected() {
        assert!(matches!(
            parse(&[("LOKI_ENABLED", "yes please")]),
            Err(ConfigError::Invalid { key: "LOKI_ENABLED", .. })
        ));
    }
}
