//! Server Configuration

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Process-level settings read from the environment
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub environment: String,
    pub service_name: String,

    /// CORS origins; `*` allows any
    pub allowed_origins: Vec<String>,

    /// `tracing_subscriber` filter directive
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8001".into(),
            environment: "development".into(),
            service_name: "risk-ai".into(),
            allowed_origins: vec!["*".into()],
            log_filter: "info,tower_http=debug".into(),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| {
            let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
            let port = lookup("PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8001);
            format!("{host}:{port}")
        });

        let allowed_origins = lookup("ALLOWED_HOSTS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.allowed_origins);

        let log_filter = lookup("RUST_LOG")
            .or_else(|| lookup("LOG_LEVEL").map(|level| level.to_lowercase()))
            .unwrap_or(defaults.log_filter);

        Self {
            bind_addr,
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            allowed_origins,
            log_filter,
        }
    }

    pub fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        if self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*") {
            return Ok(base.allow_origin(Any));
        }

        let origins = self
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|e| anyhow::anyhow!("invalid CORS origin {o:?}: {e}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(base.allow_origin(AllowOrigin::list(origins)))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:3000, https://app.example.com ,"),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.bind_addr, "0.0.0.0:8001");
        assert_eq!(config.environment, "development");
        assert_eq!(config.service_name, "risk-ai");
        assert_eq!(config.allowed_origins, vec!["*"]);
        assert_eq!(config.log_filter, "info,tower_http=debug");
    }

    #[test]
    fn test_host_and_port_compose_bind_addr() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", "127.0.0.1"), ("PORT", "9000")]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");

        let bad_port = ServerConfig::from_lookup(lookup(&[("PORT", "not-a-port")]));
        assert_eq!(bad_port.bind_addr, "0.0.0.0:8001");

        let explicit = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "localhost:7000"),
            ("HOST", "127.0.0.1"),
        ]));
        assert_eq!(explicit.bind_addr, "localhost:7000");
    }

    #[test]
    fn test_origins_and_log_filter_from_lookup() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ALLOWED_HOSTS", "http://a.test, http://b.test"),
            ("LOG_LEVEL", "DEBUG"),
            ("ENVIRONMENT", "production"),
        ]));
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.environment, "production");

        let rust_log = ServerConfig::from_lookup(lookup(&[
            ("RUST_LOG", "warn,risk_engine=trace"),
            ("LOG_LEVEL", "DEBUG"),
        ]));
        assert_eq!(rust_log.log_filter, "warn,risk_engine=trace");
    }

    #[test]
    fn test_cors_layer() {
        assert!(ServerConfig::default().cors_layer().is_ok());

        let config = ServerConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            ..Default::default()
        };
        assert!(config.cors_layer().is_ok());

        let bad = ServerConfig {
            allowed_origins: vec!["bad\norigin".into()],
            ..Default::default()
        };
        assert!(bad.cors_layer().is_err());
    }
}
