use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use leadline_core::AppError;
use tracing_subscriber::EnvFilter;

/// Destination for audit entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditSinkConfig {
    Tracing,
    Postgres { database_url: String },
}

impl AuditSinkConfig {
    pub fn parse(kind: &str, database_url: Option<String>) -> Result<Self, AppError> {
        match kind {
            "tracing" => Ok(Self::Tracing),
            "postgres" => {
                let database_url = database_url
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation(
                            "DATABASE_URL is required when AUDIT_SINK=postgres".to_owned(),
                        )
                    })?;
                Ok(Self::Postgres { database_url })
            }
            other => Err(AppError::Validation(format!(
                "AUDIT_SINK must be either 'tracing' or 'postgres', got '{other}'"
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tracing => "tracing",
            Self::Postgres { .. } => "postgres",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub audit_sink: AuditSinkConfig,
    pub trust_forwarded_for: bool,
    pub cors_allowed_origin: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let audit_sink = AuditSinkConfig::parse(
            env::var("AUDIT_SINK")
                .unwrap_or_else(|_| "tracing".to_owned())
                .as_str(),
            env::var("DATABASE_URL").ok(),
        )?;

        let trust_forwarded_for = env::var("TRUST_FORWARDED_FOR")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            api_host,
            api_port,
            audit_sink,
            trust_forwarded_for,
            cors_allowed_origin,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use leadline_core::AppError;

    use super::AuditSinkConfig;

    #[test]
    fn tracing_sink_needs_no_database() {
        assert_eq!(
            AuditSinkConfig::parse("tracing", None).ok(),
            Some(AuditSinkConfig::Tracing)
        );
    }

    #[test]
    fn postgres_sink_requires_database_url() {
        assert!(matches!(
            AuditSinkConfig::parse("postgres", Some("  ".to_owned())),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            AuditSinkConfig::parse("postgres", Some("postgres://localhost/leadline".to_owned()))
                .ok(),
            Some(AuditSinkConfig::Postgres {
                database_url: "postgres://localhost/leadline".to_owned(),
            })
        );
    }

    #[test]
    fn memory_sink_is_not_a_runtime_option() {
        assert!(matches!(
            AuditSinkConfig::parse("memory", None),
            Err(AppError::Validation(_))
        ));
    }
}
