use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use reelnet_core::AppError;
use tracing_subscriber::EnvFilter;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub session_idle_minutes: i64,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let database_url = required("DATABASE_URL")?;
        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|connections| *connections > 0)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{value}'"
                    ))
                })?,
            None => 10,
        };
        let bootstrap_token = required("AUTH_BOOTSTRAP_TOKEN")?;
        if bootstrap_token.trim().is_empty() {
            return Err(AppError::Validation(
                "AUTH_BOOTSTRAP_TOKEN must not be empty".to_owned(),
            ));
        }

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LENGTH} characters"
            )));
        }

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");
        let session_idle_minutes = match lookup("SESSION_IDLE_MINUTES") {
            Some(value) => value
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "SESSION_IDLE_MINUTES must be a positive integer, got '{value}'"
                    ))
                })?,
            None => 30,
        };

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            frontend_url,
            bootstrap_token,
            api_host,
            api_port,
            cookie_secure,
            session_idle_minutes,
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
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use reelnet_core::AppError;

    use super::ApiConfig;

    fn lookup_from(
        pairs: &[(&'static str, &'static str)],
    ) -> impl Fn(&str) -> Option<String> + use<> {
        let values: HashMap<&'static str, &'static str> = pairs.iter().copied().collect();
        move |name| values.get(name).map(|value| (*value).to_owned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/reelnet"),
        ("AUTH_BOOTSTRAP_TOKEN", "bootstrap-secret"),
        ("SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
    ];

    #[test]
    fn defaults_apply_when_optional_values_are_missing() {
        let config = ApiConfig::from_lookup(false, lookup_from(&REQUIRED));
        assert!(config.is_ok());

        let config = config.unwrap_or_else(|_| unreachable!());
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.session_idle_minutes, 30);
        assert_eq!(config.database_max_connections, 10);
        assert!(!config.cookie_secure);
        assert_eq!(
            config.socket_address().map(|address| address.to_string()).ok(),
            Some("127.0.0.1:3001".to_owned())
        );
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let config = ApiConfig::from_lookup(
            false,
            lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/reelnet"),
                ("AUTH_BOOTSTRAP_TOKEN", "bootstrap-secret"),
                ("SESSION_SECRET", "too-short"),
            ]),
        );

        assert!(matches!(config, Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_database_url_is_reported_by_name() {
        let config = ApiConfig::from_lookup(true, lookup_from(&REQUIRED[1..]));

        let Err(AppError::Validation(message)) = config else {
            panic!("expected validation error");
        };
        assert!(message.contains("DATABASE_URL"));
    }

    #[test]
    fn pool_size_must_be_positive() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABASE_MAX_CONNECTIONS", "none"));

        let config = ApiConfig::from_lookup(false, lookup_from(&pairs));

        let Err(AppError::Validation(message)) = config else {
            panic!("expected validation error");
        };
        assert!(message.contains("DATABASE_MAX_CONNECTIONS"));
    }

    #[test]
    fn invalid_idle_timeout_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SESSION_IDLE_MINUTES", "0"));

        let config = ApiConfig::from_lookup(false, lookup_from(&pairs));

        assert!(matches!(config, Err(AppError::Validation(_))));
    }
}
