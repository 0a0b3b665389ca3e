use std::env;
use std::str::FromStr;

use chrono::Duration;

/// Placeholder secret for local development; a warning is logged when used.
pub const DEV_JWT_SECRET: &str = "skillshare-dev-secret-change-me";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Google OAuth client credentials. Absent when either id or secret is unset.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// TCP port for the HTTP server (default 8080). Env var: `SERVER_PORT`.
    pub server_port: u16,
    /// PostgreSQL URL; `DATABASE_URL` or assembled from `DB_*` parts.
    pub database_url: String,
    /// HMAC secret for access and refresh tokens. Env var: `JWT_SECRET_KEY`.
    pub jwt_secret: String,
    /// Access token lifetime; `JWT_ACCESS_TOKEN_DURATION` minutes (default 15).
    pub access_token_ttl: Duration,
    /// Refresh token lifetime; `JWT_REFRESH_TOKEN_DURATION` hours (default 168).
    pub refresh_token_ttl: Duration,
    pub google: Option<GoogleConfig>,
    /// Web origin allowed by CORS and linked from calendar exports.
    pub frontend_url: String,
    /// Where the OAuth callback finally redirects, with tokens in the fragment.
    pub frontend_oauth_callback_url: String,
    pub reminder_interval_secs: u64,
    /// How far ahead the reminder sweep looks; `REMINDER_WINDOW_HOURS` (default 24).
    pub reminder_window: Duration,
    pub run_migrations: bool,
}

/// Environment lookup; empty values count as unset.
struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_owned())
    }

    fn parse_or<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
            None => Ok(default),
        }
    }

    /// A positive span in `unit`s that fits in a `Duration`.
    fn duration_or(
        &self,
        name: &'static str,
        default: i64,
        unit: fn(i64) -> Option<Duration>,
    ) -> Result<Duration, ConfigError> {
        let amount: i64 = self.parse_or(name, default)?;
        match unit(amount) {
            Some(span) if amount > 0 => Ok(span),
            _ => Err(ConfigError::Invalid { name, value: amount.to_string() }),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let database_url = vars.get("DATABASE_URL").unwrap_or_else(|| {
            format!(
                "postgres://{}:{}@{}:{}/{}?sslmode={}",
                vars.or("DB_USER", "postgres"),
                vars.or("DB_PASSWORD", "password"),
                vars.or("DB_HOST", "localhost"),
                vars.or("DB_PORT", "5432"),
                vars.or("DB_NAME", "skill-sharing-web-platform"),
                vars.or("DB_SSLMODE", "disable"),
            )
        });

        let google = match (vars.get("GOOGLE_CLIENT_ID"), vars.get("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(GoogleConfig {
                client_id,
                client_secret,
                redirect_url: vars.or(
                    "GOOGLE_REDIRECT_URL",
                    "http://localhost:8080/auth/google/callback",
                ),
            }),
            _ => None,
        };

        let frontend_url = vars.or("FRONTEND_URL", "http://localhost:3000");
        let frontend_oauth_callback_url = vars.or(
            "FRONTEND_OAUTH_CALLBACK_URL",
            &format!("{}/auth/callback", frontend_url.trim_end_matches('/')),
        );

        Ok(Self {
            server_port: vars.parse_or("SERVER_PORT", 8080)?,
            database_url,
            jwt_secret: vars.or("JWT_SECRET_KEY", DEV_JWT_SECRET),
            access_token_ttl: vars.duration_or(
                "JWT_ACCESS_TOKEN_DURATION",
                15,
                Duration::try_minutes,
            )?,
            refresh_token_ttl: vars.duration_or(
                "JWT_REFRESH_TOKEN_DURATION",
                168,
                Duration::try_hours,
            )?,
            google,
            frontend_url,
            frontend_oauth_callback_url,
            reminder_interval_secs: vars.parse_or("REMINDER_INTERVAL_SECS", 3600)?,
            reminder_window: vars.duration_or("REMINDER_WINDOW_HOURS", 24, Duration::try_hours)?,
            run_migrations: vars.parse_or("RUN_MIGRATIONS", true)?,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
