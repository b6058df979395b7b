use std::env;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::services::payment_status::DEFAULT_GRACE_PERIOD_DAYS;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub environment: String,
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub trusted_hosts: Vec<String>,
    pub rate_limit_enabled: bool,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst_size: u32,
    pub request_timeout_seconds: u64,
    pub timezone: Tz,
    pub default_grace_period_days: u32,
    pub schedule_max_periods: u32,
    pub frequency_fallback_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            app_name: env_or("APP_NAME", "Casaora Schedule API"),
            environment: env_or("ENVIRONMENT", "development"),
            api_prefix: normalize_prefix(&env_or("API_PREFIX", "/v1")),
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse_or("PORT", 8000),
            cors_origins: parse_csv(&env_or("CORS_ORIGINS", "http://localhost:3000")),
            trusted_hosts: parse_csv(&env_or("TRUSTED_HOSTS", "localhost,127.0.0.1")),
            rate_limit_enabled: env_parse_bool_or("RATE_LIMIT_ENABLED", true),
            rate_limit_per_second: env_parse_or("RATE_LIMIT_PER_SECOND", 10),
            rate_limit_burst_size: env_parse_or("RATE_LIMIT_BURST_SIZE", 100),
            request_timeout_seconds: env_parse_or("REQUEST_TIMEOUT_SECONDS", 30),
            timezone: parse_timezone(&env_or("TIMEZONE", "America/Asuncion")),
            default_grace_period_days: env_parse_or(
                "DEFAULT_GRACE_PERIOD_DAYS",
                DEFAULT_GRACE_PERIOD_DAYS,
            ),
            schedule_max_periods: env_parse_or::<u32>("SCHEDULE_MAX_PERIODS", 120).max(1),
            frequency_fallback_enabled: env_parse_bool_or("FREQUENCY_FALLBACK_ENABLED", false),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.trim().eq_ignore_ascii_case("production")
    }

    /// Calendar date "now" in the configured timezone, used whenever a
    /// request omits its reference date.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub fn trusts_any_host(&self) -> bool {
        self.trusted_hosts.iter().any(|host| host == "*")
    }
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Casaora Schedule API".to_string(),
            environment: "test".to_string(),
            api_prefix: "/v1".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec!["http://localhost:3000".to_string()],
            trusted_hosts: vec!["*".to_string()],
            rate_limit_enabled: false,
            rate_limit_per_second: 10,
            rate_limit_burst_size: 100,
            request_timeout_seconds: 30,
            timezone: Tz::UTC,
            default_grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            schedule_max_periods: 120,
            frequency_fallback_enabled: false,
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    env_opt(key)
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_parse_bool_or(key: &str, default: bool) -> bool {
    parse_bool(env_opt(key).as_deref()).unwrap_or(default)
}

fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("1" | "true" | "yes" | "on") => Some(true),
        Some("0" | "false" | "no" | "off") => Some(false),
        _ => None,
    }
}

fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_timezone(raw: &str) -> Tz {
    match raw.trim().parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            tracing::warn!(timezone = %raw, "Unknown TIMEZONE, falling back to UTC");
            Tz::UTC
        }
    }
}

fn normalize_prefix(raw: &str) -> String {
    let mut prefix = raw.trim().to_string();
    if prefix.is_empty() {
        return "/v1".to_string();
    }
    if !prefix.starts_with('/') {
        prefix.insert(0, '/');
    }
    while prefix.ends_with('/') && prefix.len() > 1 {
        prefix.pop();
    }
    prefix
}
