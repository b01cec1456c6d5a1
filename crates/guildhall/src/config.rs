use std::{env, time::Duration};

/// Default password reset link lifetime.
const DEFAULT_LINK_TOKEN_TTL_HOURS: u64 = 2;

/// Longest accepted reset link lifetime (thirty days). Larger values are
/// clamped so expiry arithmetic cannot overflow.
const MAX_LINK_TOKEN_TTL_HOURS: u64 = 24 * 30;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "guildhall.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
    pub sqlite_path: String,
    /// Password reset link lifetime in hours (default: 2)
    pub link_token_ttl_hours: u64,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "guildhall.db")
    /// - `LINK_TOKEN_TTL_HOURS` - Password reset link lifetime (default: 2, at most 720)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "guildhall.db".to_string()),
            link_token_ttl_hours: parse_link_token_ttl_hours(
                env::var("LINK_TOKEN_TTL_HOURS").ok().as_deref(),
            ),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the password reset link lifetime as a chrono Duration.
    pub fn link_token_ttl(&self) -> chrono::Duration {
        let hours = self.link_token_ttl_hours.min(MAX_LINK_TOKEN_TTL_HOURS);
        chrono::Duration::hours(i64::try_from(hours).unwrap_or(2))
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Unparseable values fall back to the default, oversized ones are clamped.
fn parse_link_token_ttl_hours(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map_or(DEFAULT_LINK_TOKEN_TTL_HOURS, |hours| {
            hours.min(MAX_LINK_TOKEN_TTL_HOURS)
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sqlite_path: "guildhall.db".to_string(),
            link_token_ttl_hours: DEFAULT_LINK_TOKEN_TTL_HOURS,
            request_timeout_seconds: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_conversions() {
        let config = Config {
            sqlite_path: "test.db".to_string(),
            link_token_ttl_hours: 3,
            request_timeout_seconds: 30,
        };

        assert_eq!(config.link_token_ttl(), chrono::Duration::hours(3));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_link_token_ttl_parsing() {
        assert_eq!(parse_link_token_ttl_hours(Some("6")), 6);
        assert_eq!(parse_link_token_ttl_hours(Some("-1")), 2);
        assert_eq!(parse_link_token_ttl_hours(None), 2);
        assert_eq!(
            parse_link_token_ttl_hours(Some("18446744073709551615")),
            MAX_LINK_TOKEN_TTL_HOURS
        );
    }

    #[test]
    fn test_huge_link_token_ttl_is_clamped() {
        let config = Config {
            link_token_ttl_hours: u64::MAX,
            ..Config::default()
        };

        let ttl = config.link_token_ttl();
        assert_eq!(ttl, chrono::Duration::hours(MAX_LINK_TOKEN_TTL_HOURS as i64));
        assert!(chrono::Utc::now() - ttl < chrono::Utc::now());
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.sqlite_path, "guildhall.db");
        assert_eq!(config.link_token_ttl_hours, 2);
        assert_eq!(config.request_timeout_seconds, 10);
    }
}
