use std::time::Duration;

/// Default lifetime of a login token.
const DEFAULT_TOKEN_TTL_HOURS: u64 = 2;

/// Longest accepted login token lifetime (one year). Larger values are
/// clamped so expiry arithmetic cannot overflow.
const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;

/// Auth configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_HOURS * 60 * 60),
        }
    }
}

impl AuthConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TOKEN_TTL_HOURS`: Login token TTL in hours (default: 2)
    pub fn from_env() -> Self {
        Self::from_ttl_hours(std::env::var("TOKEN_TTL_HOURS").ok().as_deref())
    }

    /// Parses a TTL in hours. Unparseable or zero values fall back to the
    /// default and values above [`MAX_TOKEN_TTL_HOURS`] are clamped.
    fn from_ttl_hours(value: Option<&str>) -> Self {
        let hours = value
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|hours| *hours > 0)
            .map_or(DEFAULT_TOKEN_TTL_HOURS, |hours| hours.min(MAX_TOKEN_TTL_HOURS));

        Self {
            token_ttl: Duration::from_secs(hours * 60 * 60),
        }
    }

    /// Token TTL as a chrono duration, for expiry arithmetic.
    pub fn token_ttl(&self) -> chrono::Duration {
        let max = Duration::from_secs(MAX_TOKEN_TTL_HOURS * 60 * 60);
        chrono::Duration::from_std(self.token_ttl.min(max))
            .unwrap_or_else(|_| chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_two_hours() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl, Duration::from_secs(7200));
        assert_eq!(config.token_ttl(), chrono::Duration::hours(2));
    }

    #[test]
    fn ttl_hours_parsing() {
        assert_eq!(
            AuthConfig::from_ttl_hours(Some("5")).token_ttl(),
            chrono::Duration::hours(5)
        );
        assert_eq!(
            AuthConfig::from_ttl_hours(Some("0")).token_ttl(),
            chrono::Duration::hours(2)
        );
        assert_eq!(
            AuthConfig::from_ttl_hours(Some("soon")).token_ttl(),
            chrono::Duration::hours(2)
        );
        assert_eq!(
            AuthConfig::from_ttl_hours(None).token_ttl(),
            chrono::Duration::hours(2)
        );
    }

    #[test]
    fn huge_ttl_is_clamped() {
        let config = AuthConfig::from_ttl_hours(Some("18446744073709551615"));

        assert_eq!(
            config.token_ttl(),
            chrono::Duration::hours(MAX_TOKEN_TTL_HOURS as i64)
        );

        let expiry = chrono::Utc::now() + config.token_ttl();
        assert!(expiry > chrono::Utc::now());
    }

    #[test]
    fn oversized_duration_is_clamped_on_conversion() {
        let config = AuthConfig {
            token_ttl: Duration::from_secs(u64::MAX),
        };

        assert_eq!(
            config.token_ttl(),
            chrono::Duration::hours(MAX_TOKEN_TTL_HOURS as i64)
        );
    }
}
