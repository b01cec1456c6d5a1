use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};

use super::{ApiToken, LinkToken};

/// Length of every generated token.
pub const TOKEN_LENGTH: usize = 64;

/// Generate a cryptographically random token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Check if an API token has expired.
pub fn is_token_expired(token: &ApiToken, now: DateTime<Utc>) -> bool {
    token.expires_at <= now
}

/// Calculate token expiry from creation time and TTL.
pub fn calculate_expiry(created_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    created_at
        .checked_add_signed(ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Check if a link token is older than `ttl`.
pub fn is_link_token_expired(token: &LinkToken, now: DateTime<Utc>, ttl: Duration) -> bool {
    calculate_expiry(token.created_at, ttl) <= now
}

/// Builds the link mailed to the user: `base?token=<token>`.
///
/// The token is appended to any query the base URL already carries.
pub fn reset_link(base: &str, token: &str) -> String {
    match url::Url::parse(base) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair("token", token);
            parsed.to_string()
        }
        Err(_) => format!("{base}?token={token}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn token_expiring_at(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> ApiToken {
        ApiToken {
            token: generate_token(),
            user_id: Uuid::new_v4(),
            name: "Opaque Access Token".to_string(),
            created_at: now - Duration::hours(2),
            expires_at,
        }
    }

    #[test]
    fn generate_token_produces_64_char_alphanumeric() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generate_token_is_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn is_token_expired_returns_false_for_future_expiry() {
        let now = Utc::now();
        let token = token_expiring_at(now, now + Duration::hours(1));
        assert!(!is_token_expired(&token, now));
    }

    #[test]
    fn is_token_expired_returns_true_for_past_expiry() {
        let now = Utc::now();
        let token = token_expiring_at(now, now - Duration::hours(1));
        assert!(is_token_expired(&token, now));
    }

    #[test]
    fn is_token_expired_returns_true_at_exact_expiry() {
        let now = Utc::now();
        let token = token_expiring_at(now, now);
        assert!(is_token_expired(&token, now));
    }

    #[test]
    fn calculate_expiry_adds_ttl_to_created_at() {
        let created = Utc::now();
        let ttl = Duration::hours(2);
        assert_eq!(calculate_expiry(created, ttl), created + ttl);
    }

    #[test]
    fn calculate_expiry_saturates() {
        let expiry = calculate_expiry(Utc::now(), Duration::MAX);
        assert_eq!(expiry, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn link_token_expires_after_ttl() {
        let now = Utc::now();
        let fresh = LinkToken {
            token: generate_token(),
            user_id: Uuid::new_v4(),
            created_at: now - Duration::minutes(30),
        };
        let stale = LinkToken {
            created_at: now - Duration::hours(3),
            ..fresh.clone()
        };

        assert!(!is_link_token_expired(&fresh, now, Duration::hours(2)));
        assert!(is_link_token_expired(&stale, now, Duration::hours(2)));
    }

    #[test]
    fn reset_link_appends_token() {
        assert_eq!(
            reset_link("https://app.com/reset", "abc"),
            "https://app.com/reset?token=abc"
        );
        assert_eq!(
            reset_link("https://app.com/reset?lang=pt", "abc"),
            "https://app.com/reset?lang=pt&token=abc"
        );
    }
}
