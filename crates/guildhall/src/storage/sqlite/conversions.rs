//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use guildhall_core::group::{Group, GroupSummary};
use guildhall_core::group_request::{GroupRequest, GroupRequestDetails, GroupRequestStatus};
use guildhall_core::user::{User, UserSummary};

// ============================================================================
// User conversions
// ============================================================================

/// Convert a SQLite row to a User.
///
/// Expected columns: id, username, email, password_hash, avatar, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let username: String = row.get(1)?;
    let email: String = row.get(2)?;
    let password_hash: String = row.get(3)?;
    let avatar: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(User {
        id: parse_uuid(&id)?,
        username,
        email,
        password_hash,
        avatar,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

// ============================================================================
// Group conversions
// ============================================================================

/// Convert a SQLite row to a Group.
///
/// Expected columns: id, name, description, schedule, location, chronic, master_id, created_at, updated_at
pub fn row_to_group(row: &Row) -> rusqlite::Result<Group> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let description: String = row.get(2)?;
    let schedule: String = row.get(3)?;
    let location: String = row.get(4)?;
    let chronic: String = row.get(5)?;
    let master_id: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(Group {
        id: parse_uuid(&id)?,
        name,
        description,
        schedule,
        location,
        chronic,
        master_id: parse_uuid(&master_id)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Build the LIKE pattern for a free-text group search.
///
/// The text is lowercased and `%`, `_` and `\` are escaped so they match
/// literally.
pub fn text_to_like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ============================================================================
// Group request conversions
// ============================================================================

/// Convert a SQLite row to a GroupRequest.
///
/// Expected columns: id, group_id, user_id, status, created_at, updated_at
pub fn row_to_group_request(row: &Row) -> rusqlite::Result<GroupRequest> {
    let id: String = row.get(0)?;
    let group_id: String = row.get(1)?;
    let user_id: String = row.get(2)?;
    let status: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(GroupRequest {
        id: parse_uuid(&id)?,
        group_id: parse_uuid(&group_id)?,
        user_id: parse_uuid(&user_id)?,
        status: parse_status(&status)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a joined row to GroupRequestDetails.
///
/// Expected columns: id, group_id, user_id, status, group name, master_id, username
pub fn row_to_group_request_details(row: &Row) -> rusqlite::Result<GroupRequestDetails> {
    let id: String = row.get(0)?;
    let group_id: String = row.get(1)?;
    let user_id: String = row.get(2)?;
    let status: String = row.get(3)?;
    let group_name: String = row.get(4)?;
    let master_id: String = row.get(5)?;
    let username: String = row.get(6)?;

    Ok(GroupRequestDetails {
        id: parse_uuid(&id)?,
        group_id: parse_uuid(&group_id)?,
        user_id: parse_uuid(&user_id)?,
        status: parse_status(&status)?,
        group: GroupSummary {
            name: group_name,
            master_id: parse_uuid(&master_id)?,
        },
        user: UserSummary { username },
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn conversion_error(e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(conversion_error)
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_error)
}

/// Parse a GroupRequestStatus from its storage form.
fn parse_status(s: &str) -> rusqlite::Result<GroupRequestStatus> {
    GroupRequestStatus::parse(s).ok_or_else(|| {
        conversion_error(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Unknown group request status: {s}"),
        ))
    })
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Always nanosecond precision with a `Z` suffix, so stored values have a
/// fixed width and sort chronologically as text.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime_is_fixed_width() {
        let whole = DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let fractional = DateTime::parse_from_rfc3339("2024-06-15T10:30:00.5Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(format_datetime(&whole), "2024-06-15T10:30:00.000000000Z");
        assert_eq!(
            format_datetime(&whole).len(),
            format_datetime(&fractional).len()
        );
        assert!(format_datetime(&whole) < format_datetime(&fractional));
    }

    #[test]
    fn test_format_datetime_round_trips() {
        let now = Utc::now();
        assert_eq!(parse_datetime(&format_datetime(&now)).unwrap(), now);
    }

    #[test]
    fn test_text_to_like_pattern() {
        assert_eq!(text_to_like_pattern("Dragon"), "%dragon%");
        assert_eq!(text_to_like_pattern("100%"), "%100\\%%");
        assert_eq!(text_to_like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("PENDING").unwrap(), GroupRequestStatus::Pending);
        assert_eq!(
            parse_status("ACCEPTED").unwrap(),
            GroupRequestStatus::Accepted
        );
        assert!(parse_status("REJECTED").is_err());
    }

    #[test]
    fn test_parse_uuid_valid() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let result = parse_uuid(uuid_str);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().to_string(), uuid_str);
    }

    #[test]
    fn test_parse_uuid_invalid() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("not-a-datetime").is_err());
    }
}
