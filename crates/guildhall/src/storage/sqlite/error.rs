//! Translation of SQLite failures into `RepositoryError`.
//!
//! SQLite names the offending columns in its constraint messages
//! (`UNIQUE constraint failed: users.email`), so a clash is reported back as
//! the field that was already taken.

use guildhall_core::storage::RepositoryError;
use rusqlite::ffi;

/// Column named by a UNIQUE failure. A composite key reports its last
/// column, so the `(group_id, user_id)` pair comes back as `user_id`.
fn clashing_column(message: Option<&str>) -> &'static str {
    let column = message
        .and_then(|m| m.rsplit(", ").next())
        .and_then(|qualified| qualified.rsplit('.').next())
        .unwrap_or_default();

    match column {
        "id" => "id",
        "username" => "username",
        "email" => "email",
        "user_id" => "user_id",
        _ => "unknown",
    }
}

fn map_rusqlite_error(
    err: &rusqlite::Error,
    entity_type: &'static str,
    id: Option<&str>,
) -> RepositoryError {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                RepositoryError::AlreadyExists {
                    entity_type,
                    field: clashing_column(message.as_deref()),
                }
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => RepositoryError::InvalidData(format!(
                "{entity_type} references a user or group that does not exist"
            )),
            _ => RepositoryError::QueryFailed(err.to_string()),
        },
        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type,
            id: id.unwrap_or("unknown").to_string(),
        },
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

fn map_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: Option<&str>,
) -> RepositoryError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(inner) => map_rusqlite_error(inner, entity_type, id),
        tokio_rusqlite::Error::ConnectionClosed => {
            RepositoryError::ConnectionFailed("connection closed".to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a failed `Connection::call` to a `RepositoryError`.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
) -> RepositoryError {
    map_error(err, entity_type, None)
}

/// Like [`map_tokio_rusqlite_error`], reporting `id` when the row is missing.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id = id.into();
    map_error(err, entity_type, Some(id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::super::schema;
    use super::*;

    /// A connection with the real schema and one user and one group.
    fn seeded() -> rusqlite::Connection {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(schema::ENABLE_FOREIGN_KEYS).unwrap();
        conn.execute_batch(schema::CREATE_TABLES).unwrap();
        conn.execute(
            schema::INSERT_USER,
            ["u1", "alice", "alice@example.com", "hash", "", "t", "t"],
        )
        .unwrap();
        conn.execute(
            schema::INSERT_GROUP,
            ["g1", "Dungeon", "d", "s", "l", "c", "u1", "t", "t"],
        )
        .unwrap();
        conn
    }

    fn failed_insert(
        conn: &rusqlite::Connection,
        sql: &str,
        params: &[&str],
    ) -> tokio_rusqlite::Error {
        let err = conn
            .execute(sql, rusqlite::params_from_iter(params))
            .unwrap_err();
        tokio_rusqlite::Error::Rusqlite(err)
    }

    #[test]
    fn test_duplicate_username_reports_username() {
        let conn = seeded();
        let err = failed_insert(
            &conn,
            schema::INSERT_USER,
            &["u2", "alice", "other@example.com", "hash", "", "t", "t"],
        );

        assert_eq!(
            map_tokio_rusqlite_error(err, "User"),
            RepositoryError::AlreadyExists {
                entity_type: "User",
                field: "username",
            }
        );
    }

    #[test]
    fn test_duplicate_email_reports_email() {
        let conn = seeded();
        let err = failed_insert(
            &conn,
            schema::INSERT_USER,
            &["u2", "bob", "alice@example.com", "hash", "", "t", "t"],
        );

        assert_eq!(
            map_tokio_rusqlite_error(err, "User"),
            RepositoryError::AlreadyExists {
                entity_type: "User",
                field: "email",
            }
        );
    }

    #[test]
    fn test_duplicate_request_pair_reports_user_id() {
        let conn = seeded();
        let request = ["r1", "g1", "u1", "PENDING", "t", "t"];
        conn.execute(
            schema::INSERT_GROUP_REQUEST,
            rusqlite::params_from_iter(request),
        )
        .unwrap();

        let err = failed_insert(
            &conn,
            schema::INSERT_GROUP_REQUEST,
            &["r2", "g1", "u1", "PENDING", "t", "t"],
        );

        assert_eq!(
            map_tokio_rusqlite_error(err, "GroupRequest"),
            RepositoryError::AlreadyExists {
                entity_type: "GroupRequest",
                field: "user_id",
            }
        );
    }

    #[test]
    fn test_missing_reference_maps_to_invalid_data() {
        let conn = seeded();
        let err = failed_insert(
            &conn,
            schema::INSERT_GROUP_REQUEST,
            &["r1", "g1", "nobody", "PENDING", "t", "t"],
        );

        assert!(matches!(
            map_tokio_rusqlite_error(err, "GroupRequest"),
            RepositoryError::InvalidData(_)
        ));
    }

    #[test]
    fn test_no_rows_keeps_id() {
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(
            map_tokio_rusqlite_error_with_id(err, "Group", "abc-123"),
            RepositoryError::NotFound {
                entity_type: "Group",
                id: "abc-123".to_string(),
            }
        );
    }

    #[test]
    fn test_closed_connection_maps_to_connection_failed() {
        let result = map_tokio_rusqlite_error(tokio_rusqlite::Error::ConnectionClosed, "User");

        assert!(matches!(result, RepositoryError::ConnectionFailed(_)));
    }

    #[test]
    fn test_clashing_column_without_message() {
        assert_eq!(clashing_column(None), "unknown");
    }
}
