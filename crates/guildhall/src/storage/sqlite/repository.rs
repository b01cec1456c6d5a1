//! SQLite repository implementation.
//!
//! Implements the repository traits from `guildhall_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::functions::FunctionFlags;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use guildhall_core::group::{Group, GroupFilter};
use guildhall_core::group_request::{GroupRequest, GroupRequestDetails};
use guildhall_core::storage::{
    GroupRepository, GroupRequestRepository, MembershipRepository, Paginated, Pagination,
    RepositoryError, Result, UserRepository,
};
use guildhall_core::user::User;

use super::conversions::{
    format_datetime, row_to_group, row_to_group_request, row_to_group_request_details,
    row_to_user, text_to_like_pattern,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Runs a single-row lookup, mapping "no rows" to `None`.
fn query_optional<T>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: impl rusqlite::Params,
    f: impl FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> std::result::Result<Option<T>, tokio_rusqlite::Error> {
    let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
    match stmt.query_row(params, f) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(wrap_err(e)),
    }
}

/// Fails with `QueryReturnedNoRows` when a write touched nothing.
fn expect_rows(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// Registers the SQL functions the queries in [`schema`] rely on.
fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        schema::UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            register_functions(conn).map_err(wrap_err)?;
            conn.execute_batch(schema::ENABLE_FOREIGN_KEYS)
                .map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| query_optional(conn, schema::SELECT_USER_BY_ID, [&id_str], row_to_user))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_USER_BY_EMAIL, [&email], row_to_user)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();

        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_USER_BY_USERNAME, [&username], row_to_user)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let username = user.username.clone();
        let email = user.email.clone();
        let password_hash = user.password_hash.clone();
        let avatar = user.avatar.clone();
        let created_at = format_datetime(&user.created_at);
        let updated_at = format_datetime(&user.updated_at);
        let user_email = user.email.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![
                        id,
                        username,
                        email,
                        password_hash,
                        avatar,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_email))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let username = user.username.clone();
        let email = user.email.clone();
        let password_hash = user.password_hash.clone();
        let avatar = user.avatar.clone();
        let updated_at = format_datetime(&user.updated_at);
        let user_id = user.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_USER,
                        rusqlite::params![id, username, email, password_hash, avatar, updated_at],
                    )
                    .map_err(wrap_err)?;
                expect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id))
    }
}

// ============================================================================
// GroupRepository implementation
// ============================================================================

#[async_trait]
impl GroupRepository for SqliteRepository {
    async fn get_group(&self, id: Uuid) -> Result<Option<Group>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                query_optional(conn, schema::SELECT_GROUP_BY_ID, [&id_str], row_to_group)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", id.to_string()))
    }

    async fn list_groups(
        &self,
        filter: &GroupFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Group>> {
        let user = filter.user.map(|id| id.to_string());
        let pattern = filter.text.as_deref().map(text_to_like_pattern);
        let limit = i64::from(pagination.limit());
        let offset = i64::try_from(pagination.offset())
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

        let (groups, total) = self
            .conn
            .call(move |conn| {
                let total: i64 = conn
                    .query_row(
                        schema::COUNT_GROUPS,
                        rusqlite::params![user, pattern],
                        |row| row.get(0),
                    )
                    .map_err(wrap_err)?;

                let mut stmt = conn.prepare(schema::SELECT_GROUPS_PAGE).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![user, pattern, limit, offset], row_to_group)
                    .map_err(wrap_err)?;

                let mut groups = Vec::new();
                for row_result in rows {
                    groups.push(row_result.map_err(wrap_err)?);
                }
                Ok((groups, total))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Group"))?;

        let total = u64::try_from(total).map_err(|e| RepositoryError::InvalidData(e.to_string()))?;
        Ok(Paginated::new(groups, total, pagination))
    }

    async fn create_group(&self, group: &Group) -> Result<()> {
        let id = group.id.to_string();
        let name = group.name.clone();
        let description = group.description.clone();
        let schedule = group.schedule.clone();
        let location = group.location.clone();
        let chronic = group.chronic.clone();
        let master_id = group.master_id.to_string();
        let created_at = format_datetime(&group.created_at);
        let updated_at = format_datetime(&group.updated_at);
        let group_id = group.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_GROUP,
                    rusqlite::params![
                        id,
                        name,
                        description,
                        schedule,
                        location,
                        chronic,
                        master_id,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", group_id))
    }

    async fn update_group(&self, group: &Group) -> Result<()> {
        let id = group.id.to_string();
        let name = group.name.clone();
        let description = group.description.clone();
        let schedule = group.schedule.clone();
        let location = group.location.clone();
        let chronic = group.chronic.clone();
        let master_id = group.master_id.to_string();
        let updated_at = format_datetime(&group.updated_at);
        let group_id = group.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_GROUP,
                        rusqlite::params![
                            id,
                            name,
                            description,
                            schedule,
                            location,
                            chronic,
                            master_id,
                            updated_at
                        ],
                    )
                    .map_err(wrap_err)?;
                expect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", group_id))
    }

    async fn delete_group(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        // Players and join requests go with the group through ON DELETE CASCADE
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_GROUP, [&id_str])
                    .map_err(wrap_err)?;
                expect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Group", id.to_string()))
    }
}

// ============================================================================
// MembershipRepository implementation
// ============================================================================

#[async_trait]
impl MembershipRepository for SqliteRepository {
    async fn add_player(&self, group_id: Uuid, user_id: Uuid) -> Result<()> {
        let group_id_str = group_id.to_string();
        let user_id_str = user_id.to_string();
        let created_at = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PLAYER,
                    rusqlite::params![group_id_str, user_id_str, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Player"))
    }

    async fn remove_player(&self, group_id: Uuid, user_id: Uuid) -> Result<()> {
        let group_id_str = group_id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_PLAYER, [&group_id_str, &user_id_str])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Player"))
    }

    async fn is_player(&self, group_id: Uuid, user_id: Uuid) -> Result<bool> {
        let group_id_str = group_id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(
                    schema::SELECT_IS_PLAYER,
                    [&group_id_str, &user_id_str],
                    |row| row.get(0),
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Player"))
    }

    async fn get_players(&self, group_id: Uuid) -> Result<Vec<User>> {
        let group_id_str = group_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_PLAYERS_FOR_GROUP)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&group_id_str], row_to_user)
                    .map_err(wrap_err)?;

                let mut players = Vec::new();
                for row_result in rows {
                    players.push(row_result.map_err(wrap_err)?);
                }
                Ok(players)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Player"))
    }
}

// ============================================================================
// GroupRequestRepository implementation
// ============================================================================

#[async_trait]
impl GroupRequestRepository for SqliteRepository {
    async fn get_group_request(&self, id: Uuid) -> Result<Option<GroupRequest>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_GROUP_REQUEST_BY_ID,
                    [&id_str],
                    row_to_group_request,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "GroupRequest", id.to_string()))
    }

    async fn find_group_request(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupRequest>> {
        let group_id_str = group_id.to_string();
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                query_optional(
                    conn,
                    schema::SELECT_GROUP_REQUEST_BY_GROUP_AND_USER,
                    [&group_id_str, &user_id_str],
                    row_to_group_request,
                )
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "GroupRequest"))
    }

    async fn list_pending_for_master(&self, master_id: Uuid) -> Result<Vec<GroupRequestDetails>> {
        let master_id_str = master_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_PENDING_REQUESTS_FOR_MASTER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&master_id_str], row_to_group_request_details)
                    .map_err(wrap_err)?;

                let mut requests = Vec::new();
                for row_result in rows {
                    requests.push(row_result.map_err(wrap_err)?);
                }
                Ok(requests)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "GroupRequest"))
    }

    async fn create_group_request(&self, request: &GroupRequest) -> Result<()> {
        let id = request.id.to_string();
        let group_id = request.group_id.to_string();
        let user_id = request.user_id.to_string();
        let status = request.status.as_str();
        let created_at = format_datetime(&request.created_at);
        let updated_at = format_datetime(&request.updated_at);
        let request_id = request.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_GROUP_REQUEST,
                    rusqlite::params![id, group_id, user_id, status, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "GroupRequest", request_id))
    }

    async fn update_group_request(&self, request: &GroupRequest) -> Result<()> {
        let id = request.id.to_string();
        let status = request.status.as_str();
        let updated_at = format_datetime(&request.updated_at);
        let request_id = request.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_GROUP_REQUEST,
                        rusqlite::params![id, status, updated_at],
                    )
                    .map_err(wrap_err)?;
                expect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "GroupRequest", request_id))
    }

    async fn delete_group_request(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_GROUP_REQUEST, [&id_str])
                    .map_err(wrap_err)?;
                expect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "GroupRequest", id.to_string()))
    }
}
