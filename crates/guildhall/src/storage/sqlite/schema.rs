//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Timestamps are stored as fixed-width RFC 3339 strings
//! so that ordering by the text column orders by time.

/// Enables foreign key enforcement. SQLite keeps this per connection.
pub const ENABLE_FOREIGN_KEYS: &str = "PRAGMA foreign_keys = ON;";

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    avatar TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Groups table
CREATE TABLE IF NOT EXISTS groups (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    schedule TEXT NOT NULL,
    location TEXT NOT NULL,
    chronic TEXT NOT NULL,
    master_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (master_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Group players (pivot) table
CREATE TABLE IF NOT EXISTS groups_users (
    group_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (group_id, user_id),
    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Group join requests table
CREATE TABLE IF NOT EXISTS group_requests (
    id TEXT PRIMARY KEY,
    group_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (group_id, user_id),
    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_groups_master_id ON groups(master_id);
CREATE INDEX IF NOT EXISTS idx_groups_created_at ON groups(created_at);
CREATE INDEX IF NOT EXISTS idx_groups_users_user_id ON groups_users(user_id);
CREATE INDEX IF NOT EXISTS idx_group_requests_status ON group_requests(status);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, username, email, password_hash, avatar, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, username, email, password_hash, avatar, created_at, updated_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, username, email, password_hash, avatar, created_at, updated_at
FROM users
WHERE email = ?1
"#;

pub const SELECT_USER_BY_USERNAME: &str = r#"
SELECT id, username, email, password_hash, avatar, created_at, updated_at
FROM users
WHERE username = ?1
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET username = ?2, email = ?3, password_hash = ?4, avatar = ?5, updated_at = ?6
WHERE id = ?1
"#;

// Group queries
pub const INSERT_GROUP: &str = r#"
INSERT INTO groups (id, name, description, schedule, location, chronic, master_id, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

pub const SELECT_GROUP_BY_ID: &str = r#"
SELECT id, name, description, schedule, location, chronic, master_id, created_at, updated_at
FROM groups
WHERE id = ?1
"#;

/// Name of the scalar function registered on every connection that
/// lowercases text with full Unicode case folding.
pub const UNICODE_LOWER: &str = "UNICODE_LOWER";

/// Shared predicate for group listings.
///
/// `?1` is an optional player ID, `?2` an optional lowercase LIKE pattern.
/// The built-in `LOWER` only folds ASCII, hence [`UNICODE_LOWER`].
macro_rules! group_filter {
    () => {
        r#"
WHERE (?1 IS NULL OR EXISTS (
        SELECT 1 FROM groups_users gu WHERE gu.group_id = g.id AND gu.user_id = ?1
    ))
  AND (?2 IS NULL
        OR UNICODE_LOWER(g.name) LIKE ?2 ESCAPE '\'
        OR UNICODE_LOWER(g.description) LIKE ?2 ESCAPE '\')
"#
    };
}

pub const COUNT_GROUPS: &str = concat!("SELECT COUNT(*) FROM groups g", group_filter!());

pub const SELECT_GROUPS_PAGE: &str = concat!(
    "SELECT g.id, g.name, g.description, g.schedule, g.location, g.chronic, g.master_id, g.created_at, g.updated_at FROM groups g",
    group_filter!(),
    "ORDER BY g.created_at ASC, g.rowid ASC LIMIT ?3 OFFSET ?4"
);

pub const UPDATE_GROUP: &str = r#"
UPDATE groups
SET name = ?2, description = ?3, schedule = ?4, location = ?5, chronic = ?6, master_id = ?7, updated_at = ?8
WHERE id = ?1
"#;

pub const DELETE_GROUP: &str = r#"
DELETE FROM groups
WHERE id = ?1
"#;

// Player queries
pub const INSERT_PLAYER: &str = r#"
INSERT OR IGNORE INTO groups_users (group_id, user_id, created_at)
VALUES (?1, ?2, ?3)
"#;

pub const DELETE_PLAYER: &str = r#"
DELETE FROM groups_users
WHERE group_id = ?1 AND user_id = ?2
"#;

pub const SELECT_IS_PLAYER: &str = r#"
SELECT EXISTS (
    SELECT 1 FROM groups_users WHERE group_id = ?1 AND user_id = ?2
)
"#;

pub const SELECT_PLAYERS_FOR_GROUP: &str = r#"
SELECT u.id, u.username, u.email, u.password_hash, u.avatar, u.created_at, u.updated_at
FROM users u
INNER JOIN groups_users gu ON u.id = gu.user_id
WHERE gu.group_id = ?1
ORDER BY gu.rowid ASC
"#;

// Group request queries
pub const INSERT_GROUP_REQUEST: &str = r#"
INSERT INTO group_requests (id, group_id, user_id, status, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_GROUP_REQUEST_BY_ID: &str = r#"
SELECT id, group_id, user_id, status, created_at, updated_at
FROM group_requests
WHERE id = ?1
"#;

pub const SELECT_GROUP_REQUEST_BY_GROUP_AND_USER: &str = r#"
SELECT id, group_id, user_id, status, created_at, updated_at
FROM group_requests
WHERE group_id = ?1 AND user_id = ?2
"#;

pub const SELECT_PENDING_REQUESTS_FOR_MASTER: &str = r#"
SELECT r.id, r.group_id, r.user_id, r.status, g.name, g.master_id, u.username
FROM group_requests r
INNER JOIN groups g ON g.id = r.group_id
INNER JOIN users u ON u.id = r.user_id
WHERE g.master_id = ?1 AND r.status = 'PENDING'
ORDER BY r.created_at ASC, r.rowid ASC
"#;

pub const UPDATE_GROUP_REQUEST: &str = r#"
UPDATE group_requests
SET status = ?2, updated_at = ?3
WHERE id = ?1
"#;

pub const DELETE_GROUP_REQUEST: &str = r#"
DELETE FROM group_requests
WHERE id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS groups"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS groups_users"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS group_requests"));
        assert!(CREATE_TABLES.contains("UNIQUE (group_id, user_id)"));
    }

    #[test]
    fn test_group_listing_queries_share_filter() {
        assert!(COUNT_GROUPS.starts_with("SELECT COUNT(*)"));
        assert!(COUNT_GROUPS.contains("EXISTS"));
        assert!(SELECT_GROUPS_PAGE.contains("EXISTS"));
        assert!(SELECT_GROUPS_PAGE.contains("LIMIT ?3 OFFSET ?4"));
    }

    #[test]
    fn test_queries_contain_expected_keywords() {
        assert!(INSERT_USER.contains("INSERT"));
        assert!(SELECT_USER_BY_USERNAME.contains("username = ?1"));
        assert!(UPDATE_USER.contains("password_hash"));
        assert!(INSERT_PLAYER.contains("OR IGNORE"));
        assert!(SELECT_PENDING_REQUESTS_FOR_MASTER.contains("'PENDING'"));
        assert!(DELETE_GROUP.contains("DELETE"));
        assert!(DELETE_GROUP_REQUEST.contains("DELETE"));
    }
}
