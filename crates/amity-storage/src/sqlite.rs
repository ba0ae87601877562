//! SQLite storage backend

use crate::error::{StorageError, StorageResult};
use crate::migration::Migratable;
use crate::traits::{check_username_owner, validate_import, SocialStore};
use amity_core::limits::{validate_name, validate_username};
use amity_core::{Friendship, NewUser, Snapshot, User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const USER_COLUMNS: &str = "id, username, name, email, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(User {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        created_at,
    })
}

fn find_by_username(conn: &Connection, username: &str) -> StorageResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn upsert_user(conn: &Connection, user: &User) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO users (id, username, name, email, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            username = excluded.username,
            name = excluded.name,
            email = excluded.email,
            created_at = excluded.created_at",
        params![
            user.id.0,
            user.username,
            user.name,
            user.email,
            user.created_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

fn insert_friendship(conn: &Connection, friendship: Friendship) -> StorageResult<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO friendships (user1_id, user2_id) VALUES (?1, ?2)",
        params![friendship.a().0, friendship.b().0],
    )?;
    Ok(inserted > 0)
}

fn user_exists(conn: &Connection, id: UserId) -> StorageResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE id = ?1", params![id.0], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open or create a SQLite database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite database (for testing)
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.migrate_to_latest()?;

        Ok(storage)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }
}

impl Migratable for SqliteStorage {
    fn get_schema_version(&self) -> StorageResult<u32> {
        let conn = self.lock()?;
        let version: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    fn set_schema_version(&self, version: u32) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(&format!("PRAGMA user_version = {version};"))?;
        Ok(())
    }

    fn run_migration(&self, version: u32) -> StorageResult<()> {
        let conn = self.lock()?;

        match version {
            1 => conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    email TEXT,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS friendships (
                    user1_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    user2_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    PRIMARY KEY (user1_id, user2_id),
                    CHECK (user1_id < user2_id)
                );

                CREATE INDEX IF NOT EXISTS idx_friendships_user2 ON friendships(user2_id);
                "#,
            )?,
            other => {
                return Err(StorageError::Migration(format!(
                    "no migration defined for schema version {}",
                    other
                )))
            }
        }

        Ok(())
    }
}

#[async_trait]
impl SocialStore for SqliteStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        let conn = self.lock()?;
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        validate_username(&user.username)?;
        validate_name(&user.name)?;

        let conn = self.lock()?;
        if find_by_username(&conn, &user.username)?.is_some() {
            return Err(StorageError::DuplicateUser(user.username));
        }

        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO users (username, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.username, user.name, user.email, created_at.to_rfc3339()],
        )?;
        let id = UserId(conn.last_insert_rowid());

        tracing::info!("Created user {} (@{})", id, user.username);
        Ok(User {
            id,
            username: user.username,
            name: user.name,
            email: user.email,
            created_at,
        })
    }

    async fn insert_user(&self, user: &User) -> StorageResult<()> {
        validate_username(&user.username)?;
        validate_name(&user.name)?;

        let conn = self.lock()?;
        upsert_user(&conn, user)
    }

    async fn get_user(&self, id: UserId) -> StorageResult<Option<User>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id.0],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let conn = self.lock()?;
        find_by_username(&conn, username)
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    async fn delete_user(&self, id: UserId) -> StorageResult<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![id.0])?;
        if deleted == 0 {
            return Err(StorageError::UserNotFound(id.to_string()));
        }

        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    async fn add_friendship(&self, a: UserId, b: UserId) -> StorageResult<bool> {
        if a == b {
            return Err(StorageError::SelfFriendship(a));
        }

        let conn = self.lock()?;
        for id in [a, b] {
            if !user_exists(&conn, id)? {
                return Err(StorageError::UserNotFound(id.to_string()));
            }
        }

        let friendship = Friendship::new(a, b);
        let inserted = insert_friendship(&conn, friendship)?;
        if inserted {
            tracing::info!("Added friendship {}", friendship);
        }
        Ok(inserted)
    }

    async fn remove_friendship(&self, a: UserId, b: UserId) -> StorageResult<bool> {
        let friendship = Friendship::new(a, b);
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM friendships WHERE user1_id = ?1 AND user2_id = ?2",
            params![friendship.a().0, friendship.b().0],
        )?;
        Ok(removed > 0)
    }

    async fn list_friendships(&self) -> StorageResult<Vec<Friendship>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT user1_id, user2_id FROM friendships ORDER BY rowid")?;
        let friendships = stmt
            .query_map([], |row| {
                Ok(Friendship::new(UserId(row.get(0)?), UserId(row.get(1)?)))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(friendships)
    }

    async fn friends_of(&self, id: UserId) -> StorageResult<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.name, u.email, u.created_at
             FROM friendships f
             JOIN users u ON u.id = CASE WHEN f.user1_id = ?1 THEN f.user2_id ELSE f.user1_id END
             WHERE f.user1_id = ?1 OR f.user2_id = ?1
             ORDER BY f.rowid",
        )?;
        let friends = stmt
            .query_map(params![id.0], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(friends)
    }

    async fn import_snapshot(&self, snapshot: &Snapshot) -> StorageResult<usize> {
        validate_import(snapshot)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for user in &snapshot.users {
            let owner = find_by_username(&tx, &user.username)?;
            check_username_owner(user, owner.map(|u| u.id))?;
        }

        for user in &snapshot.users {
            upsert_user(&tx, user)?;
        }
        let mut added = 0;
        for friendship in &snapshot.friendships {
            if insert_friendship(&tx, *friendship)? {
                added += 1;
            }
        }
        tx.commit()?;

        tracing::info!(
            "Imported {} users and {} new friendships",
            snapshot.users.len(),
            added
        );
        Ok(added)
    }
}
