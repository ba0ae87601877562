//! Storage backend trait definitions

use crate::error::{StorageError, StorageResult};
use amity_core::limits::{validate_name, validate_username};
use amity_core::{Friendship, GraphBuilder, NewUser, SocialGraph, Snapshot, User, UserId};
use async_trait::async_trait;

/// Checks an import can run without consulting the store
pub(crate) fn validate_import(snapshot: &Snapshot) -> StorageResult<()> {
    snapshot.validate()?;
    for user in &snapshot.users {
        validate_username(&user.username)?;
        validate_name(&user.name)?;
    }
    Ok(())
}

/// An imported user may only take a username already owned by its own id
pub(crate) fn check_username_owner(user: &User, owner: Option<UserId>) -> StorageResult<()> {
    match owner {
        Some(id) if id != user.id => Err(StorageError::DuplicateUser(user.username.clone())),
        _ => Ok(()),
    }
}

/// Trait for user and friendship stores
///
/// Backends own persistence; the graph engine only ever sees the
/// [`Snapshot`] produced by [`load_snapshot`](Self::load_snapshot).
#[async_trait]
pub trait SocialStore: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn initialize(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a user, assigning the next free id
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;

    /// Store a user under its existing id (used by import)
    async fn insert_user(&self, user: &User) -> StorageResult<()>;

    /// Get a user by id
    async fn get_user(&self, id: UserId) -> StorageResult<Option<User>>;

    /// Get a user by username
    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// All users ordered by id
    async fn list_users(&self) -> StorageResult<Vec<User>>;

    /// Delete a user and every friendship involving them
    async fn delete_user(&self, id: UserId) -> StorageResult<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Friendship Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record a friendship; returns `false` if it already existed
    async fn add_friendship(&self, a: UserId, b: UserId) -> StorageResult<bool>;

    /// Remove a friendship; returns `false` if there was none
    async fn remove_friendship(&self, a: UserId, b: UserId) -> StorageResult<bool>;

    /// All friendships in the order they were recorded
    async fn list_friendships(&self) -> StorageResult<Vec<Friendship>>;

    /// Users who are friends with `id`
    async fn friends_of(&self, id: UserId) -> StorageResult<Vec<User>> {
        let mut friends = Vec::new();
        for friendship in self.list_friendships().await? {
            if let Some(other) = friendship.other(id) {
                if let Some(user) = self.get_user(other).await? {
                    friends.push(user);
                }
            }
        }
        Ok(friends)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy out the full user and friendship sets
    async fn load_snapshot(&self) -> StorageResult<Snapshot> {
        let users = self.list_users().await?;
        let friendships = self.list_friendships().await?;
        Ok(Snapshot::new()
            .with_users(users)
            .with_friendships(friendships))
    }

    /// Build a fresh graph from the current contents
    async fn build_graph(&self) -> StorageResult<SocialGraph> {
        let snapshot = self.load_snapshot().await?;
        Ok(GraphBuilder::from_snapshot(&snapshot).build())
    }

    /// Write every user and friendship of a snapshot, keeping user ids
    ///
    /// Existing users with the same id are replaced. Every user is checked
    /// against the store before the first write. Returns the number of
    /// friendships that were new.
    ///
    /// Backends override this to apply the whole snapshot atomically.
    async fn import_snapshot(&self, snapshot: &Snapshot) -> StorageResult<usize> {
        validate_import(snapshot)?;

        for user in &snapshot.users {
            let owner = self.get_user_by_username(&user.username).await?;
            check_username_owner(user, owner.map(|u| u.id))?;
        }

        for user in &snapshot.users {
            self.insert_user(user).await?;
        }

        let mut added = 0;
        for friendship in &snapshot.friendships {
            if self.add_friendship(friendship.a(), friendship.b()).await? {
                added += 1;
            }
        }

        tracing::info!(
            "Imported {} users and {} new friendships",
            snapshot.users.len(),
            added
        );
        Ok(added)
    }
}
