//! In-memory storage backend for testing

use crate::error::{StorageError, StorageResult};
use crate::traits::{check_username_owner, validate_import, SocialStore};
use amity_core::limits::{validate_name, validate_username};
use amity_core::{Friendship, NewUser, Snapshot, User, UserId};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(format!("Lock error: {}", e))
}

/// In-memory storage backend
///
/// Useful for testing and temporary storage. Whenever both locks are
/// needed, `users` is taken before `friendships`.
pub struct MemoryStorage {
    users: RwLock<BTreeMap<UserId, User>>,
    friendships: RwLock<Vec<Friendship>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            friendships: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialStore for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(true)
    }

    // User operations

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        validate_username(&user.username)?;
        validate_name(&user.name)?;

        let mut users = self.users.write().map_err(lock_error)?;
        if users.values().any(|u| u.username == user.username) {
            return Err(StorageError::DuplicateUser(user.username));
        }

        let id = UserId(users.keys().next_back().map_or(1, |last| last.0 + 1));
        let created = User {
            id,
            username: user.username,
            name: user.name,
            email: user.email,
            created_at: Utc::now(),
        };
        users.insert(id, created.clone());

        tracing::info!("Created user {} (@{})", id, created.username);
        Ok(created)
    }

    async fn insert_user(&self, user: &User) -> StorageResult<()> {
        validate_username(&user.username)?;
        validate_name(&user.name)?;

        let mut users = self.users.write().map_err(lock_error)?;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> StorageResult<Option<User>> {
        let users = self.users.read().map_err(lock_error)?;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let users = self.users.read().map_err(lock_error)?;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let users = self.users.read().map_err(lock_error)?;
        Ok(users.values().cloned().collect())
    }

    async fn delete_user(&self, id: UserId) -> StorageResult<()> {
        let mut users = self.users.write().map_err(lock_error)?;
        let mut friendships = self.friendships.write().map_err(lock_error)?;
        if users.remove(&id).is_none() {
            return Err(StorageError::UserNotFound(id.to_string()));
        }
        friendships.retain(|f| !f.involves(id));

        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    // Friendship operations

    async fn add_friendship(&self, a: UserId, b: UserId) -> StorageResult<bool> {
        if a == b {
            return Err(StorageError::SelfFriendship(a));
        }
        let users = self.users.read().map_err(lock_error)?;
        for id in [a, b] {
            if !users.contains_key(&id) {
                return Err(StorageError::UserNotFound(id.to_string()));
            }
        }

        let friendship = Friendship::new(a, b);
        let mut friendships = self.friendships.write().map_err(lock_error)?;
        if friendships.contains(&friendship) {
            return Ok(false);
        }
        friendships.push(friendship);

        tracing::info!("Added friendship {}", friendship);
        Ok(true)
    }

    async fn remove_friendship(&self, a: UserId, b: UserId) -> StorageResult<bool> {
        let friendship = Friendship::new(a, b);
        let mut friendships = self.friendships.write().map_err(lock_error)?;
        let before = friendships.len();
        friendships.retain(|f| *f != friendship);
        Ok(friendships.len() != before)
    }

    async fn list_friendships(&self) -> StorageResult<Vec<Friendship>> {
        let friendships = self.friendships.read().map_err(lock_error)?;
        Ok(friendships.clone())
    }

    async fn import_snapshot(&self, snapshot: &Snapshot) -> StorageResult<usize> {
        validate_import(snapshot)?;

        let mut users = self.users.write().map_err(lock_error)?;
        let mut friendships = self.friendships.write().map_err(lock_error)?;
        for user in &snapshot.users {
            let owner = users
                .values()
                .find(|u| u.username == user.username)
                .map(|u| u.id);
            check_username_owner(user, owner)?;
        }

        for user in &snapshot.users {
            users.insert(user.id, user.clone());
        }
        let mut added = 0;
        for friendship in &snapshot.friendships {
            if !friendships.contains(friendship) {
                friendships.push(*friendship);
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
