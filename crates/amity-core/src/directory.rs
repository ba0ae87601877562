//! Lookup from user ids back to display records

use crate::user::{User, UserId, UserSummary};
use std::collections::HashMap;

/// Id-keyed view over a set of user records
///
/// Graph queries only return [`UserId`]s; this turns them back into
/// something presentable without touching storage again.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<UserId, User>,
}

impl UserDirectory {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn summary(&self, id: UserId) -> Option<UserSummary> {
        self.get(id).map(User::summary)
    }

    /// Find a user by username
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    /// Enrich ids in the order given; ids without a record are skipped.
    pub fn resolve(&self, ids: &[UserId]) -> Vec<UserSummary> {
        ids.iter().filter_map(|id| self.summary(*id)).collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl From<&[User]> for UserDirectory {
    fn from(users: &[User]) -> Self {
        Self::new(users.iter().cloned())
    }
}
