//! Friendship (edge) types and graph snapshots

use crate::error::{Error, Result};
use crate::user::{User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Current snapshot document version
pub const SNAPSHOT_VERSION: u32 = 1;

/// An undirected friendship between two users
///
/// Endpoints are normalised so that `a <= b`; `(x, y)` and `(y, x)`
/// compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(UserId, UserId)", into = "(UserId, UserId)")]
pub struct Friendship {
    a: UserId,
    b: UserId,
}

impl Friendship {
    pub fn new(x: UserId, y: UserId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// Lower endpoint
    pub fn a(&self) -> UserId {
        self.a
    }

    /// Higher endpoint
    pub fn b(&self) -> UserId {
        self.b
    }

    pub fn involves(&self, id: UserId) -> bool {
        self.a == id || self.b == id
    }

    /// The endpoint opposite `id`, if `id` is part of this friendship
    pub fn other(&self, id: UserId) -> Option<UserId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }
}

impl From<(UserId, UserId)> for Friendship {
    fn from((x, y): (UserId, UserId)) -> Self {
        Self::new(x, y)
    }
}

impl From<Friendship> for (UserId, UserId) {
    fn from(f: Friendship) -> Self {
        (f.a, f.b)
    }
}

impl std::fmt::Display for Friendship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}", self.a, self.b)
    }
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Point-in-time copy of the user set and the friendship set
///
/// This is the only thing the graph engine consumes. It doubles as the
/// JSON import/export document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub friendships: Vec<Friendship>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            ..Default::default()
        }
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn with_friendships(mut self, friendships: Vec<Friendship>) -> Self {
        self.friendships = friendships;
        self
    }

    /// Parse a snapshot document, rejecting unknown versions
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check referential integrity before the snapshot is written anywhere
    ///
    /// The graph engine itself tolerates all of these; storage does not.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.users.len());
        let mut usernames = HashSet::with_capacity(self.users.len());
        for user in &self.users {
            if !ids.insert(user.id) {
                return Err(Error::Validation(format!("duplicate user id {}", user.id)));
            }
            if !usernames.insert(user.username.as_str()) {
                return Err(Error::UserExists(user.username.clone()));
            }
        }

        for friendship in &self.friendships {
            if friendship.is_self_loop() {
                return Err(Error::SelfFriendship(friendship.a()));
            }
            for id in [friendship.a(), friendship.b()] {
                if !ids.contains(&id) {
                    return Err(Error::UserNotFound(id.to_string()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendship_is_unordered() {
        let f = Friendship::new(UserId(5), UserId(2));
        assert_eq!(f, Friendship::new(UserId(2), UserId(5)));
        assert_eq!(f.a(), UserId(2));
        assert_eq!(f.other(UserId(2)), Some(UserId(5)));
        assert_eq!(f.other(UserId(9)), None);
        assert!(f.involves(UserId(5)));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = Snapshot::new()
            .with_users(vec![
                User::new(UserId(1), "ann", "Ann"),
                User::new(UserId(2), "bob", "Bob"),
            ])
            .with_friendships(vec![Friendship::new(UserId(2), UserId(1))]);

        let json = snapshot.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["friendships"][0], serde_json::json!([1, 2]));

        let parsed = Snapshot::from_json(&json).unwrap();
        assert_eq!(parsed.users.len(), 2);
        assert_eq!(parsed.friendships, snapshot.friendships);
    }

    #[test]
    fn test_snapshot_reads_hand_written_document() {
        let doc = r#"{
            "version": 1,
            "users": [
                {"id": 1, "username": "ann", "name": "Ann"},
                {"id": 2, "username": "bob", "name": "Bob", "email": "bob@example.com"}
            ],
            "friendships": [[2, 1]]
        }"#;

        let snapshot = Snapshot::from_json(doc).unwrap();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.users[1].email.as_deref(), Some("bob@example.com"));
        assert_eq!(snapshot.friendships, vec![Friendship::new(UserId(1), UserId(2))]);

        let json = snapshot.to_json().unwrap();
        let written: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(written["version"].is_u64());
        assert_eq!(Snapshot::from_json(&json).unwrap().users, snapshot.users);

        // the version is a number, not a string
        assert!(Snapshot::from_json(r#"{"version": "1"}"#).is_err());
    }

    #[test]
    fn test_snapshot_rejects_unknown_version() {
        let err = Snapshot::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(99)));
    }

    #[test]
    fn test_snapshot_validation() {
        let users = vec![User::new(UserId(1), "ann", "Ann")];

        let dangling = Snapshot::new()
            .with_users(users.clone())
            .with_friendships(vec![Friendship::new(UserId(1), UserId(2))]);
        assert!(matches!(dangling.validate(), Err(Error::UserNotFound(_))));

        let looped = Snapshot::new()
            .with_users(users.clone())
            .with_friendships(vec![Friendship::new(UserId(1), UserId(1))]);
        assert!(matches!(looped.validate(), Err(Error::SelfFriendship(_))));

        let duplicate = Snapshot::new().with_users(vec![
            users[0].clone(),
            User::new(UserId(2), "ann", "Other Ann"),
        ]);
        assert!(matches!(duplicate.validate(), Err(Error::UserExists(_))));

        assert!(Snapshot::new().with_users(users).validate().is_ok());
    }
}
