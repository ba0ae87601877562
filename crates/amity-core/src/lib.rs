//! Amity Core - Social graph engine
//!
//! This crate provides the in-memory friendship graph and the queries
//! answered over it: reachability, depth-first exploration, shortest
//! paths, friend suggestions and community detection.

pub mod directory;
pub mod error;
pub mod friendship;
pub mod graph;
pub mod limits;
pub mod traversal;
pub mod user;

pub use directory::UserDirectory;
pub use error::{Error, Result};
pub use friendship::{Friendship, Snapshot, SNAPSHOT_VERSION};
pub use graph::{GraphBuilder, GraphStats, SocialGraph};
pub use limits::ValidationError;
pub use traversal::DEFAULT_SUGGEST_DEPTH;
pub use user::{NewUser, User, UserId, UserSummary};
