//! CLI command implementations

pub mod completions;
pub mod config;
pub mod friend;
pub mod graph;
pub mod io;
pub mod user;

use amity_core::{User, UserId};
use amity_storage::SocialStore;

use crate::AppContext;

/// Look a user up by numeric id or by username
pub async fn resolve_user(reference: &str, ctx: &AppContext) -> anyhow::Result<User> {
    let found = match reference.parse::<UserId>() {
        Ok(id) => ctx.storage.get_user(id).await?,
        Err(_) => {
            let username = reference.trim_start_matches('@');
            ctx.storage.get_user_by_username(username).await?
        }
    };

    match found {
        Some(user) => Ok(user),
        None => anyhow::bail!("User not found: {}", reference),
    }
}
