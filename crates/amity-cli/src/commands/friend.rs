//! Friendship commands

use clap::{Args, Subcommand};

use super::resolve_user;
use crate::output::{print_json, print_summaries};
use crate::AppContext;
use amity_core::{UserDirectory, UserSummary};
use amity_storage::SocialStore;

#[derive(Args)]
pub struct FriendArgs {
    #[command(subcommand)]
    pub command: FriendCommands,
}

#[derive(Subcommand)]
pub enum FriendCommands {
    /// Make two users friends
    Add {
        /// User id or username
        user: String,
        /// User id or username
        friend: String,
    },
    /// End a friendship
    Remove {
        /// User id or username
        user: String,
        /// User id or username
        friend: String,
    },
    /// List a user's friends
    List {
        /// User id or username
        user: String,
    },
    /// List users who are not yet friends with a user
    Strangers {
        /// User id or username
        user: String,
    },
}

pub async fn run(args: &FriendArgs, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        FriendCommands::Add { user, friend } => {
            let user = resolve_user(user, ctx).await?;
            let friend = resolve_user(friend, ctx).await?;

            let created = ctx.storage.add_friendship(user.id, friend.id).await?;

            if ctx.json() {
                print_json(&serde_json::json!({
                    "user": user.id,
                    "friend": friend.id,
                    "created": created,
                }))?;
            } else if created {
                println!("@{} and @{} are now friends", user.username, friend.username);
            } else {
                println!("@{} and @{} were already friends", user.username, friend.username);
            }
        }
        FriendCommands::Remove { user, friend } => {
            let user = resolve_user(user, ctx).await?;
            let friend = resolve_user(friend, ctx).await?;

            let removed = ctx.storage.remove_friendship(user.id, friend.id).await?;
            if removed {
                tracing::info!("Removed friendship {} <-> {}", user.id, friend.id);
            }

            if ctx.json() {
                print_json(&serde_json::json!({
                    "user": user.id,
                    "friend": friend.id,
                    "removed": removed,
                }))?;
            } else if removed {
                println!("@{} and @{} are no longer friends", user.username, friend.username);
            } else {
                println!("@{} and @{} were not friends", user.username, friend.username);
            }
        }
        FriendCommands::List { user } => {
            let user = resolve_user(user, ctx).await?;
            let friends: Vec<UserSummary> = ctx
                .storage
                .friends_of(user.id)
                .await?
                .iter()
                .map(|f| f.summary())
                .collect();

            if ctx.json() {
                print_json(&friends)?;
            } else {
                print_summaries(
                    &format!("Friends of @{}", user.username),
                    &friends,
                    &format!("@{} has no friends yet", user.username),
                );
            }
        }
        FriendCommands::Strangers { user } => {
            let user = resolve_user(user, ctx).await?;
            let snapshot = ctx.storage.load_snapshot().await?;
            let graph = amity_core::SocialGraph::from(&snapshot);
            let directory = UserDirectory::new(snapshot.users);

            let strangers = directory.resolve(&graph.strangers(user.id));

            if ctx.json() {
                print_json(&strangers)?;
            } else {
                print_summaries(
                    &format!("Not yet friends with @{}", user.username),
                    &strangers,
                    &format!("@{} is friends with everyone", user.username),
                );
            }
        }
    }

    Ok(())
}
