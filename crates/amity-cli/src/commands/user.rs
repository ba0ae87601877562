//! User commands

use clap::{Args, Subcommand};

use super::resolve_user;
use crate::output::{print_json, user_line};
use crate::AppContext;
use amity_core::NewUser;
use amity_storage::SocialStore;

#[derive(Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Unique username
        username: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List all users
    List,
    /// Show a user and their friends
    Get {
        /// User id or username
        user: String,
    },
    /// Delete a user and their friendships
    Delete {
        /// User id or username
        user: String,
    },
}

pub async fn run(args: &UserArgs, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        UserCommands::Add {
            username,
            name,
            email,
        } => {
            let mut new_user = NewUser::new(username, name);
            if let Some(email) = email {
                new_user = new_user.with_email(email);
            }

            let user = ctx.storage.create_user(new_user).await?;
            tracing::info!("Registered user {} (@{})", user.id, user.username);

            if ctx.json() {
                print_json(&user)?;
            } else {
                println!("Created user: {}", user_line(&user));
            }
        }
        UserCommands::List => {
            let users = ctx.storage.list_users().await?;

            if ctx.json() {
                print_json(&users)?;
            } else if users.is_empty() {
                println!("No users found");
            } else {
                println!("Users ({} found):", users.len());
                for user in &users {
                    println!("  {}", user_line(user));
                }
            }
        }
        UserCommands::Get { user } => {
            let user = resolve_user(user, ctx).await?;
            let friends = ctx.storage.friends_of(user.id).await?;

            if ctx.json() {
                print_json(&serde_json::json!({
                    "user": user,
                    "friends": friends.iter().map(|f| f.summary()).collect::<Vec<_>>(),
                }))?;
            } else {
                println!("{}", user_line(&user));
                println!("  joined: {}", user.created_at.format("%Y-%m-%d %H:%M UTC"));
                if friends.is_empty() {
                    println!("  (no friends yet)");
                } else {
                    println!("  friends ({}):", friends.len());
                    for friend in &friends {
                        println!("    {}", friend.summary());
                    }
                }
            }
        }
        UserCommands::Delete { user } => {
            let user = resolve_user(user, ctx).await?;
            ctx.storage.delete_user(user.id).await?;

            if ctx.json() {
                print_json(&serde_json::json!({ "deleted": user.id }))?;
            } else {
                println!("Deleted user: @{} (#{})", user.username, user.id);
            }
        }
    }

    Ok(())
}
