//! Graph query commands

use clap::{Args, Subcommand};
use serde::Serialize;

use super::resolve_user;
use crate::output::{chain, print_json, print_summaries};
use crate::AppContext;
use amity_core::limits::validate_suggest_depth;
use amity_core::{GraphBuilder, SocialGraph, UserDirectory, UserSummary};
use amity_storage::SocialStore;

#[derive(Args)]
pub struct GraphArgs {
    #[command(subcommand)]
    pub command: GraphCommands,
}

#[derive(Subcommand)]
pub enum GraphCommands {
    /// Everyone reachable from a user, nearest first (breadth-first)
    Reach {
        /// User id or username
        user: String,
    },
    /// Everyone reachable from a user in depth-first order
    Explore {
        /// User id or username
        user: String,
    },
    /// Shortest chain of friendships between two users
    Path {
        /// Starting user id or username
        from: String,
        /// Target user id or username
        to: String,
    },
    /// Suggest new friends exactly N hops away
    Suggest {
        /// User id or username
        user: String,
        /// Hop distance (defaults to the configured suggest_depth)
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Split users into connected communities
    Communities,
    /// Summary counts for the whole graph
    Stats,
}

#[derive(Serialize)]
struct TraversalOutput {
    start: UserSummary,
    order: &'static str,
    users: Vec<UserSummary>,
}

#[derive(Serialize)]
struct PathOutput {
    from: UserSummary,
    to: UserSummary,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    hops: Option<usize>,
    path: Vec<UserSummary>,
}

#[derive(Serialize)]
struct SuggestOutput {
    user: UserSummary,
    depth: u32,
    suggestions: Vec<UserSummary>,
}

#[derive(Serialize)]
struct CommunityOutput {
    size: usize,
    members: Vec<UserSummary>,
}

/// Snapshot the store once and build both the graph and its directory
async fn load(ctx: &AppContext) -> anyhow::Result<(SocialGraph, UserDirectory)> {
    let snapshot = ctx.storage.load_snapshot().await?;
    let graph = GraphBuilder::from_snapshot(&snapshot).build();
    let directory = UserDirectory::new(snapshot.users);
    Ok((graph, directory))
}

pub async fn run(args: &GraphArgs, ctx: &AppContext) -> anyhow::Result<()> {
    let (graph, directory) = load(ctx).await?;

    match &args.command {
        GraphCommands::Reach { user } | GraphCommands::Explore { user } => {
            let start = resolve_user(user, ctx).await?;
            let (order, ids) = match &args.command {
                GraphCommands::Explore { .. } => ("dfs", graph.dfs(start.id)),
                _ => ("bfs", graph.bfs(start.id)),
            };
            tracing::info!("Traversed {} users from {} ({})", ids.len(), start.id, order);

            let users = directory.resolve(&ids);
            if ctx.json() {
                print_json(&TraversalOutput {
                    start: start.summary(),
                    order,
                    users,
                })?;
            } else {
                // skip the starting user itself
                let others: Vec<_> = users.into_iter().skip(1).collect();
                print_summaries(
                    &format!("Reachable from @{} ({})", start.username, order),
                    &others,
                    &format!("Nobody is reachable from @{}", start.username),
                );
            }
        }
        GraphCommands::Path { from, to } => {
            let from = resolve_user(from, ctx).await?;
            let to = resolve_user(to, ctx).await?;

            let path = graph.shortest_path(from.id, to.id);
            tracing::info!("Path search {} -> {}: found={}", from.id, to.id, path.is_some());

            let output = PathOutput {
                from: from.summary(),
                to: to.summary(),
                found: path.is_some(),
                hops: path.as_ref().map(|p| p.len() - 1),
                path: path.as_deref().map(|p| directory.resolve(p)).unwrap_or_default(),
            };

            if ctx.json() {
                print_json(&output)?;
            } else if let Some(hops) = output.hops {
                println!("Path from @{} to @{} ({} hops):", from.username, to.username, hops);
                println!("  {}", chain(&output.path));
            } else {
                println!("No path found from @{} to @{}", from.username, to.username);
            }
        }
        GraphCommands::Suggest { user, depth } => {
            let user = resolve_user(user, ctx).await?;
            let depth = depth.unwrap_or(ctx.suggest_depth);
            validate_suggest_depth(depth)?;

            let suggestions = directory.resolve(&graph.suggest_friends(user.id, depth));
            tracing::info!("{} suggestions for {} at depth {}", suggestions.len(), user.id, depth);

            if ctx.json() {
                print_json(&SuggestOutput {
                    user: user.summary(),
                    depth,
                    suggestions,
                })?;
            } else {
                print_summaries(
                    &format!("Suggested friends for @{} ({} hops away)", user.username, depth),
                    &suggestions,
                    &format!("No suggestions for @{}", user.username),
                );
            }
        }
        GraphCommands::Communities => {
            let communities: Vec<CommunityOutput> = graph
                .detect_communities()
                .iter()
                .map(|members| CommunityOutput {
                    size: members.len(),
                    members: directory.resolve(members),
                })
                .collect();

            if ctx.json() {
                print_json(&communities)?;
            } else if communities.is_empty() {
                println!("No users found");
            } else {
                println!("Communities ({} found):", communities.len());
                for (i, community) in communities.iter().enumerate() {
                    let names: Vec<_> = community
                        .members
                        .iter()
                        .map(|m| format!("@{}", m.username))
                        .collect();
                    println!("  {}. [{}] {}", i + 1, community.size, names.join(", "));
                }
            }
        }
        GraphCommands::Stats => {
            let stats = graph.stats();

            if ctx.json() {
                print_json(&stats)?;
            } else {
                println!("Users:             {}", stats.nodes);
                println!("Friendships:       {}", stats.edges);
                println!("Communities:       {}", stats.communities);
                println!("Largest community: {}", stats.largest_community);
                println!("Without friends:   {}", stats.isolated);
            }
        }
    }

    Ok(())
}
