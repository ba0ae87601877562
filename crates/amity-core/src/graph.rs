//! Adjacency-list social graph and its builder

use crate::friendship::{Friendship, Snapshot};
use crate::user::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Undirected, unweighted friendship graph
///
/// Each user maps to its neighbours in insertion order. Node keys are
/// also kept in insertion order so that every query over the whole graph
/// is reproducible. The only mutations are [`add_node`](Self::add_node)
/// and [`add_edge`](Self::add_edge); once built, the graph is read through
/// `&self` and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    adjacency: HashMap<UserId, Vec<UserId>>,
    order: Vec<UserId>,
    edge_count: usize,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            adjacency: HashMap::with_capacity(node_count),
            order: Vec::with_capacity(node_count),
            edge_count: 0,
        }
    }

    /// Register a user with no friends. No-op if already present.
    pub fn add_node(&mut self, id: UserId) {
        if !self.adjacency.contains_key(&id) {
            self.adjacency.insert(id, Vec::new());
            self.order.push(id);
        }
    }

    /// Record a friendship between `u` and `v`.
    ///
    /// Both endpoints are registered if needed. Each side gains the other
    /// as a neighbour only if it is not already there, so repeating an
    /// edge in either orientation changes nothing.
    pub fn add_edge(&mut self, u: UserId, v: UserId) {
        self.add_node(u);
        self.add_node(v);

        let mut added = false;
        if let Some(neighbors) = self.adjacency.get_mut(&u) {
            if !neighbors.contains(&v) {
                neighbors.push(v);
                added = true;
            }
        }
        if let Some(neighbors) = self.adjacency.get_mut(&v) {
            if !neighbors.contains(&u) {
                neighbors.push(u);
                added = true;
            }
        }
        if added {
            self.edge_count += 1;
        }
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Neighbours of `id` in insertion order; empty for unknown users.
    pub fn neighbors(&self, id: UserId) -> &[UserId] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct friends of `id`, copied out of the graph.
    pub fn friends(&self, id: UserId) -> Vec<UserId> {
        self.neighbors(id).to_vec()
    }

    pub fn are_friends(&self, u: UserId, v: UserId) -> bool {
        self.neighbors(u).contains(&v)
    }

    pub fn degree(&self, id: UserId) -> usize {
        self.neighbors(id).len()
    }

    /// All users in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = UserId> + '_ {
        self.order.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    /// Number of distinct undirected friendships.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Users that are neither `id` nor one of its direct friends.
    pub fn strangers(&self, id: UserId) -> Vec<UserId> {
        let friends = self.neighbors(id);
        self.nodes()
            .filter(|other| *other != id && !friends.contains(other))
            .collect()
    }

    /// Summary counts over the whole graph.
    pub fn stats(&self) -> GraphStats {
        let communities = self.detect_communities();
        GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            communities: communities.len(),
            largest_community: communities.iter().map(Vec::len).max().unwrap_or(0),
            isolated: self.nodes().filter(|id| self.degree(*id) == 0).count(),
        }
    }
}

/// Whole-graph summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub communities: usize,
    pub largest_community: usize,
    pub isolated: usize,
}

/// Assembles a [`SocialGraph`] from a node set and an edge set
///
/// Users are registered first, then friendships, each in the order
/// given. Input order therefore fixes adjacency order and node order.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    users: Vec<UserId>,
    friendships: Vec<(UserId, UserId)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.users.extend(users);
        self
    }

    pub fn with_friendships(
        mut self,
        friendships: impl IntoIterator<Item = (UserId, UserId)>,
    ) -> Self {
        self.friendships.extend(friendships);
        self
    }

    pub fn user(mut self, id: UserId) -> Self {
        self.users.push(id);
        self
    }

    pub fn friendship(mut self, u: UserId, v: UserId) -> Self {
        self.friendships.push((u, v));
        self
    }

    /// Builder pre-loaded with every user and friendship of a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::new()
            .with_users(snapshot.users.iter().map(|u| u.id))
            .with_friendships(snapshot.friendships.iter().map(|f| (f.a(), f.b())))
    }

    pub fn build(self) -> SocialGraph {
        let mut graph = SocialGraph::with_capacity(self.users.len());
        for id in self.users {
            graph.add_node(id);
        }
        for (u, v) in self.friendships {
            graph.add_edge(u, v);
        }

        tracing::debug!(
            "Built social graph: {} users, {} friendships",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }
}

impl From<&Snapshot> for SocialGraph {
    fn from(snapshot: &Snapshot) -> Self {
        GraphBuilder::from_snapshot(snapshot).build()
    }
}

impl FromIterator<Friendship> for SocialGraph {
    fn from_iter<I: IntoIterator<Item = Friendship>>(iter: I) -> Self {
        let mut graph = SocialGraph::new();
        for f in iter {
            graph.add_edge(f.a(), f.b());
        }
        graph
    }
}
