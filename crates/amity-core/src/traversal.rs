//! Graph traversal algorithms

use crate::graph::SocialGraph;
use crate::user::UserId;
use std::collections::{HashSet, VecDeque};

/// Default hop distance for friend suggestions (friends of friends)
pub const DEFAULT_SUGGEST_DEPTH: u32 = 2;

impl SocialGraph {
    /// Breadth-first traversal from `start`.
    ///
    /// Returns every reachable user exactly once, in non-decreasing hop
    /// distance, first discovered first emitted. An unknown `start` yields
    /// `[start]`.
    pub fn bfs(&self, start: UserId) -> Vec<UserId> {
        let mut visited: HashSet<UserId> = HashSet::from([start]);
        let mut queue: VecDeque<UserId> = VecDeque::from([start]);
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            result.push(current);
            for &next in self.neighbors(current) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        tracing::debug!("BFS from {} reached {} users", start, result.len());
        result
    }

    /// Depth-first pre-order traversal from `start`.
    ///
    /// Neighbours are pushed in reverse so they pop in adjacency order.
    /// A user can sit on the stack more than once; stale entries are
    /// dropped when popped.
    pub fn dfs(&self, start: UserId) -> Vec<UserId> {
        let mut visited: HashSet<UserId> = HashSet::new();
        let mut stack: Vec<UserId> = vec![start];
        let mut result = Vec::new();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current);
            for &next in self.neighbors(current).iter().rev() {
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }

        tracing::debug!("DFS from {} reached {} users", start, result.len());
        result
    }

    /// Fewest-hops path from `start` to `end`, both inclusive.
    ///
    /// Returns `None` when `end` cannot be reached, which includes either
    /// endpoint being absent. `start == end` is `Some([start])`. Among
    /// equally short paths the first one discovered wins, so the answer is
    /// fixed by adjacency order.
    pub fn shortest_path(&self, start: UserId, end: UserId) -> Option<Vec<UserId>> {
        if start == end {
            return Some(vec![start]);
        }

        let mut visited: HashSet<UserId> = HashSet::from([start]);
        let mut queue: VecDeque<(UserId, Vec<UserId>)> = VecDeque::from([(start, vec![start])]);

        while let Some((current, path)) = queue.pop_front() {
            if current == end {
                tracing::debug!("Path {} -> {} found with {} hops", start, end, path.len() - 1);
                return Some(path);
            }
            for &next in self.neighbors(current) {
                if visited.insert(next) {
                    let mut extended = path.clone();
                    extended.push(next);
                    queue.push_back((next, extended));
                }
            }
        }

        tracing::debug!("No path {} -> {}", start, end);
        None
    }

    /// Users exactly `depth` hops from `user` who are not already friends.
    ///
    /// Users closer than `depth` are never suggested, and a direct friend
    /// is excluded even when a second route places it at `depth`. The
    /// result is a set; it is returned in discovery order and carries no
    /// ranking.
    pub fn suggest_friends(&self, user: UserId, depth: u32) -> Vec<UserId> {
        let mut visited: HashSet<UserId> = HashSet::from([user]);
        let mut queue: VecDeque<(UserId, u32)> = VecDeque::from([(user, 0)]);
        let mut suggestions = Vec::new();

        while let Some((current, level)) = queue.pop_front() {
            if level >= depth {
                continue;
            }
            for &next in self.neighbors(current) {
                if visited.insert(next) {
                    if level + 1 == depth {
                        suggestions.push(next);
                    }
                    queue.push_back((next, level + 1));
                }
            }
        }

        let friends = self.neighbors(user);
        suggestions.retain(|candidate| !friends.contains(candidate));

        tracing::debug!(
            "Suggested {} users for {} at depth {}",
            suggestions.len(),
            user,
            depth
        );
        suggestions
    }

    /// Partition every user into connected components.
    ///
    /// Components appear in the order their first member was registered;
    /// members within a component are in BFS order from that member.
    pub fn detect_communities(&self) -> Vec<Vec<UserId>> {
        let mut visited: HashSet<UserId> = HashSet::with_capacity(self.node_count());
        let mut communities = Vec::new();

        for id in self.nodes() {
            if visited.contains(&id) {
                continue;
            }
            let community = self.bfs(id);
            visited.extend(community.iter().copied());
            communities.push(community);
        }

        tracing::debug!(
            "Detected {} communities over {} users",
            communities.len(),
            self.node_count()
        );
        communities
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{GraphBuilder, SocialGraph};
    use crate::user::UserId;
    use std::collections::{HashMap, HashSet, VecDeque};

    use super::DEFAULT_SUGGEST_DEPTH;

    fn ids(raw: &[i64]) -> Vec<UserId> {
        raw.iter().copied().map(UserId).collect()
    }

    fn build(nodes: &[i64], edges: &[(i64, i64)]) -> SocialGraph {
        GraphBuilder::new()
            .with_users(ids(nodes))
            .with_friendships(edges.iter().map(|&(u, v)| (UserId(u), UserId(v))))
            .build()
    }

    // 1-2-3 triangle, 4-5 pair, 6 alone
    fn create_test_graph() -> SocialGraph {
        build(&[1, 2, 3, 4, 5, 6], &[(1, 2), (2, 3), (3, 1), (4, 5)])
    }

    //     1
    //    / \
    //   2   3
    //   |   |
    //   4   5
    //    \ /
    //     6 - 7
    fn create_layered_graph() -> SocialGraph {
        build(
            &[1, 2, 3, 4, 5, 6, 7],
            &[(1, 2), (1, 3), (2, 4), (3, 5), (4, 6), (5, 6), (6, 7)],
        )
    }

    fn distances(graph: &SocialGraph, start: UserId) -> HashMap<UserId, usize> {
        let mut dist = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            for &next in graph.neighbors(current) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    #[test]
    fn test_bfs_scenario() {
        let graph = create_test_graph();
        assert_eq!(graph.bfs(UserId(1)), ids(&[1, 2, 3]));
    }

    #[test]
    fn test_bfs_level_order() {
        let graph = create_layered_graph();
        let order = graph.bfs(UserId(1));
        assert_eq!(order, ids(&[1, 2, 3, 4, 5, 6, 7]));

        let dist = distances(&graph, UserId(1));
        for pair in order.windows(2) {
            assert!(dist[&pair[0]] <= dist[&pair[1]]);
        }
    }

    #[test]
    fn test_bfs_visits_each_reachable_once() {
        let graph = create_layered_graph();
        let order = graph.bfs(UserId(6));
        let unique: HashSet<_> = order.iter().copied().collect();

        assert_eq!(unique.len(), order.len());
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn test_bfs_unknown_start() {
        let graph = create_test_graph();
        assert_eq!(graph.bfs(UserId(42)), ids(&[42]));
    }

    #[test]
    fn test_dfs_preorder() {
        let graph = create_layered_graph();
        assert_eq!(graph.dfs(UserId(1)), ids(&[1, 2, 4, 6, 5, 3, 7]));
    }

    #[test]
    fn test_dfs_follows_adjacency_order() {
        // 1's neighbours in insertion order: 3, 2
        let graph = build(&[1, 2, 3, 4], &[(1, 3), (1, 2), (2, 4)]);
        assert_eq!(graph.dfs(UserId(1)), ids(&[1, 3, 2, 4]));
    }

    #[test]
    fn test_dfs_matches_bfs_reachable_set() {
        let graph = create_layered_graph();
        for start in graph.nodes() {
            let dfs = graph.dfs(start);
            let bfs: HashSet<_> = graph.bfs(start).into_iter().collect();
            let dfs_set: HashSet<_> = dfs.iter().copied().collect();

            assert_eq!(dfs.len(), dfs_set.len());
            assert_eq!(dfs_set, bfs);
        }
    }

    #[test]
    fn test_dfs_unknown_start() {
        let graph = create_test_graph();
        assert_eq!(graph.dfs(UserId(42)), ids(&[42]));
    }

    #[test]
    fn test_shortest_path_direct_edge() {
        let graph = create_test_graph();
        assert_eq!(graph.shortest_path(UserId(1), UserId(3)), Some(ids(&[1, 3])));
    }

    #[test]
    fn test_shortest_path_disconnected() {
        let graph = create_test_graph();
        assert_eq!(graph.shortest_path(UserId(1), UserId(5)), None);
        assert_eq!(graph.shortest_path(UserId(1), UserId(6)), None);
    }

    #[test]
    fn test_shortest_path_reflexive() {
        let graph = create_test_graph();
        assert_eq!(graph.shortest_path(UserId(6), UserId(6)), Some(ids(&[6])));
    }

    #[test]
    fn test_shortest_path_absent_endpoint() {
        let graph = create_test_graph();
        assert_eq!(graph.shortest_path(UserId(1), UserId(99)), None);
        assert_eq!(graph.shortest_path(UserId(99), UserId(1)), None);
    }

    #[test]
    fn test_shortest_path_is_minimal_and_deterministic() {
        let graph = create_layered_graph();
        let dist = distances(&graph, UserId(1));

        for target in graph.nodes() {
            let path = graph.shortest_path(UserId(1), target).unwrap();
            assert_eq!(path.len() - 1, dist[&target]);
            assert_eq!(path.first(), Some(&UserId(1)));
            assert_eq!(path.last(), Some(&target));
            for hop in path.windows(2) {
                assert!(graph.are_friends(hop[0], hop[1]));
            }
        }

        // two routes of length 4; the one through 2 is discovered first
        let first = graph.shortest_path(UserId(1), UserId(7));
        assert_eq!(first, Some(ids(&[1, 2, 4, 6, 7])));
        assert_eq!(graph.shortest_path(UserId(1), UserId(7)), first);
    }

    #[test]
    fn test_suggest_friends_triangle_is_empty() {
        let graph = create_test_graph();
        assert!(graph.suggest_friends(UserId(1), DEFAULT_SUGGEST_DEPTH).is_empty());
    }

    #[test]
    fn test_suggest_friends_of_friends() {
        let graph = create_layered_graph();
        let suggestions: HashSet<_> = graph.suggest_friends(UserId(1), 2).into_iter().collect();
        assert_eq!(suggestions, ids(&[4, 5]).into_iter().collect());
    }

    #[test]
    fn test_suggest_friends_exact_depth_only() {
        let graph = create_layered_graph();

        // 6 is three hops away; 4 and 5 are closer and never suggested
        assert_eq!(graph.suggest_friends(UserId(1), 3), ids(&[6]));
        assert_eq!(graph.suggest_friends(UserId(1), 4), ids(&[7]));
        assert!(graph.suggest_friends(UserId(1), 5).is_empty());
    }

    #[test]
    fn test_suggest_friends_excludes_self_and_friends() {
        let graph = create_layered_graph();
        for user in graph.nodes() {
            for depth in 0..6 {
                for candidate in graph.suggest_friends(user, depth) {
                    assert_ne!(candidate, user);
                    assert!(!graph.are_friends(user, candidate));
                }
            }
        }
    }

    #[test]
    fn test_suggest_friends_edge_cases() {
        let graph = create_test_graph();
        assert!(graph.suggest_friends(UserId(6), 2).is_empty());
        assert!(graph.suggest_friends(UserId(1), 0).is_empty());
        assert!(graph.suggest_friends(UserId(42), 2).is_empty());
    }

    #[test]
    fn test_detect_communities_scenario() {
        let graph = create_test_graph();
        let communities = graph.detect_communities();

        assert_eq!(communities, vec![ids(&[1, 2, 3]), ids(&[4, 5]), ids(&[6])]);
    }

    #[test]
    fn test_detect_communities_partition() {
        let graph = build(
            &[10, 3, 7, 1, 8],
            &[(1, 8), (3, 10), (7, 7), (2, 9), (9, 11)],
        );
        let communities = graph.detect_communities();

        let mut seen = HashSet::new();
        for community in &communities {
            for id in community {
                assert!(seen.insert(*id), "{} appears in two communities", id);
            }
            let reachable: HashSet<_> = graph.bfs(community[0]).into_iter().collect();
            assert_eq!(reachable, community.iter().copied().collect());
        }
        let all: HashSet<_> = graph.nodes().collect();
        assert_eq!(seen, all);

        // ordered by first registered member
        let leaders: Vec<_> = communities.iter().map(|c| c[0]).collect();
        assert_eq!(leaders, ids(&[10, 7, 1, 2]));
    }

    #[test]
    fn test_empty_graph_has_no_communities() {
        assert!(SocialGraph::new().detect_communities().is_empty());
    }
}
