//! Node role classification

use crate::consts::{DEAD_END_FRACTION, MIN_FRONTIER};
use crate::graph::{NodeType, RegionGraph};
use crate::rng::RegionRng;

/// How many nodes got each role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts {
    pub hub: usize,
    pub boss: usize,
    pub frontier: usize,
    pub dead_end: usize,
    pub linear: usize,
    pub branching: usize,
    /// Degree-1 nodes still untyped when dead ends were picked
    pub dead_end_eligible: usize,
}

/// Frontier quota for `boundary` candidates
pub fn frontier_quota(boundary: usize, fraction: f64) -> usize {
    MIN_FRONTIER.max((boundary as f64 * fraction).ceil() as usize)
}

/// Dead-end quota for `eligible` degree-1 nodes
pub fn dead_end_quota(eligible: usize) -> usize {
    (eligible as f64 * DEAD_END_FRACTION).round() as usize
}

/// Assign a role to every node of `graph`
///
/// The entry (index 0) is the hub and the farthest node from it by hop
/// count is the boss. Everything else depends on degree.
pub fn classify_nodes(graph: &mut RegionGraph, frontier_fraction: f64, rng: &mut RegionRng) -> RoleCounts {
    let n = graph.len();
    let mut counts = RoleCounts::default();
    if n == 0 {
        return counts;
    }

    let degrees: Vec<usize> = graph.nodes().iter().map(|node| node.degree()).collect();
    let mut roles: Vec<Option<NodeType>> = vec![None; n];
    roles[0] = Some(NodeType::Hub);

    // First node in generation order wins ties
    let distances = graph.bfs_distances(0);
    let mut farthest = 0;
    let mut farthest_dist = 0;
    for (i, d) in distances.iter().enumerate() {
        if let Some(d) = *d
            && d > farthest_dist
        {
            farthest = i;
            farthest_dist = d;
        }
    }
    if farthest != 0 {
        roles[farthest] = Some(NodeType::Boss);
    }

    let mut boundary: Vec<usize> = (0..n)
        .filter(|&i| roles[i].is_none() && degrees[i] <= 2)
        .collect();
    rng.shuffle(&mut boundary);
    let quota = frontier_quota(boundary.len(), frontier_fraction);
    let mut frontier = 0;
    for &i in boundary.iter().take(quota) {
        roles[i] = Some(NodeType::Frontier);
        frontier += 1;
    }
    if frontier < MIN_FRONTIER {
        // Dense graph: take the least-connected remaining nodes
        let mut rest: Vec<usize> = (0..n).filter(|&i| roles[i].is_none()).collect();
        rest.sort_by_key(|&i| (degrees[i], i));
        for &i in rest.iter().take(MIN_FRONTIER - frontier) {
            roles[i] = Some(NodeType::Frontier);
        }
    }

    let mut leaves: Vec<usize> = (0..n)
        .filter(|&i| roles[i].is_none() && degrees[i] == 1)
        .collect();
    counts.dead_end_eligible = leaves.len();
    rng.shuffle(&mut leaves);
    for &i in leaves.iter().take(dead_end_quota(counts.dead_end_eligible)) {
        roles[i] = Some(NodeType::DeadEnd);
    }

    for (node, role) in graph.nodes_mut().iter_mut().zip(roles) {
        let role = role.unwrap_or(if node.degree() <= 2 {
            NodeType::Linear
        } else {
            NodeType::Branching
        });
        node.node_type = role;
        match role {
            NodeType::Hub => counts.hub += 1,
            NodeType::Boss => counts.boss += 1,
            NodeType::Frontier => counts.frontier += 1,
            NodeType::DeadEnd => counts.dead_end += 1,
            NodeType::Linear => counts.linear += 1,
            NodeType::Branching => counts.branching += 1,
            NodeType::Questable => {}
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::LayoutKind;
    use crate::graph::{Edge, Node, Placement};

    /// Undirected edges mirrored with throwaway labels
    fn graph_from(n: usize, pairs: &[(usize, usize)]) -> RegionGraph {
        let mut nodes: Vec<Node> = (0..n)
            .map(|i| Node::new(format!("c-{i}"), "c", Placement::Abstract))
            .collect();
        for (k, &(a, b)) in pairs.iter().enumerate() {
            nodes[a].edges.push(Edge::new(format!("c-{b}"), format!("passage-{k}")));
            nodes[b].edges.push(Edge::new(format!("c-{a}"), format!("passage-back-{k}")));
        }
        RegionGraph::new("c", 0, LayoutKind::Abstract { count: n }, nodes)
    }

    #[test]
    fn test_hub_and_boss_on_path() {
        let pairs: Vec<_> = (0..5).map(|i| (i, i + 1)).collect();
        let mut g = graph_from(6, &pairs);
        let counts = classify_nodes(&mut g, 0.25, &mut RegionRng::new(1));
        assert_eq!(g.nodes()[0].node_type, NodeType::Hub);
        assert_eq!(g.nodes()[5].node_type, NodeType::Boss);
        assert_eq!(counts.hub, 1);
        assert_eq!(counts.boss, 1);
        assert!(counts.frontier >= 2);
    }

    #[test]
    fn test_single_node_is_only_hub() {
        let mut g = graph_from(1, &[]);
        let counts = classify_nodes(&mut g, 0.25, &mut RegionRng::new(1));
        assert_eq!(counts.hub, 1);
        assert_eq!(counts.boss, 0);
        assert_eq!(g.nodes()[0].node_type, NodeType::Hub);
    }

    #[test]
    fn test_dense_graph_still_gets_two_frontiers() {
        // Complete graph on 6 nodes: nobody has degree <= 2
        let mut pairs = Vec::new();
        for i in 0..6 {
            for j in (i + 1)..6 {
                pairs.push((i, j));
            }
        }
        let mut g = graph_from(6, &pairs);
        let counts = classify_nodes(&mut g, 0.25, &mut RegionRng::new(3));
        assert_eq!(counts.frontier, 2);
        assert_eq!(counts.hub, 1);
        assert_eq!(counts.boss, 1);
        assert_eq!(counts.branching, 2);
    }

    #[test]
    fn test_dead_end_quota() {
        assert_eq!(dead_end_quota(0), 0);
        assert_eq!(dead_end_quota(2), 0);
        assert_eq!(dead_end_quota(3), 1);
        assert_eq!(dead_end_quota(10), 2);
        assert_eq!(frontier_quota(0, 0.25), 2);
        assert_eq!(frontier_quota(20, 0.25), 5);
    }

    #[test]
    fn test_star_leaves_split_between_roles() {
        // Hub with 20 leaves: boss is one leaf, frontier takes 5 of the rest
        let pairs: Vec<_> = (1..21).map(|i| (0, i)).collect();
        let mut g = graph_from(21, &pairs);
        let counts = classify_nodes(&mut g, 0.25, &mut RegionRng::new(9));
        assert_eq!(counts.boss, 1);
        assert_eq!(g.nodes()[1].node_type, NodeType::Boss);
        assert_eq!(counts.frontier, 5);
        assert_eq!(counts.dead_end_eligible, 14);
        assert_eq!(counts.dead_end, dead_end_quota(14));
        assert_eq!(counts.linear, 14 - counts.dead_end);
        assert_eq!(
            counts.hub + counts.boss + counts.frontier + counts.dead_end + counts.linear + counts.branching,
            21
        );
    }
}
