//! Spanning tree over node placements (Kruskal)
//!
//! Every pair of nodes is a candidate edge weighted by Euclidean distance
//! (1.0 when either end has no coordinates). Candidates are taken in weight
//! order and accepted when they join two components, which yields a single
//! component with exactly N-1 edges.

use crate::graph::Placement;

/// Tracks node connectivity with a union-find forest
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl ConnectivityTracker {
    /// Create a tracker where every node is its own component
    pub fn new(num_nodes: usize) -> Self {
        Self {
            parent: (0..num_nodes).collect(),
            rank: vec![0; num_nodes],
            components: num_nodes,
        }
    }

    /// Component representative, compressing the path on the way
    pub fn find(&mut self, a: usize) -> usize {
        let mut root = a;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = a;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the components of `a` and `b`; false if already merged
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
        self.components -= 1;
        true
    }

    /// Check if all nodes are connected
    pub fn all_connected(&self) -> bool {
        self.components <= 1
    }
}

fn pair_weight(a: &Placement, b: &Placement) -> f64 {
    match (a.point(), b.point()) {
        (Some(pa), Some(pb)) => pa.distance(&pb),
        _ => 1.0,
    }
}

/// Minimum-weight spanning tree as `(i, j)` index pairs with `i < j`
pub fn spanning_tree(placements: &[Placement]) -> Vec<(usize, usize)> {
    let n = placements.len();
    if n < 2 {
        return Vec::new();
    }

    let mut candidates = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            candidates.push((pair_weight(&placements[i], &placements[j]), i, j));
        }
    }
    // Stable sort: equal weights stay in index order
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut tracker = ConnectivityTracker::new(n);
    let mut tree = Vec::with_capacity(n - 1);
    for (_, i, j) in candidates {
        if tracker.merge(i, j) {
            tree.push((i, j));
            if tracker.all_connected() {
                break;
            }
        }
    }
    tree
}
